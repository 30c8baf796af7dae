//! # deopt - Command-Line Codon Deoptimizer
//!
//! Recodes protein-coding sequences so that their fraction of optimal codons
//! (Fop) walks in steps toward a target, keeping the protein and both ends of
//! each sequence unchanged.
//!
//! ## Usage
//!
//! ```bash
//! # Deoptimize every record down to Fop 0.1 in steps of 0.1
//! deopt recode -i genes.fasta -o trajectory.fasta
//!
//! # Reproducible run, TSV output, custom windows
//! deopt recode -i gfp.fasta -x 10 -X 10 -s 42 -f tsv
//!
//! # Optimize instead: walk upward to Fop 0.9
//! deopt recode -i gfp.fasta -d 0.05 -e 0.9
//!
//! # Fop of every record and their mean
//! deopt score -i genes.fasta
//! ```
//!
//! ## Options (recode)
//!
//! - `-i, --input <FILE>`: Input FASTA file (default: stdin)
//! - `-o, --output <FILE>`: Output file (default: stdout)
//! - `-f, --format <FORMAT>`: Output format: fasta, tsv (default: fasta)
//! - `-x, --exclude-front <N>`: Codons kept unchanged at the 5′ end (default: 14)
//! - `-X, --exclude-back <N>`: Codons kept unchanged at the 3′ end (default: 14)
//! - `-d, --fop-step <STEP>`: Signed Fop change per step (default: -0.1)
//! - `-e, --fop-stop <FOP>`: Final Fop (default: 0.1)
//! - `-t, --tolerance <TOL>`: Acceptance band per step (default: 0.01)
//! - `-M, --max-wait <N>`: Rejected substitutions before a step gives up (default: 5000)
//! - `-s, --seed <SEED>`: Random seed (default: from entropy)
//! - `-c, --optimal-codons <FILE>`: TOML optimal-codon profile (default: E. coli)
//! - `-j, --threads <N>`: Worker threads for multi-record input
//! - `-q, --quiet`: Only log warnings

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use deopt_core::config::{DeoptConfig, OutputFormat};
use deopt_core::constants::VERSION;
use deopt_core::genetic_code::OptimalCodonSet;
use deopt_core::output::{write_results_batch, write_scores};
use deopt_core::sequence::{FastaRecord, read_fasta_from, read_fasta_sequences};
use deopt_core::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};

fn input_arg() -> Arg {
    Arg::new("input")
        .short('i')
        .long("input")
        .value_name("FILE")
        .help("Input FASTA file (default: stdin)")
}

fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .help("Output file (default: stdout)")
}

fn optimal_codons_arg() -> Arg {
    Arg::new("optimal-codons")
        .short('c')
        .long("optimal-codons")
        .value_name("FILE")
        .help("TOML optimal-codon profile (default: bundled E. coli)")
}

fn recode_command() -> Command {
    Command::new("recode")
        .about("Generate a trajectory of synonymously recoded variants")
        .arg(input_arg())
        .arg(output_arg())
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Output format")
                .value_parser(["fasta", "tsv"])
                .default_value("fasta"),
        )
        .arg(
            Arg::new("exclude-front")
                .short('x')
                .long("exclude-front")
                .value_name("CODONS")
                .help("Codons kept unchanged at the 5' end")
                .value_parser(value_parser!(usize))
                .default_value("14"),
        )
        .arg(
            Arg::new("exclude-back")
                .short('X')
                .long("exclude-back")
                .value_name("CODONS")
                .help("Codons kept unchanged at the 3' end")
                .value_parser(value_parser!(usize))
                .default_value("14"),
        )
        .arg(
            Arg::new("fop-step")
                .short('d')
                .long("fop-step")
                .value_name("STEP")
                .help("Signed Fop change per step; negative deoptimizes")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(f64))
                .default_value("-0.1"),
        )
        .arg(
            Arg::new("fop-stop")
                .short('e')
                .long("fop-stop")
                .value_name("FOP")
                .help("Fop the trajectory ends at")
                .value_parser(value_parser!(f64))
                .default_value("0.1"),
        )
        .arg(
            Arg::new("tolerance")
                .short('t')
                .long("tolerance")
                .value_name("TOL")
                .help("Acceptance band around each step target")
                .value_parser(value_parser!(f64))
                .default_value("0.01"),
        )
        .arg(
            Arg::new("max-wait")
                .short('M')
                .long("max-wait")
                .value_name("N")
                .help("Rejected substitutions before a step gives up")
                .value_parser(value_parser!(usize))
                .default_value("5000"),
        )
        .arg(
            Arg::new("seed")
                .short('s')
                .long("seed")
                .value_name("SEED")
                .help("Random seed for reproducible output")
                .value_parser(value_parser!(u64)),
        )
        .arg(optimal_codons_arg())
        .arg(
            Arg::new("threads")
                .short('j')
                .long("threads")
                .value_name("N")
                .help("Worker threads for multi-record input")
                .value_parser(value_parser!(usize)),
        )
}

fn score_command() -> Command {
    Command::new("score")
        .about("Report the Fop of every record and their mean")
        .arg(input_arg())
        .arg(output_arg())
        .arg(optimal_codons_arg())
}

fn cli() -> Command {
    Command::new("deopt")
        .version(VERSION)
        .about("Codon-usage deoptimization by stepwise synonymous recoding")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log warnings and errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(recode_command())
        .subcommand(score_command())
}

/// Main entry point for the deopt CLI application.
///
/// Parses command-line arguments, sets up logging, and dispatches to the
/// requested subcommand.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();

    let quiet = matches.get_flag("quiet")
        || matches
            .subcommand()
            .is_some_and(|(_, sub)| sub.get_flag("quiet"));
    let level = if quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    match matches.subcommand() {
        Some(("recode", sub)) => run_recode(sub),
        Some(("score", sub)) => run_score(sub),
        _ => Err("No subcommand given".into()),
    }
}

fn run_recode(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let output_format: OutputFormat = matches
        .get_one::<String>("format")
        .map_or(Ok(OutputFormat::default()), |s| s.parse())?;

    let defaults = DeoptConfig::default();
    let config = DeoptConfig {
        start_window: matches
            .get_one::<usize>("exclude-front")
            .copied()
            .unwrap_or(defaults.start_window),
        end_window: matches
            .get_one::<usize>("exclude-back")
            .copied()
            .unwrap_or(defaults.end_window),
        fop_step: matches
            .get_one::<f64>("fop-step")
            .copied()
            .unwrap_or(defaults.fop_step),
        fop_stop: matches
            .get_one::<f64>("fop-stop")
            .copied()
            .unwrap_or(defaults.fop_stop),
        tolerance: matches
            .get_one::<f64>("tolerance")
            .copied()
            .unwrap_or(defaults.tolerance),
        max_wait_count: matches
            .get_one::<usize>("max-wait")
            .copied()
            .unwrap_or(defaults.max_wait_count),
        seed: matches.get_one::<u64>("seed").copied(),
        output_format,
        num_threads: matches.get_one::<usize>("threads").copied(),
    };

    let deoptimizer = Deoptimizer::with_optimal_codons(config, load_optimal_codons(matches)?);
    let records = read_input(matches)?;
    let results = deoptimizer.deoptimize_records(records)?;

    let mut writer = open_output(matches)?;
    write_results_batch(&mut writer, &results, deoptimizer.config.output_format)?;
    writer.flush()?;

    let unconverged = results
        .iter()
        .filter(|r| !r.trajectory.converged())
        .count();
    log::info!(
        "Recoding complete! Wrote {} variants for {} sequences.",
        results.iter().map(|r| r.trajectory.len()).sum::<usize>(),
        results.len()
    );
    if unconverged > 0 {
        log::warn!("{unconverged} sequence(s) have steps that missed their target");
    }

    Ok(())
}

fn run_score(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let deoptimizer =
        Deoptimizer::with_optimal_codons(DeoptConfig::default(), load_optimal_codons(matches)?);
    let records = read_input(matches)?;
    let summary = deoptimizer.score_records(&records)?;

    let mut writer = open_output(matches)?;
    write_scores(&mut writer, &summary)?;
    writer.flush()?;

    match summary.mean_fop() {
        Some(mean) => log::info!(
            "Scored {} sequences against {}, mean Fop {mean:.4}",
            summary.records.len(),
            deoptimizer.scorer().optimal_codons().name()
        ),
        None => log::warn!("No sequence had scorable codons"),
    }

    Ok(())
}

fn load_optimal_codons(matches: &ArgMatches) -> Result<OptimalCodonSet, DeoptError> {
    match matches.get_one::<String>("optimal-codons") {
        Some(path) => {
            let set = OptimalCodonSet::from_toml_file(path)?;
            log::info!("Loaded optimal codon profile {:?} from {path}", set.name());
            Ok(set)
        }
        None => Ok(OptimalCodonSet::default()),
    }
}

fn read_input(matches: &ArgMatches) -> Result<Vec<FastaRecord>, DeoptError> {
    match matches.get_one::<String>("input") {
        Some(path) => read_fasta_sequences(path),
        None => read_fasta_from(io::stdin().lock()),
    }
}

fn open_output(matches: &ArgMatches) -> Result<Box<dyn Write>, io::Error> {
    Ok(match matches.get_one::<String>("output") {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}
