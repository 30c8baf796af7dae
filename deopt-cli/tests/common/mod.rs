#![allow(dead_code)]

use std::collections::BTreeMap;

use assert_cmd::Command;
use deopt_core::sequence::{CodingSequence, read_fasta_from};

/// Fixture with two recodable genes: one all-optimal, one all-rare
pub const RECODE_GENES: &str = "tests/data/recode_genes.fasta";

/// `RECODE_GENES` plus a record without scorable codons
pub const TEST_GENES: &str = "tests/data/test_genes.fasta";

/// Optimal-codon profile that only scores lysine
pub const LYSINE_PROFILE: &str = "tests/data/lysine_profile.toml";

/// Runs the deopt CLI with given arguments and returns the command for assertions
pub fn deopt(args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("deopt").unwrap();
    cmd.args(args);
    cmd
}

/// Runs the deopt CLI, expects success and returns stdout
pub fn run_deopt(args: &[&str]) -> String {
    let output = deopt(args).assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

/// Parse FASTA output and group the records by the source header,
/// i.e. the id with its `_<step>` suffix removed.
pub fn trajectories(fasta: &str) -> BTreeMap<String, Vec<(String, CodingSequence)>> {
    let mut grouped: BTreeMap<String, Vec<(String, CodingSequence)>> = BTreeMap::new();
    for (id, description, seq) in read_fasta_from(fasta.as_bytes()).unwrap() {
        let (header, _step) = id.rsplit_once('_').unwrap();
        grouped.entry(header.to_string()).or_default().push((
            description.unwrap_or_default(),
            CodingSequence::from_bytes(&seq).unwrap(),
        ));
    }
    grouped
}

/// Expects the command to fail and returns its stderr
pub fn failure_stderr(cmd: &mut Command) -> String {
    let output = cmd.assert().failure().get_output().stderr.clone();
    String::from_utf8(output).unwrap()
}
