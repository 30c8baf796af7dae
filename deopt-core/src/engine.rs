use std::io::Read;
use std::path::Path;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;

use crate::config::DeoptConfig;
use crate::genetic_code::OptimalCodonSet;
use crate::optimizer::{CodonOptimizer, deoptimize};
use crate::results::{DeoptResults, ScoreRecord, ScoreSummary, SequenceInfo};
use crate::scoring::FopScorer;
use crate::sequence::{
    CodingSequence, FastaRecord, read_fasta_from, read_fasta_sequences, record_label,
};
use crate::types::DeoptError;

/// High-level interface for deoptimizing sequences.
///
/// `Deoptimizer` pairs a [`DeoptConfig`] with an optimal-codon profile and
/// drives one stepwise trajectory per input record. Inputs holding several
/// records are processed in parallel; record `i` is seeded with `seed + i`
/// so the output does not depend on the thread count.
///
/// # Examples
///
/// ## Deoptimize a sequence string
///
/// ```rust
/// use deopt_core::{Deoptimizer, config::DeoptConfig};
///
/// let config = DeoptConfig {
///     start_window: 2,
///     end_window: 2,
///     seed: Some(7),
///     ..DeoptConfig::default()
/// };
/// let deoptimizer = Deoptimizer::new(config);
///
/// let results = deoptimizer.deoptimize_sequence(&"CTGGCT".repeat(20), Some("demo".to_string()))?;
///
/// println!("{} variants, final Fop {:.3}",
///          results.trajectory.len(),
///          results.final_fop());
/// # Ok::<(), deopt_core::types::DeoptError>(())
/// ```
///
/// ## Deoptimize every record of a FASTA file
///
/// ```rust,no_run
/// use deopt_core::{Deoptimizer, config::DeoptConfig};
///
/// let deoptimizer = Deoptimizer::new(DeoptConfig {
///     num_threads: Some(4),
///     ..Default::default()
/// });
/// for result in deoptimizer.deoptimize_fasta_file("genes.fasta")? {
///     println!("{}: {:.3} -> {:.3}",
///              result.sequence_info.header,
///              result.sequence_info.native_fop,
///              result.final_fop());
/// }
/// # Ok::<(), deopt_core::types::DeoptError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Deoptimizer {
    /// Run configuration
    pub config: DeoptConfig,
    scorer: FopScorer,
}

impl Deoptimizer {
    /// Creates a deoptimizer scoring against the bundled *E. coli* profile.
    #[must_use]
    pub fn new(config: DeoptConfig) -> Self {
        Self::with_optimal_codons(config, OptimalCodonSet::default())
    }

    /// Creates a deoptimizer scoring against a custom profile.
    #[must_use]
    pub const fn with_optimal_codons(config: DeoptConfig, optimal_codons: OptimalCodonSet) -> Self {
        Self {
            config,
            scorer: FopScorer::new(optimal_codons),
        }
    }

    #[must_use]
    pub const fn scorer(&self) -> &FopScorer {
        &self.scorer
    }

    /// Deoptimizes every record of a FASTA file.
    ///
    /// # Errors
    ///
    /// Returns [`DeoptError`] if the file cannot be read or parsed, or if any
    /// record fails validation or scoring.
    pub fn deoptimize_fasta_file<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Vec<DeoptResults>, DeoptError> {
        let records = read_fasta_sequences(path)?;
        self.deoptimize_records(records)
    }

    /// Deoptimizes every record read from any FASTA source.
    ///
    /// # Errors
    ///
    /// Same as [`Self::deoptimize_fasta_file`].
    pub fn deoptimize_reader<R: Read>(&self, reader: R) -> Result<Vec<DeoptResults>, DeoptError> {
        let records = read_fasta_from(reader)?;
        self.deoptimize_records(records)
    }

    /// Deoptimizes already-parsed FASTA records, in parallel.
    ///
    /// Results come back in input order. The first failing record aborts the
    /// batch.
    ///
    /// # Errors
    ///
    /// [`DeoptError::ThreadPool`] if a dedicated pool was requested and could
    /// not be built, otherwise the first per-record error.
    pub fn deoptimize_records(
        &self,
        records: Vec<FastaRecord>,
    ) -> Result<Vec<DeoptResults>, DeoptError> {
        log::info!("Deoptimizing {} record(s)", records.len());

        let run = || {
            records
                .into_par_iter()
                .enumerate()
                .map(|(i, (header, description, sequence))| {
                    let seed = self.config.seed.map(|s| s.wrapping_add(i as u64));
                    self.deoptimize_seeded(&sequence, header, description, seed)
                })
                .collect::<Result<Vec<_>, _>>()
        };

        match self.config.num_threads {
            Some(num_threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build()
                .map_err(|e| {
                    DeoptError::ThreadPool(format!("Failed to configure thread pool: {e}"))
                })?
                .install(run),
            None => run(),
        }
    }

    /// Deoptimizes a single sequence given as a string.
    ///
    /// `header` defaults to `"Deopt_Seq_1"`.
    ///
    /// # Errors
    ///
    /// Returns [`DeoptError`] if the sequence or configuration is invalid or
    /// the sequence has no scorable codons.
    pub fn deoptimize_sequence(
        &self,
        sequence: &str,
        header: Option<String>,
    ) -> Result<DeoptResults, DeoptError> {
        let header = header.unwrap_or_else(|| "Deopt_Seq_1".to_string());
        self.deoptimize_sequence_bytes(sequence.trim().as_bytes(), header, None)
    }

    /// Deoptimizes a single sequence given as raw bytes.
    ///
    /// # Errors
    ///
    /// Same as [`Self::deoptimize_sequence`].
    pub fn deoptimize_sequence_bytes(
        &self,
        sequence: &[u8],
        header: String,
        description: Option<String>,
    ) -> Result<DeoptResults, DeoptError> {
        self.deoptimize_seeded(sequence, header, description, self.config.seed)
    }

    fn deoptimize_seeded(
        &self,
        sequence: &[u8],
        header: String,
        description: Option<String>,
        seed: Option<u64>,
    ) -> Result<DeoptResults, DeoptError> {
        let params = self.config.stepwise_params();
        // Length problems surface before codon problems
        params.validate(sequence.len())?;
        let coding = CodingSequence::from_bytes(sequence)?;

        let label = record_label(&header, description.as_deref());
        log::info!("Processing {label} ({} bp)", coding.len());

        let mut rng = match seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        let optimizer = CodonOptimizer::new(&self.scorer);
        let trajectory = deoptimize(&optimizer, &coding, &label, &params, &mut rng)?;

        if !trajectory.converged() {
            log::warn!(
                "{label}: {} of {} steps did not reach their target",
                trajectory.steps().filter(|r| !r.converged()).count(),
                trajectory.len() - 1
            );
        }

        Ok(DeoptResults {
            sequence_info: SequenceInfo {
                header,
                description,
                length: coding.len(),
                gc_content: coding.gc_content(),
                native_fop: trajectory.first().score,
            },
            trajectory,
        })
    }

    /// Fop of every record of a FASTA file.
    ///
    /// Records without scorable codons are reported with no Fop rather than
    /// failing the survey.
    ///
    /// # Errors
    ///
    /// Returns [`DeoptError`] if the file cannot be read or a record is not a
    /// valid coding sequence.
    pub fn score_fasta_file<P: AsRef<Path>>(&self, path: P) -> Result<ScoreSummary, DeoptError> {
        let records = read_fasta_sequences(path)?;
        self.score_records(&records)
    }

    /// Fop of every record read from any FASTA source.
    ///
    /// # Errors
    ///
    /// Same as [`Self::score_fasta_file`].
    pub fn score_reader<R: Read>(&self, reader: R) -> Result<ScoreSummary, DeoptError> {
        let records = read_fasta_from(reader)?;
        self.score_records(&records)
    }

    /// Fop of already-parsed FASTA records.
    ///
    /// # Errors
    ///
    /// Returns [`DeoptError`] if a record is not a valid coding sequence.
    pub fn score_records(&self, records: &[FastaRecord]) -> Result<ScoreSummary, DeoptError> {
        let records = records
            .iter()
            .map(|(header, _, sequence)| {
                let coding = CodingSequence::from_bytes(sequence)?;
                let counts = self.scorer.counts(&coding);
                let fop = counts.fraction().ok();
                if fop.is_none() {
                    log::warn!("{header}: no scorable codons");
                }
                Ok(ScoreRecord {
                    header: header.clone(),
                    optimal: counts.optimal,
                    eligible: counts.eligible,
                    fop,
                })
            })
            .collect::<Result<Vec<_>, DeoptError>>()?;

        Ok(ScoreSummary { records })
    }
}

impl Default for Deoptimizer {
    fn default() -> Self {
        Self::new(DeoptConfig::default())
    }
}
