use crate::optimizer::SearchStatus;
use crate::sequence::CodingSequence;

/// One entry of a deoptimization trajectory.
///
/// The first record of every trajectory is the unmodified input and has no
/// `target` or `status`. Every later record is the outcome of one hillclimb.
#[derive(Debug, Clone)]
pub struct TrajectoryRecord {
    /// Recoded sequence at this step.
    pub sequence: CodingSequence,

    /// Fop achieved, 0.0 to 1.0.
    pub score: f64,

    /// Human-readable annotation: record label, achieved Fop and frozen
    /// window sizes.
    pub description: String,

    /// Fop the step was aiming for.
    pub target: Option<f64>,

    /// Whether the step reached its target.
    pub status: Option<SearchStatus>,
}

impl TrajectoryRecord {
    /// Whether this is the unmodified input record.
    #[must_use]
    pub const fn is_initial(&self) -> bool {
        self.target.is_none()
    }

    /// True for the input record and for steps that landed within
    /// tolerance of their target.
    #[must_use]
    pub fn converged(&self) -> bool {
        self.status.is_none_or(|s| s == SearchStatus::Converged)
    }
}

/// Ordered, non-empty list of trajectory records.
///
/// Built by the stepwise driver and read-only afterwards.
///
/// # Examples
///
/// ```rust
/// use deopt_core::{Deoptimizer, config::DeoptConfig};
///
/// let config = DeoptConfig {
///     start_window: 0,
///     end_window: 0,
///     seed: Some(1),
///     ..DeoptConfig::default()
/// };
/// let deoptimizer = Deoptimizer::new(config);
/// let results = deoptimizer.deoptimize_sequence(&"CTG".repeat(30), Some("demo".into()))?;
///
/// let trajectory = &results.trajectory;
/// assert_eq!(trajectory.first().score, 1.0);
/// for (sequence, description, score) in trajectory.as_tuples() {
///     println!("{description}\t{score:.3}\t{sequence}");
/// }
/// # Ok::<(), deopt_core::types::DeoptError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Trajectory {
    records: Vec<TrajectoryRecord>,
}

impl Trajectory {
    pub(crate) fn new(initial: TrajectoryRecord) -> Self {
        Self {
            records: vec![initial],
        }
    }

    pub(crate) fn push(&mut self, record: TrajectoryRecord) {
        self.records.push(record);
    }

    #[must_use]
    pub fn records(&self) -> &[TrajectoryRecord] {
        &self.records
    }

    /// The unmodified input.
    #[must_use]
    pub fn first(&self) -> &TrajectoryRecord {
        &self.records[0]
    }

    /// Outcome of the final step.
    #[must_use]
    pub fn last(&self) -> &TrajectoryRecord {
        &self.records[self.records.len() - 1]
    }

    /// Number of records, the initial one included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; a trajectory holds at least its input.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Records produced by a search step, i.e. all but the first.
    pub fn steps(&self) -> impl Iterator<Item = &TrajectoryRecord> {
        self.records.iter().skip(1)
    }

    /// Step targets in order.
    #[must_use]
    pub fn targets(&self) -> Vec<f64> {
        self.records.iter().filter_map(|r| r.target).collect()
    }

    /// Whether every search step converged.
    #[must_use]
    pub fn converged(&self) -> bool {
        self.records.iter().all(TrajectoryRecord::converged)
    }

    /// `(sequence, description, score)` per record.
    pub fn as_tuples(&self) -> impl Iterator<Item = (String, &str, f64)> {
        self.records
            .iter()
            .map(|r| (r.sequence.to_string(), r.description.as_str(), r.score))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrajectoryRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a TrajectoryRecord;
    type IntoIter = std::slice::Iter<'a, TrajectoryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Deoptimization results for one input sequence.
///
/// # Fields
///
/// - `trajectory`: every recoded variant, input first
/// - `sequence_info`: metadata about the input
#[derive(Debug, Clone)]
pub struct DeoptResults {
    pub trajectory: Trajectory,
    pub sequence_info: SequenceInfo,
}

impl DeoptResults {
    /// Fop of the final variant.
    #[must_use]
    pub fn final_fop(&self) -> f64 {
        self.trajectory.last().score
    }
}

/// Information about a processed sequence.
///
/// # Examples
///
/// ```rust
/// # use deopt_core::results::SequenceInfo;
/// let info = SequenceInfo {
///     header: "gfp".to_string(),
///     description: Some("superfolder GFP".to_string()),
///     length: 717,
///     gc_content: 0.43,
///     native_fop: 0.61,
/// };
///
/// println!("{}: {} bp, {:.2}% GC, Fop {:.3}",
///          info.header,
///          info.length,
///          info.gc_content * 100.0,
///          info.native_fop);
/// ```
#[derive(Debug, Clone)]
pub struct SequenceInfo {
    /// Sequence identifier from the FASTA header.
    pub header: String,

    /// Everything after the first word of the FASTA header line.
    pub description: Option<String>,

    /// Length in nucleotides.
    pub length: usize,

    /// GC content as a fraction (0.0 to 1.0).
    pub gc_content: f64,

    /// Fop of the unmodified sequence.
    pub native_fop: f64,
}

/// Fop of one record, as reported by the `score` surface.
#[derive(Debug, Clone)]
pub struct ScoreRecord {
    pub header: String,
    pub optimal: usize,
    pub eligible: usize,
    /// `None` when the record has no scorable codons
    pub fop: Option<f64>,
}

/// Per-record Fop values and their mean.
#[derive(Debug, Clone, Default)]
pub struct ScoreSummary {
    pub records: Vec<ScoreRecord>,
}

impl ScoreSummary {
    /// Mean Fop over records that have one.
    #[must_use]
    pub fn mean_fop(&self) -> Option<f64> {
        let scores: Vec<f64> = self.records.iter().filter_map(|r| r.fop).collect();
        if scores.is_empty() {
            return None;
        }
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}
