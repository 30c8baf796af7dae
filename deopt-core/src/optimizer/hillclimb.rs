use std::fmt;

use rand::Rng;

use crate::constants::SCORE_EPSILON;
use crate::genetic_code::GeneticCode;
use crate::optimizer::assert_recoding_invariants;
use crate::scoring::SequenceScorer;
use crate::sequence::{CodingSequence, OptimizationWindow};
use crate::types::{Codon, DeoptError};

/// Which way a hillclimb pushes the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Maximize,
    Minimize,
}

impl Direction {
    /// Direction that moves `current` toward `target`.
    #[must_use]
    pub fn toward(current: f64, target: f64) -> Self {
        if target > current {
            Self::Maximize
        } else {
            Self::Minimize
        }
    }
}

/// How a hillclimb run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Score landed within tolerance of the target
    Converged,
    /// Retry budget ran out first
    Exhausted,
    /// An accepted substitution carried the score past the far edge of the
    /// tolerance band
    Overshot,
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Converged => write!(f, "converged"),
            Self::Exhausted => write!(f, "exhausted"),
            Self::Overshot => write!(f, "overshot"),
        }
    }
}

/// Parameters of a single hillclimb run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HillclimbParams {
    pub window: OptimizationWindow,
    /// Target score, 0.0 to 1.0
    pub target: f64,
    /// Half-width of the acceptance band around `target`
    pub tolerance: f64,
    /// Consecutive rejected substitutions allowed before giving up
    pub max_wait_count: usize,
    pub direction: Direction,
}

impl HillclimbParams {
    /// Check parameter ranges against a sequence of `nucleotides` length.
    ///
    /// # Errors
    ///
    /// [`DeoptError::InvalidTarget`], [`DeoptError::InvalidTolerance`],
    /// [`DeoptError::InvalidMaxWait`] or any window error.
    pub fn validate(&self, nucleotides: usize) -> Result<(), DeoptError> {
        if !(0.0..=1.0).contains(&self.target) {
            return Err(DeoptError::InvalidTarget(self.target));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(DeoptError::InvalidTolerance(self.tolerance));
        }
        if self.max_wait_count == 0 {
            return Err(DeoptError::InvalidMaxWait);
        }
        self.window.validate(nucleotides)
    }

    fn within_tolerance(&self, score: f64) -> bool {
        (score - self.target).abs() <= self.tolerance + SCORE_EPSILON
    }

    /// Whether `score` lies beyond the far edge of the tolerance band.
    fn passed_target(&self, score: f64) -> bool {
        let band = self.tolerance + SCORE_EPSILON;
        match self.direction {
            Direction::Maximize => score > self.target + band,
            Direction::Minimize => score < self.target - band,
        }
    }

    /// Strict improvement in the requested direction, crossing the target
    /// included.
    fn accepts(&self, current: f64, candidate: f64) -> bool {
        match self.direction {
            Direction::Maximize => candidate > current,
            Direction::Minimize => candidate < current,
        }
    }
}

/// One synonymous codon swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Substitution {
    /// Codon index within the sequence
    pub position: usize,
    pub from: Codon,
    pub to: Codon,
}

/// Result of a hillclimb run.
#[derive(Debug, Clone)]
pub struct HillclimbOutcome {
    pub sequence: CodingSequence,
    pub score: f64,
    pub status: SearchStatus,
    /// Substitutions kept
    pub accepted: usize,
    /// Substitutions tried, kept or not
    pub attempts: usize,
}

impl HillclimbOutcome {
    #[must_use]
    pub fn converged(&self) -> bool {
        self.status == SearchStatus::Converged
    }
}

/// Local search over synonymous single-codon substitutions.
///
/// # Examples
///
/// ```rust
/// use deopt_core::optimizer::{CodonOptimizer, Direction, HillclimbParams, SearchStatus};
/// use deopt_core::scoring::FopScorer;
/// use deopt_core::sequence::{CodingSequence, OptimizationWindow};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// let optimizer = CodonOptimizer::new(FopScorer::default());
/// let seq: CodingSequence = "CTGCTGCTGCTGCTGCTGCTGCTGCTGCTG".parse()?;
/// let params = HillclimbParams {
///     window: OptimizationWindow::new(0, 0),
///     target: 0.5,
///     tolerance: 0.01,
///     max_wait_count: 1000,
///     direction: Direction::Minimize,
/// };
///
/// let mut rng = ChaCha20Rng::seed_from_u64(7);
/// let outcome = optimizer.hillclimb(&seq, &params, &mut rng)?;
///
/// assert_eq!(outcome.status, SearchStatus::Converged);
/// assert_eq!(outcome.score, 0.5);
/// assert_eq!(outcome.sequence.protein(), seq.protein());
/// # Ok::<(), deopt_core::types::DeoptError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct CodonOptimizer<S> {
    scorer: S,
}

impl<S: SequenceScorer> CodonOptimizer<S> {
    pub const fn new(scorer: S) -> Self {
        Self { scorer }
    }

    pub const fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Codon indices outside the window whose amino acid has a synonym.
    #[must_use]
    pub fn mutable_positions(
        &self,
        sequence: &CodingSequence,
        window: OptimizationWindow,
    ) -> Vec<usize> {
        let code = GeneticCode::standard();
        window
            .mutable_range(sequence.codon_count())
            .filter(|&i| code.is_degenerate(sequence.codon(i)))
            .collect()
    }

    /// Apply one random synonymous substitution outside the window.
    ///
    /// Returns `None` when no position can change.
    pub fn mutate_random<R: Rng + ?Sized>(
        &self,
        sequence: &mut CodingSequence,
        window: OptimizationWindow,
        rng: &mut R,
    ) -> Option<Substitution> {
        let positions = self.mutable_positions(sequence, window);
        random_substitution(sequence, &positions, rng)
    }

    /// Climb toward `params.target` until within tolerance, past it, or out
    /// of patience.
    ///
    /// The input sequence is never modified; the outcome carries a new one.
    ///
    /// # Errors
    ///
    /// Parameter validation errors, or a scoring error if the input cannot
    /// be scored.
    ///
    /// # Panics
    ///
    /// If a substitution ever changes the encoded protein or touches a frozen
    /// window. That is a defect, not a recoverable condition.
    pub fn hillclimb<R: Rng + ?Sized>(
        &self,
        sequence: &CodingSequence,
        params: &HillclimbParams,
        rng: &mut R,
    ) -> Result<HillclimbOutcome, DeoptError> {
        params.validate(sequence.len())?;

        let positions = self.mutable_positions(sequence, params.window);
        let mut current = sequence.clone();
        let mut score = self.scorer.score(&current)?;
        let mut wait_count = 0;
        let mut accepted = 0;
        let mut attempts = 0;

        let status = loop {
            if params.within_tolerance(score) {
                break SearchStatus::Converged;
            }
            // Further moves in this direction only widen the gap
            if params.passed_target(score) {
                break SearchStatus::Overshot;
            }
            if wait_count >= params.max_wait_count {
                break SearchStatus::Exhausted;
            }
            attempts += 1;

            let Some(substitution) = random_substitution(&mut current, &positions, rng) else {
                wait_count += 1;
                continue;
            };
            let candidate = self.scorer.score(&current)?;
            if params.accepts(score, candidate) {
                score = candidate;
                accepted += 1;
                wait_count = 0;
            } else {
                current.replace_codon(substitution.position, substitution.from);
                wait_count += 1;
            }
        };

        assert_recoding_invariants(sequence, &current, params.window);

        log::debug!(
            "Hillclimb {} at Fop {:.4} (target {:.4} ± {}, {} of {} substitutions kept)",
            status,
            score,
            params.target,
            params.tolerance,
            accepted,
            attempts
        );

        Ok(HillclimbOutcome {
            sequence: current,
            score,
            status,
            accepted,
            attempts,
        })
    }
}

/// Pick a position uniformly from `positions` and a synonym uniformly from
/// the alternatives to its current codon, and apply it.
fn random_substitution<R: Rng + ?Sized>(
    sequence: &mut CodingSequence,
    positions: &[usize],
    rng: &mut R,
) -> Option<Substitution> {
    if positions.is_empty() {
        return None;
    }
    let code = GeneticCode::standard();
    let position = positions[rng.gen_range(0..positions.len())];
    let from = sequence.codon(position);
    let synonyms = code.synonyms(code.translate(from));
    if synonyms.len() < 2 {
        return None;
    }

    // Draw from n - 1 slots; the slot holding `from` stands in for the last one
    let mut pick = rng.gen_range(0..synonyms.len() - 1);
    if synonyms[pick] == from {
        pick = synonyms.len() - 1;
    }
    let to = synonyms[pick];
    sequence.replace_codon(position, to);

    Some(Substitution { position, from, to })
}
