//! Fraction-of-optimal-codons (Fop) scoring.
//!
//! Fop counts only positions whose amino acid has an optimal subset in the
//! active [`OptimalCodonSet`]; methionine, tryptophan, stop codons and any
//! residue missing from the profile are skipped entirely.

use crate::genetic_code::{GeneticCode, OptimalCodonSet};
use crate::sequence::CodingSequence;
use crate::types::DeoptError;

/// Anything that assigns a numeric score to a coding sequence.
///
/// The hillclimb search is generic over this trait, so alternative metrics
/// can be driven by the same optimizer.
pub trait SequenceScorer {
    /// Score `sequence`. Must be deterministic.
    ///
    /// # Errors
    ///
    /// Implementations return an error when the score is undefined for the
    /// given sequence.
    fn score(&self, sequence: &CodingSequence) -> Result<f64, DeoptError>;
}

impl<T: SequenceScorer + ?Sized> SequenceScorer for &T {
    fn score(&self, sequence: &CodingSequence) -> Result<f64, DeoptError> {
        (**self).score(sequence)
    }
}

/// Raw counts behind a Fop value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FopCounts {
    /// Scored positions using an optimal codon
    pub optimal: usize,
    /// Positions eligible for scoring
    pub eligible: usize,
}

impl FopCounts {
    /// `optimal / eligible`.
    ///
    /// # Errors
    ///
    /// Returns [`DeoptError::NoScorableCodons`] when nothing is eligible.
    pub fn fraction(&self) -> Result<f64, DeoptError> {
        if self.eligible == 0 {
            return Err(DeoptError::NoScorableCodons);
        }
        Ok(self.optimal as f64 / self.eligible as f64)
    }
}

/// Scores sequences by their fraction of optimal codons.
///
/// Defaults to the bundled *E. coli* profile.
///
/// # Examples
///
/// ```rust
/// use deopt_core::scoring::{FopScorer, SequenceScorer};
/// use deopt_core::sequence::CodingSequence;
///
/// let scorer = FopScorer::default();
/// // CTG is optimal for Leu, CTA is not; ATG is never scored
/// let seq: CodingSequence = "ATGCTGCTA".parse()?;
/// assert_eq!(scorer.score(&seq)?, 0.5);
/// # Ok::<(), deopt_core::types::DeoptError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct FopScorer {
    optimal_codons: OptimalCodonSet,
}

impl FopScorer {
    #[must_use]
    pub const fn new(optimal_codons: OptimalCodonSet) -> Self {
        Self { optimal_codons }
    }

    #[must_use]
    pub const fn optimal_codons(&self) -> &OptimalCodonSet {
        &self.optimal_codons
    }

    /// Count eligible and optimal positions.
    #[must_use]
    pub fn counts(&self, sequence: &CodingSequence) -> FopCounts {
        let code = GeneticCode::standard();
        sequence
            .codons()
            .iter()
            .filter(|&&codon| self.optimal_codons.is_scored(code.translate(codon)))
            .fold(FopCounts::default(), |mut counts, &codon| {
                counts.eligible += 1;
                if self.optimal_codons.is_optimal(codon) {
                    counts.optimal += 1;
                }
                counts
            })
    }
}

impl SequenceScorer for FopScorer {
    fn score(&self, sequence: &CodingSequence) -> Result<f64, DeoptError> {
        self.counts(sequence).fraction()
    }
}
