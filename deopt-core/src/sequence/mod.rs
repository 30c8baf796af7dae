//! Coding sequences as codon vectors.
//!
//! A [`CodingSequence`] is validated once on construction: its length is a
//! whole number of codons and every symbol is one of A, C, G, T (any case).
//! All later operations work on packed [`Codon`] values.
//!
//! ## Modules
//!
//! - [`io`]: FASTA reading
//!
//! ## Examples
//!
//! ```rust
//! use deopt_core::sequence::CodingSequence;
//!
//! let seq: CodingSequence = "ATGCTGAAATAA".parse()?;
//! assert_eq!(seq.codon_count(), 4);
//! assert_eq!(seq.protein(), "MLK*");
//! # Ok::<(), deopt_core::types::DeoptError>(())
//! ```

pub mod io;

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::constants::CODON_LENGTH;
use crate::genetic_code::GeneticCode;
use crate::types::{AminoAcid, Codon, DeoptError};

pub use io::*;

/// Protein-coding nucleotide sequence stored as codons.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodingSequence {
    codons: Vec<Codon>,
}

impl CodingSequence {
    /// Parse nucleotide bytes.
    ///
    /// # Errors
    ///
    /// - [`DeoptError::InvalidSequenceLength`] if the length is not divisible by 3
    /// - [`DeoptError::InvalidCodon`] if any triplet has a symbol outside {A,C,G,T}
    pub fn from_bytes(sequence: &[u8]) -> Result<Self, DeoptError> {
        if sequence.len() % CODON_LENGTH != 0 {
            return Err(DeoptError::InvalidSequenceLength(sequence.len()));
        }
        let codons = sequence
            .chunks_exact(CODON_LENGTH)
            .map(Codon::from_bytes)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { codons })
    }

    #[must_use]
    pub const fn from_codons(codons: Vec<Codon>) -> Self {
        Self { codons }
    }

    #[must_use]
    pub fn codons(&self) -> &[Codon] {
        &self.codons
    }

    #[must_use]
    pub fn codon(&self, index: usize) -> Codon {
        self.codons[index]
    }

    /// Replace the codon at `index`, returning the previous one.
    pub(crate) fn replace_codon(&mut self, index: usize, codon: Codon) -> Codon {
        std::mem::replace(&mut self.codons[index], codon)
    }

    #[must_use]
    pub fn codon_count(&self) -> usize {
        self.codons.len()
    }

    /// Length in nucleotides
    #[must_use]
    pub fn len(&self) -> usize {
        self.codons.len() * CODON_LENGTH
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codons.is_empty()
    }

    /// Amino acids encoded by each codon, stop codons included.
    #[must_use]
    pub fn translation(&self) -> Vec<AminoAcid> {
        let code = GeneticCode::standard();
        self.codons.iter().map(|&c| code.translate(c)).collect()
    }

    /// Translation as one-letter symbols.
    #[must_use]
    pub fn protein(&self) -> String {
        self.translation().into_iter().map(AminoAcid::symbol).collect()
    }

    /// Uppercase nucleotide bytes
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.codons.iter().flat_map(|c| c.to_bytes()).collect()
    }

    /// Fraction of G and C nucleotides (0.0 to 1.0); 0.0 for an empty sequence.
    #[must_use]
    pub fn gc_content(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let gc = self
            .to_bytes()
            .iter()
            .filter(|&&b| b == b'G' || b == b'C')
            .count();
        gc as f64 / self.len() as f64
    }

    /// Codon indices that differ from `other`.
    ///
    /// Sequences of different lengths are compared over their common prefix.
    #[must_use]
    pub fn differing_positions(&self, other: &Self) -> Vec<usize> {
        self.codons
            .iter()
            .zip(&other.codons)
            .enumerate()
            .filter_map(|(i, (a, b))| (a != b).then_some(i))
            .collect()
    }
}

impl fmt::Display for CodingSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for codon in &self.codons {
            write!(f, "{codon}")?;
        }
        Ok(())
    }
}

impl FromStr for CodingSequence {
    type Err = DeoptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.trim().as_bytes())
    }
}

/// Codons frozen at each end of a sequence.
///
/// `start` codons at the 5′ end and `end` codons at the 3′ end are never
/// mutated. A window is usable for a sequence of `n` codons only when
/// `start + end < n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OptimizationWindow {
    pub start: usize,
    pub end: usize,
}

impl OptimizationWindow {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Check the window against a sequence of `nucleotides` length.
    ///
    /// # Errors
    ///
    /// Returns, in order of checking, [`DeoptError::StartWindowTooLarge`],
    /// [`DeoptError::EndWindowTooLarge`] or
    /// [`DeoptError::WindowsExhaustSequence`].
    pub fn validate(&self, nucleotides: usize) -> Result<(), DeoptError> {
        let codons = nucleotides / CODON_LENGTH;
        if self.start * CODON_LENGTH > nucleotides {
            return Err(DeoptError::StartWindowTooLarge {
                window: self.start,
                codons,
            });
        }
        if self.end * CODON_LENGTH > nucleotides {
            return Err(DeoptError::EndWindowTooLarge {
                window: self.end,
                codons,
            });
        }
        if self.start + self.end >= codons {
            return Err(DeoptError::WindowsExhaustSequence {
                start: self.start,
                end: self.end,
                codons,
            });
        }
        Ok(())
    }

    /// Codon indices open to mutation.
    ///
    /// Empty when the windows cover the whole sequence.
    #[must_use]
    pub fn mutable_range(&self, codon_count: usize) -> Range<usize> {
        let upper = codon_count.saturating_sub(self.end);
        self.start.min(upper)..upper
    }
}
