//! Genetic code and codon optimality tables.
//!
//! The standard genetic code is built once per process and shared read-only.
//! Codons are looked up through their packed index (see [`Codon`]), so
//! translation is a single array access.
//!
//! ## Modules
//!
//! - [`optimal`]: organism-specific sets of optimal codons
//!
//! ## Examples
//!
//! ```rust
//! use deopt_core::genetic_code::GeneticCode;
//! use deopt_core::types::{AminoAcid, Codon};
//!
//! let code = GeneticCode::standard();
//! let codon: Codon = "TGG".parse()?;
//!
//! assert_eq!(code.translate(codon), AminoAcid::Tryptophan);
//! assert_eq!(code.synonyms(AminoAcid::Leucine).len(), 6);
//! assert!(code.synonyms(AminoAcid::Stop).is_empty());
//! # Ok::<(), deopt_core::types::DeoptError>(())
//! ```

pub mod optimal;

use std::sync::LazyLock;

use crate::constants::{NUM_AMINO_ACIDS, NUM_CODONS};
use crate::types::{AminoAcid, Codon, DeoptError};

pub use optimal::OptimalCodonSet;

use AminoAcid::*;

/// Standard code in packed codon order (AAA, AAC, AAG, AAT, ACA, ...).
#[rustfmt::skip]
const STANDARD_TABLE: [AminoAcid; NUM_CODONS] = [
    Lysine, Asparagine, Lysine, Asparagine, // AA*
    Threonine, Threonine, Threonine, Threonine, // AC*
    Arginine, Serine, Arginine, Serine, // AG*
    Isoleucine, Isoleucine, Methionine, Isoleucine, // AT*
    Glutamine, Histidine, Glutamine, Histidine, // CA*
    Proline, Proline, Proline, Proline, // CC*
    Arginine, Arginine, Arginine, Arginine, // CG*
    Leucine, Leucine, Leucine, Leucine, // CT*
    GlutamicAcid, AsparticAcid, GlutamicAcid, AsparticAcid, // GA*
    Alanine, Alanine, Alanine, Alanine, // GC*
    Glycine, Glycine, Glycine, Glycine, // GG*
    Valine, Valine, Valine, Valine, // GT*
    Stop, Tyrosine, Stop, Tyrosine, // TA*
    Serine, Serine, Serine, Serine, // TC*
    Stop, Cysteine, Tryptophan, Cysteine, // TG*
    Leucine, Phenylalanine, Leucine, Phenylalanine, // TT*
];

static STANDARD: LazyLock<GeneticCode> = LazyLock::new(|| GeneticCode::new(STANDARD_TABLE));

/// Codon to amino-acid mapping together with its reverse synonym table.
#[derive(Debug, Clone)]
pub struct GeneticCode {
    forward: [AminoAcid; NUM_CODONS],
    synonyms: [Vec<Codon>; NUM_AMINO_ACIDS],
}

impl GeneticCode {
    fn new(forward: [AminoAcid; NUM_CODONS]) -> Self {
        let mut synonyms: [Vec<Codon>; NUM_AMINO_ACIDS] = Default::default();
        for codon in Codon::all() {
            let aa = forward[codon.index()];
            // Stop codons are never offered as substitutions
            if !aa.is_stop() {
                synonyms[aa.to_index()].push(codon);
            }
        }
        Self { forward, synonyms }
    }

    /// The standard genetic code (NCBI table 1).
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    #[must_use]
    pub fn translate(&self, codon: Codon) -> AminoAcid {
        self.forward[codon.index()]
    }

    /// Translate a raw nucleotide triplet.
    ///
    /// # Errors
    ///
    /// Returns [`DeoptError::InvalidCodon`] for anything other than three
    /// symbols from {A,C,G,T}.
    pub fn translate_triplet(&self, triplet: &[u8]) -> Result<AminoAcid, DeoptError> {
        Codon::from_bytes(triplet).map(|codon| self.translate(codon))
    }

    /// All codons encoding `amino_acid`, in index order. Empty for [`AminoAcid::Stop`].
    #[must_use]
    pub fn synonyms(&self, amino_acid: AminoAcid) -> &[Codon] {
        &self.synonyms[amino_acid.to_index()]
    }

    /// Number of codons encoding the amino acid (0 for stop).
    #[must_use]
    pub fn degeneracy(&self, amino_acid: AminoAcid) -> usize {
        self.synonyms(amino_acid).len()
    }

    /// Whether a codon can be swapped for a synonym without changing the protein.
    #[must_use]
    pub fn is_degenerate(&self, codon: Codon) -> bool {
        self.degeneracy(self.translate(codon)) >= 2
    }

    /// Whether `codon` belongs to the optimal subset of its amino acid.
    #[must_use]
    pub fn is_optimal(&self, codon: Codon, optimal_set: &OptimalCodonSet) -> bool {
        optimal_set.is_scored(self.translate(codon)) && optimal_set.is_optimal(codon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codon(s: &str) -> Codon {
        s.parse().unwrap()
    }

    #[test]
    fn test_translate_known_codons() {
        let code = GeneticCode::standard();
        assert_eq!(code.translate(codon("ATG")), Methionine);
        assert_eq!(code.translate(codon("TGG")), Tryptophan);
        assert_eq!(code.translate(codon("TAA")), Stop);
        assert_eq!(code.translate(codon("TAG")), Stop);
        assert_eq!(code.translate(codon("TGA")), Stop);
        assert_eq!(code.translate(codon("GCT")), Alanine);
        assert_eq!(code.translate(codon("AGA")), Arginine);
        assert_eq!(code.translate(codon("AGC")), Serine);
        assert_eq!(code.translate(codon("TTA")), Leucine);
        assert_eq!(code.translate(codon("TTC")), Phenylalanine);
    }

    #[test]
    fn test_translate_triplet_rejects_invalid_symbols() {
        let code = GeneticCode::standard();
        assert_eq!(code.translate_triplet(b"gac").unwrap(), AsparticAcid);
        assert!(matches!(
            code.translate_triplet(b"GXC"),
            Err(DeoptError::InvalidCodon(_))
        ));
    }

    #[test]
    fn test_degeneracy_matches_standard_code() {
        let code = GeneticCode::standard();
        let expected = [
            (Alanine, 4),
            (Arginine, 6),
            (Asparagine, 2),
            (AsparticAcid, 2),
            (Cysteine, 2),
            (GlutamicAcid, 2),
            (Glutamine, 2),
            (Glycine, 4),
            (Histidine, 2),
            (Isoleucine, 3),
            (Leucine, 6),
            (Lysine, 2),
            (Methionine, 1),
            (Phenylalanine, 2),
            (Proline, 4),
            (Serine, 6),
            (Threonine, 4),
            (Tryptophan, 1),
            (Tyrosine, 2),
            (Valine, 4),
            (Stop, 0),
        ];
        for (aa, n) in expected {
            assert_eq!(code.degeneracy(aa), n, "degeneracy of {aa}");
        }
        let total: usize = AminoAcid::ALL.iter().map(|&aa| code.degeneracy(aa)).sum();
        assert_eq!(total, 61);
    }

    #[test]
    fn test_synonyms_translate_back() {
        let code = GeneticCode::standard();
        for aa in AminoAcid::ALL {
            for &c in code.synonyms(aa) {
                assert_eq!(code.translate(c), aa);
            }
        }
    }

    #[test]
    fn test_is_degenerate() {
        let code = GeneticCode::standard();
        assert!(!code.is_degenerate(codon("ATG")));
        assert!(!code.is_degenerate(codon("TGG")));
        assert!(!code.is_degenerate(codon("TAA")));
        assert!(code.is_degenerate(codon("AAA")));
        assert!(code.is_degenerate(codon("CTG")));
    }

    #[test]
    fn test_is_optimal_with_default_profile() {
        let code = GeneticCode::standard();
        let set = OptimalCodonSet::e_coli();
        assert!(code.is_optimal(codon("CTG"), &set));
        assert!(!code.is_optimal(codon("CTA"), &set));
        assert!(code.is_optimal(codon("GTA"), &set));
        // Lysine has no optimal subset in the E. coli profile
        assert!(!code.is_optimal(codon("AAA"), &set));
        assert!(!code.is_optimal(codon("ATG"), &set));
    }
}
