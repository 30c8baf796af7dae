use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::genetic_code::GeneticCode;
use crate::types::{AminoAcid, Codon, DeoptError};

/// Optimal codons of *E. coli* (Zhou et al. 2009).
const E_COLI: &[(char, &[&str])] = &[
    ('A', &["GCT"]),
    ('R', &["CGT", "CGC"]),
    ('N', &["AAC"]),
    ('D', &["GAC"]),
    ('C', &["TGC"]),
    ('Q', &["CAG"]),
    ('E', &["GAA"]),
    ('G', &["GGT", "GGC"]),
    ('H', &["CAC"]),
    ('I', &["ATC"]),
    ('L', &["CTG"]),
    ('F', &["TTC"]),
    ('P', &["CCG"]),
    ('S', &["TCT", "TCC"]),
    ('T', &["ACT", "ACC"]),
    ('Y', &["TAC"]),
    ('V', &["GTT", "GTA"]),
];

/// On-disk form of a codon profile.
///
/// ```toml
/// name = "my organism"
///
/// [codons]
/// A = ["GCT"]
/// L = ["CTG"]
/// ```
#[derive(Debug, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    name: Option<String>,
    codons: BTreeMap<String, Vec<String>>,
}

/// Set of codons considered optimal for each amino acid of an organism.
///
/// Only amino acids with an entry, at least two synonymous codons and a
/// non-stop symbol are eligible for scoring. Lookups are bitmask tests.
///
/// # Examples
///
/// ```rust
/// use deopt_core::genetic_code::OptimalCodonSet;
/// use deopt_core::types::{AminoAcid, Codon};
///
/// let set = OptimalCodonSet::default();
/// assert!(set.is_scored(AminoAcid::Leucine));
/// assert!(!set.is_scored(AminoAcid::Lysine));
/// assert!(set.is_optimal("CTG".parse::<Codon>()?));
/// # Ok::<(), deopt_core::types::DeoptError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimalCodonSet {
    name: String,
    /// Bit `i` set when codon with index `i` is optimal
    optimal: u64,
    /// Bit `i` set when amino acid with index `i` is scored
    scored: u32,
}

impl OptimalCodonSet {
    /// Bundled *E. coli* profile.
    #[must_use]
    pub fn e_coli() -> Self {
        let table = E_COLI
            .iter()
            .map(|(aa, codons)| {
                (
                    aa.to_string(),
                    codons.iter().map(|c| (*c).to_string()).collect(),
                )
            })
            .collect();
        // The bundled table is known to be well-formed
        Self::from_table("E. coli (Zhou et al. 2009)", &table)
            .unwrap_or_else(|e| unreachable!("bundled profile rejected: {e}"))
    }

    /// Build a profile from amino-acid symbols mapped to codon strings.
    ///
    /// Single-codon residues, the stop symbol and empty entries are accepted
    /// but excluded from scoring.
    ///
    /// # Errors
    ///
    /// Returns [`DeoptError::InvalidOptimalCodonSet`] when a key is not a
    /// single amino-acid symbol, a codon is malformed, or a codon does not
    /// encode the amino acid it is listed under.
    pub fn from_table(
        name: &str,
        table: &BTreeMap<String, Vec<String>>,
    ) -> Result<Self, DeoptError> {
        let code = GeneticCode::standard();
        let mut optimal = 0u64;
        let mut scored = 0u32;

        for (key, codons) in table {
            let aa = parse_amino_acid(key)?;
            let mut parsed = Vec::with_capacity(codons.len());
            for codon in codons {
                let c: Codon = codon.parse().map_err(|_| {
                    DeoptError::InvalidOptimalCodonSet(format!(
                        "malformed codon {codon:?} listed for {aa}"
                    ))
                })?;
                let encoded = code.translate(c);
                if encoded != aa {
                    return Err(DeoptError::InvalidOptimalCodonSet(format!(
                        "codon {c} encodes {encoded}, not {aa}"
                    )));
                }
                parsed.push(c);
            }

            if aa.is_stop() || code.degeneracy(aa) < 2 {
                log::warn!("Ignoring optimal codons for {aa}: no synonymous alternatives");
                continue;
            }
            if parsed.is_empty() {
                continue;
            }

            scored |= 1 << aa.to_index();
            for c in parsed {
                optimal |= 1 << c.index();
            }
        }

        Ok(Self {
            name: name.to_string(),
            optimal,
            scored,
        })
    }

    /// Parse a TOML profile: an optional `name` and a `[codons]` table.
    ///
    /// # Errors
    ///
    /// Returns [`DeoptError::ParseError`] for malformed TOML and
    /// [`DeoptError::InvalidOptimalCodonSet`] for bad table contents.
    pub fn from_toml_str(s: &str) -> Result<Self, DeoptError> {
        let file: ProfileFile =
            toml::from_str(s).map_err(|e| DeoptError::ParseError(e.to_string()))?;
        let name = file.name.as_deref().unwrap_or("custom");
        Self::from_table(name, &file.codons)
    }

    /// Load a TOML profile from disk.
    ///
    /// # Errors
    ///
    /// Returns [`DeoptError::IoError`] if the file cannot be read, otherwise
    /// the same errors as [`Self::from_toml_str`].
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, DeoptError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether positions coding for `amino_acid` count toward Fop.
    #[must_use]
    pub const fn is_scored(&self, amino_acid: AminoAcid) -> bool {
        self.scored & (1 << amino_acid.to_index()) != 0
    }

    #[must_use]
    pub const fn is_optimal(&self, codon: Codon) -> bool {
        self.optimal & (1 << codon.index()) != 0
    }

    /// Optimal codons for `amino_acid`, in index order.
    #[must_use]
    pub fn optimal_codons(&self, amino_acid: AminoAcid) -> Vec<Codon> {
        if !self.is_scored(amino_acid) {
            return Vec::new();
        }
        GeneticCode::standard()
            .synonyms(amino_acid)
            .iter()
            .copied()
            .filter(|&c| self.is_optimal(c))
            .collect()
    }

    /// Amino acids that count toward Fop.
    pub fn scored_amino_acids(&self) -> impl Iterator<Item = AminoAcid> + '_ {
        AminoAcid::ALL.into_iter().filter(|&aa| self.is_scored(aa))
    }
}

impl Default for OptimalCodonSet {
    fn default() -> Self {
        Self::e_coli()
    }
}

fn parse_amino_acid(key: &str) -> Result<AminoAcid, DeoptError> {
    let mut chars = key.trim().chars();
    let amino_acid = match (chars.next(), chars.next()) {
        (Some(c), None) => AminoAcid::from_symbol(c),
        _ => None,
    };
    amino_acid.ok_or_else(|| DeoptError::InvalidOptimalCodonSet(format!("unknown amino acid {key:?}")))
}
