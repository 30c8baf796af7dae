use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{CODON_LENGTH, NUM_AMINO_ACIDS, NUM_CODONS, STOP_SYMBOL};

/// Amino-acid symbols produced by translation, including the stop symbol.
///
/// Discriminants are stable and used as table indices.
///
/// # Examples
///
/// ```rust
/// use deopt_core::types::AminoAcid;
///
/// assert_eq!(AminoAcid::Leucine.symbol(), 'L');
/// assert_eq!(AminoAcid::from_symbol('*'), Some(AminoAcid::Stop));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AminoAcid {
    Alanine,
    Arginine,
    Asparagine,
    AsparticAcid,
    Cysteine,
    GlutamicAcid,
    Glutamine,
    Glycine,
    Histidine,
    Isoleucine,
    Leucine,
    Lysine,
    Methionine,
    Phenylalanine,
    Proline,
    Serine,
    Threonine,
    Tryptophan,
    Tyrosine,
    Valine,
    Stop,
}

impl AminoAcid {
    /// All symbols in discriminant order.
    pub const ALL: [Self; NUM_AMINO_ACIDS] = [
        Self::Alanine,
        Self::Arginine,
        Self::Asparagine,
        Self::AsparticAcid,
        Self::Cysteine,
        Self::GlutamicAcid,
        Self::Glutamine,
        Self::Glycine,
        Self::Histidine,
        Self::Isoleucine,
        Self::Leucine,
        Self::Lysine,
        Self::Methionine,
        Self::Phenylalanine,
        Self::Proline,
        Self::Serine,
        Self::Threonine,
        Self::Tryptophan,
        Self::Tyrosine,
        Self::Valine,
        Self::Stop,
    ];

    /// One-letter IUPAC symbol (`*` for stop).
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Alanine => 'A',
            Self::Arginine => 'R',
            Self::Asparagine => 'N',
            Self::AsparticAcid => 'D',
            Self::Cysteine => 'C',
            Self::GlutamicAcid => 'E',
            Self::Glutamine => 'Q',
            Self::Glycine => 'G',
            Self::Histidine => 'H',
            Self::Isoleucine => 'I',
            Self::Leucine => 'L',
            Self::Lysine => 'K',
            Self::Methionine => 'M',
            Self::Phenylalanine => 'F',
            Self::Proline => 'P',
            Self::Serine => 'S',
            Self::Threonine => 'T',
            Self::Tryptophan => 'W',
            Self::Tyrosine => 'Y',
            Self::Valine => 'V',
            Self::Stop => STOP_SYMBOL,
        }
    }

    /// Parse a one-letter symbol (case-insensitive).
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        let upper = symbol.to_ascii_uppercase();
        Self::ALL.into_iter().find(|aa| aa.symbol() == upper)
    }

    /// Table index of this amino acid
    #[must_use]
    pub const fn to_index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn is_stop(self) -> bool {
        matches!(self, Self::Stop)
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Converts a nucleotide character to its 2-bit value.
///
/// A=0, C=1, G=2, T=3; `None` for anything else. Lowercase is accepted.
#[must_use]
pub const fn nucleotide_value(c: u8) -> Option<u8> {
    match c.to_ascii_uppercase() {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

const NUCLEOTIDES: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// A nucleotide triplet packed into a single byte.
///
/// The first base occupies the most significant bit pair, so codon indices
/// follow lexicographic `AAA, AAC, AAG, AAT, ACA, ...` order.
///
/// # Examples
///
/// ```rust
/// use deopt_core::types::Codon;
///
/// let codon: Codon = "ctg".parse()?;
/// assert_eq!(codon.to_string(), "CTG");
/// assert_eq!(codon.index(), 30);
/// # Ok::<(), deopt_core::types::DeoptError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Codon(u8);

impl Codon {
    /// Build a codon from its packed index.
    ///
    /// Returns `None` when `index >= 64`.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < NUM_CODONS {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Parse three nucleotide symbols.
    ///
    /// # Errors
    ///
    /// Returns [`DeoptError::InvalidCodon`] if the slice is not exactly three
    /// symbols long or contains a symbol outside {A,C,G,T}.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DeoptError> {
        let invalid = || DeoptError::InvalidCodon(String::from_utf8_lossy(bytes).into_owned());
        if bytes.len() != CODON_LENGTH {
            return Err(invalid());
        }
        let mut index = 0u8;
        for &b in bytes {
            let value = nucleotide_value(b).ok_or_else(invalid)?;
            index = (index << 2) | value;
        }
        Ok(Self(index))
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Uppercase nucleotide triplet
    #[must_use]
    pub const fn to_bytes(self) -> [u8; CODON_LENGTH] {
        [
            NUCLEOTIDES[(self.0 >> 4) as usize & 0b11],
            NUCLEOTIDES[(self.0 >> 2) as usize & 0b11],
            NUCLEOTIDES[self.0 as usize & 0b11],
        ]
    }

    /// Iterate over all 64 codons in index order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..NUM_CODONS as u8).map(Self)
    }
}

impl fmt::Display for Codon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes();
        // Always ASCII
        write!(f, "{}{}{}", bytes[0] as char, bytes[1] as char, bytes[2] as char)
    }
}

impl FromStr for Codon {
    type Err = DeoptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

/// Error types for deoptimization operations.
///
/// Validation and scoring failures are reported before any sequence is
/// mutated. Invariant violations are not represented here; they panic.
#[derive(Error, Debug)]
pub enum DeoptError {
    /// Nucleotide count is not a whole number of codons
    #[error("Sequence length must be divisible by 3 (no partial codons), got {0} nt")]
    InvalidSequenceLength(usize),
    /// Triplet contains a symbol outside {A,C,G,T}
    #[error("Invalid codon: {0:?}")]
    InvalidCodon(String),
    /// Fop step outside 0 < |step| < 1
    #[error("Fop step out of range (0 < |{0}| < 1 fails)")]
    InvalidFopStep(f64),
    /// Fop stop outside 0 < stop < 1
    #[error("Fop stop out of range (0 < {0} < 1 fails)")]
    InvalidFopStop(f64),
    /// Hillclimb target outside [0, 1]
    #[error("Target score out of range (0 <= {0} <= 1 fails)")]
    InvalidTarget(f64),
    /// Tolerance is not a positive finite number
    #[error("Tolerance must be positive, got {0}")]
    InvalidTolerance(f64),
    /// Retry budget of zero
    #[error("Maximum wait count must be positive")]
    InvalidMaxWait,
    /// 5′ window longer than the sequence
    #[error("Entire sequence excluded by start window ({window} codons, sequence has {codons})")]
    StartWindowTooLarge { window: usize, codons: usize },
    /// 3′ window longer than the sequence
    #[error("Entire sequence excluded by end window ({window} codons, sequence has {codons})")]
    EndWindowTooLarge { window: usize, codons: usize },
    /// Both windows together leave nothing to mutate
    #[error(
        "Entire sequence excluded by the sum of start and end windows ({start} + {end} codons, sequence has {codons})"
    )]
    WindowsExhaustSequence {
        start: usize,
        end: usize,
        codons: usize,
    },
    /// No codon position is eligible for Fop scoring
    #[error("No scorable codons: Fop is undefined")]
    NoScorableCodons,
    /// Optimal codon profile is malformed
    #[error("Invalid optimal codon set: {0}")]
    InvalidOptimalCodonSet(String),
    /// Worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
    /// Error parsing input data
    #[error("Parse error: {0}")]
    ParseError(String),
    /// File I/O operation failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
