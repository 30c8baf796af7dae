// =============================================================================
// Sequence layout
// =============================================================================

/// Version string for deopt
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Length of a codon in base pairs
pub const CODON_LENGTH: usize = 3;

/// Number of distinct codons over {A,C,G,T}
pub const NUM_CODONS: usize = 64;

/// Number of amino-acid symbols including the stop symbol
pub const NUM_AMINO_ACIDS: usize = 21;

/// Symbol used for translation stops
pub const STOP_SYMBOL: char = '*';

// =============================================================================
// Trajectory defaults
// =============================================================================

/// Codons left untouched at the 5′ end of the sequence
pub const DEFAULT_START_WINDOW: usize = 14;

/// Codons left untouched at the 3′ end of the sequence
pub const DEFAULT_END_WINDOW: usize = 14;

/// Fop increment between consecutive trajectory steps
pub const DEFAULT_FOP_STEP: f64 = -0.1;

/// Final Fop the trajectory walks toward
pub const DEFAULT_FOP_STOP: f64 = 0.1;

/// Acceptance band around each step target
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Unsuccessful substitutions tolerated by a single hillclimb run
pub const DEFAULT_MAX_WAIT_COUNT: usize = 5000;

/// Slack added to tolerance comparisons to absorb floating-point rounding
pub const SCORE_EPSILON: f64 = 1e-9;

// =============================================================================
// Output
// =============================================================================

/// Decimal places used when embedding Fop values in annotations
pub const SCORE_PRECISION: usize = 6;
