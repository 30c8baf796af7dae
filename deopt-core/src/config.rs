use std::fmt;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_END_WINDOW, DEFAULT_FOP_STEP, DEFAULT_FOP_STOP, DEFAULT_MAX_WAIT_COUNT,
    DEFAULT_START_WINDOW, DEFAULT_TOLERANCE,
};
use crate::optimizer::StepwiseParams;
use crate::sequence::OptimizationWindow;
use crate::types::DeoptError;

/// Output format options for deoptimization trajectories.
///
/// # Formats
///
/// - **FASTA**: one record per trajectory entry, annotation in the header
/// - **TSV**: one tab-separated row per entry with step, target and status
///
/// # Examples
///
/// ```rust
/// use deopt_core::config::{DeoptConfig, OutputFormat};
///
/// let config = DeoptConfig {
///     output_format: OutputFormat::Tsv,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// FASTA records named `<header>_<step>`.
    ///
    /// The record description carries the annotation, so the file can be
    /// fed straight into synthesis or alignment tools.
    #[default]
    Fasta,

    /// Tab-separated table with a header row.
    ///
    /// Columns: `id`, `step`, `target`, `fop`, `status`, `sequence`.
    Tsv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fasta => write!(f, "fasta"),
            Self::Tsv => write!(f, "tsv"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = DeoptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fasta" | "fa" => Ok(Self::Fasta),
            "tsv" => Ok(Self::Tsv),
            other => Err(DeoptError::ParseError(format!(
                "unknown output format {other:?}"
            ))),
        }
    }
}

/// Configuration settings for a deoptimization run.
///
/// # Examples
///
/// ## Default configuration
///
/// ```rust
/// use deopt_core::config::DeoptConfig;
///
/// let config = DeoptConfig::default();
/// assert_eq!(config.fop_stop, 0.1);
/// ```
///
/// ## Walk upward with a fixed seed
///
/// ```rust
/// use deopt_core::config::DeoptConfig;
///
/// let config = DeoptConfig {
///     fop_step: 0.05,
///     fop_stop: 0.9,
///     seed: Some(42),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct DeoptConfig {
    /// Codons left unchanged at the 5′ end.
    ///
    /// **Default**: 14
    pub start_window: usize,

    /// Codons left unchanged at the 3′ end.
    ///
    /// **Default**: 14
    pub end_window: usize,

    /// Signed Fop change per trajectory step.
    ///
    /// Negative values deoptimize, positive values optimize. Must satisfy
    /// `0 < |fop_step| < 1`.
    ///
    /// **Default**: -0.1
    pub fop_step: f64,

    /// Fop the trajectory ends at, strictly between 0 and 1.
    ///
    /// **Default**: 0.1
    pub fop_stop: f64,

    /// Acceptance band around each step target.
    ///
    /// **Default**: 0.01
    pub tolerance: f64,

    /// Consecutive rejected substitutions before a step gives up.
    ///
    /// **Default**: 5000
    pub max_wait_count: usize,

    /// Seed for the random number generator.
    ///
    /// Record `i` of a multi-record input is seeded with `seed + i`.
    ///
    /// **Default**: `None` (seeded from entropy)
    pub seed: Option<u64>,

    /// Output format for trajectories.
    ///
    /// **Default**: [`OutputFormat::Fasta`]
    pub output_format: OutputFormat,

    /// Number of threads used to process multi-record inputs.
    ///
    /// **Default**: `None` (use all available cores)
    pub num_threads: Option<usize>,
}

impl Default for DeoptConfig {
    fn default() -> Self {
        Self {
            start_window: DEFAULT_START_WINDOW,
            end_window: DEFAULT_END_WINDOW,
            fop_step: DEFAULT_FOP_STEP,
            fop_stop: DEFAULT_FOP_STOP,
            tolerance: DEFAULT_TOLERANCE,
            max_wait_count: DEFAULT_MAX_WAIT_COUNT,
            seed: None,
            output_format: OutputFormat::Fasta,
            num_threads: None,
        }
    }
}

impl DeoptConfig {
    #[must_use]
    pub const fn window(&self) -> OptimizationWindow {
        OptimizationWindow::new(self.start_window, self.end_window)
    }

    /// Trajectory parameters carried by this configuration.
    #[must_use]
    pub const fn stepwise_params(&self) -> StepwiseParams {
        StepwiseParams {
            fop_step: self.fop_step,
            fop_stop: self.fop_stop,
            window: self.window(),
            tolerance: self.tolerance,
            max_wait_count: self.max_wait_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_stepwise_defaults() {
        let config = DeoptConfig::default();
        assert_eq!(config.stepwise_params(), StepwiseParams::default());
        assert_eq!(config.output_format, OutputFormat::Fasta);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("fasta".parse::<OutputFormat>().unwrap(), OutputFormat::Fasta);
        assert_eq!("TSV".parse::<OutputFormat>().unwrap(), OutputFormat::Tsv);
        assert!("gff".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Tsv.to_string(), "tsv");
    }

    #[test]
    fn test_stepwise_params_follow_config() {
        let config = DeoptConfig {
            start_window: 3,
            end_window: 4,
            fop_step: 0.2,
            tolerance: 0.05,
            ..Default::default()
        };
        let params = config.stepwise_params();
        assert_eq!(params.window, OptimizationWindow::new(3, 4));
        assert_eq!(params.fop_step, 0.2);
        assert_eq!(params.tolerance, 0.05);
    }
}
