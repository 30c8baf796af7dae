//! Output formatting for deoptimization results.
//!
//! ## Supported Formats
//!
//! - **FASTA**: one record per trajectory entry, written with rust-bio
//! - **TSV**: tab-separated trajectory table
//!
//! Fop surveys of whole files are written with [`write_scores`].
//!
//! ## Examples
//!
//! ```rust,no_run
//! use deopt_core::{Deoptimizer, config::{DeoptConfig, OutputFormat}};
//! use deopt_core::output::write_results;
//! use std::fs::File;
//!
//! let deoptimizer = Deoptimizer::new(DeoptConfig::default());
//! let results = deoptimizer.deoptimize_fasta_file("gfp.fasta")?;
//!
//! let mut output = File::create("gfp_trajectory.fasta")?;
//! for result in &results {
//!     write_results(&mut output, result, OutputFormat::Fasta)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::{DeoptError, config::OutputFormat, results::DeoptResults, results::ScoreSummary};
use std::io::Write;

mod formats {
    pub mod fasta;
    pub mod tsv;
}

use formats::{
    fasta::write_fasta_format,
    tsv::{write_score_table, write_tsv_format},
};

pub use formats::tsv::{SCORE_HEADER, TRAJECTORY_HEADER};

/// Writes one trajectory in the specified format.
///
/// TSV output always starts with a header row. Use [`write_results_batch`]
/// to write several trajectories under a single header.
///
/// # Errors
///
/// Returns [`DeoptError::IoError`] if writing fails.
pub fn write_results<W: Write>(
    writer: &mut W,
    results: &DeoptResults,
    format: OutputFormat,
) -> Result<(), DeoptError> {
    match format {
        OutputFormat::Fasta => write_fasta_format(writer, results),
        OutputFormat::Tsv => write_tsv_format(writer, results, true),
    }
}

/// Writes several trajectories one after another.
///
/// # Errors
///
/// Returns [`DeoptError::IoError`] if writing fails.
pub fn write_results_batch<W: Write>(
    writer: &mut W,
    results: &[DeoptResults],
    format: OutputFormat,
) -> Result<(), DeoptError> {
    for (i, result) in results.iter().enumerate() {
        match format {
            OutputFormat::Fasta => write_fasta_format(writer, result)?,
            OutputFormat::Tsv => write_tsv_format(writer, result, i == 0)?,
        }
    }
    Ok(())
}

/// Writes a Fop survey table.
///
/// # Errors
///
/// Returns [`DeoptError::IoError`] if writing fails.
pub fn write_scores<W: Write>(writer: &mut W, summary: &ScoreSummary) -> Result<(), DeoptError> {
    write_score_table(writer, summary)
}
