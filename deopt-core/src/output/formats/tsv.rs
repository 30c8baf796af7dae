use std::io::Write;

use crate::constants::SCORE_PRECISION;
use crate::{DeoptError, results::DeoptResults, results::ScoreSummary};

pub const TRAJECTORY_HEADER: &str = "id\tstep\ttarget\tfop\tstatus\tsequence";
pub const SCORE_HEADER: &str = "id\toptimal\teligible\tfop";

/// Write a trajectory as a tab-separated table.
///
/// The native record has `-` as its target and `native` as its status.
pub fn write_tsv_format<W: Write>(
    writer: &mut W,
    results: &DeoptResults,
    include_header: bool,
) -> Result<(), DeoptError> {
    if include_header {
        writeln!(writer, "{TRAJECTORY_HEADER}")?;
    }
    let header = &results.sequence_info.header;

    for (step, record) in results.trajectory.iter().enumerate() {
        let target = record
            .target
            .map_or_else(|| "-".to_string(), |t| format!("{t:.prec$}", prec = SCORE_PRECISION));
        let status = record
            .status
            .map_or_else(|| "native".to_string(), |s| s.to_string());
        writeln!(
            writer,
            "{header}\t{step}\t{target}\t{:.prec$}\t{status}\t{}",
            record.score,
            record.sequence,
            prec = SCORE_PRECISION
        )?;
    }
    Ok(())
}

/// Write per-record Fop values followed by a `#` line with their mean.
pub fn write_score_table<W: Write>(
    writer: &mut W,
    summary: &ScoreSummary,
) -> Result<(), DeoptError> {
    writeln!(writer, "{SCORE_HEADER}")?;
    for record in &summary.records {
        let fop = record
            .fop
            .map_or_else(|| "NA".to_string(), |f| format!("{f:.prec$}", prec = SCORE_PRECISION));
        writeln!(
            writer,
            "{}\t{}\t{}\t{fop}",
            record.header, record.optimal, record.eligible
        )?;
    }
    match summary.mean_fop() {
        Some(mean) => writeln!(
            writer,
            "# mean Fop = {mean:.prec$} over {} records",
            summary.records.iter().filter(|r| r.fop.is_some()).count(),
            prec = SCORE_PRECISION
        )?,
        None => writeln!(writer, "# mean Fop = NA")?,
    }
    Ok(())
}
