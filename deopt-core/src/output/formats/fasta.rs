use std::io::Write;

use bio::io::fasta;

use crate::{DeoptError, results::DeoptResults};

/// Write every trajectory entry as a FASTA record named `<header>_<step>`.
pub fn write_fasta_format<W: Write>(
    writer: &mut W,
    results: &DeoptResults,
) -> Result<(), DeoptError> {
    let mut fasta_writer = fasta::Writer::new(writer);
    let header = &results.sequence_info.header;

    for (step, record) in results.trajectory.iter().enumerate() {
        let id = format!("{header}_{step}");
        fasta_writer.write(
            &id,
            Some(record.description.as_str()),
            &record.sequence.to_bytes(),
        )?;
    }
    fasta_writer.flush()?;
    Ok(())
}
