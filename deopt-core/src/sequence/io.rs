use std::fs::File;
use std::io::Read;
use std::path::Path;

use bio::io::fasta;

use crate::types::DeoptError;

/// Identifier, optional description and raw sequence bytes of a FASTA record
pub type FastaRecord = (String, Option<String>, Vec<u8>);

/// Read every record of a FASTA file using rust-bio.
pub fn read_fasta_sequences<P: AsRef<Path>>(path: P) -> Result<Vec<FastaRecord>, DeoptError> {
    let file = File::open(path)?;
    read_fasta_from(file)
}

/// Read every record from any FASTA source (file, stdin, buffer).
pub fn read_fasta_from<R: Read>(reader: R) -> Result<Vec<FastaRecord>, DeoptError> {
    let reader = fasta::Reader::new(reader);
    let mut sequences = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| DeoptError::ParseError(e.to_string()))?;
        let id = record.id().to_string();
        let description = record.desc().map(String::from);
        let seq = record.seq().to_vec();
        sequences.push((id, description, seq));
    }

    Ok(sequences)
}

/// Full header line of a record, as carried into trajectory annotations.
#[must_use]
pub fn record_label(id: &str, description: Option<&str>) -> String {
    match description {
        Some(desc) if !desc.is_empty() => format!("{id} {desc}"),
        _ => id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fasta_file(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_fasta_sequences_basic() {
        let file = fasta_file(b">test_sequence\nATGGCT\nGCTTAA\n");

        let sequences = read_fasta_sequences(file.path()).unwrap();
        assert_eq!(sequences.len(), 1);
        assert_eq!(sequences[0].0, "test_sequence");
        assert_eq!(sequences[0].2, b"ATGGCTGCTTAA".to_vec());
    }

    #[test]
    fn test_read_fasta_sequences_empty_file() {
        let file = fasta_file(b"");
        let sequences = read_fasta_sequences(file.path()).unwrap();
        assert!(sequences.is_empty());
    }

    #[test]
    fn test_read_fasta_sequences_multiple_with_description() {
        let file = fasta_file(b">seq1 lacZ fragment\nATG\n>seq2\nGCT\n>seq3\nTAA\n");

        let sequences = read_fasta_sequences(file.path()).unwrap();
        assert_eq!(sequences.len(), 3);
        assert_eq!(sequences[0].0, "seq1");
        assert_eq!(sequences[0].1, Some("lacZ fragment".to_string()));
        assert_eq!(sequences[1].1, None);
        assert_eq!(sequences[2].0, "seq3");
    }

    #[test]
    fn test_read_fasta_from_buffer() {
        let data: &[u8] = b">buf\nATGAAA\n";
        let sequences = read_fasta_from(data).unwrap();
        assert_eq!(sequences.len(), 1);
        assert_eq!(sequences[0].2.len(), 6);
    }

    #[test]
    fn test_read_fasta_sequences_file_not_found() {
        match read_fasta_sequences("nonexistent_file.fa") {
            Err(DeoptError::IoError(_)) => {}
            other => panic!("Expected IoError for missing file, got {other:?}"),
        }
    }

    #[test]
    fn test_record_label() {
        assert_eq!(record_label("gfp", Some("superfolder")), "gfp superfolder");
        assert_eq!(record_label("gfp", Some("")), "gfp");
        assert_eq!(record_label("gfp", None), "gfp");
    }
}
