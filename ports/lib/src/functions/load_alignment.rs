use anyhow::{bail, Result};
use phylomc_core::domain::dtos::sequence::Sequence;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// Read a multi FASTA alignment.
///
/// Each record starts with a `>` header followed by a single or multiline
/// sequence. Whitespace inside sequences is dropped and blank lines are
/// ignored.
pub fn load_alignment(path: &Path) -> Result<Vec<Sequence>> {
    let reader = BufReader::new(File::open(path)?);
    read_alignment(reader)
}

pub(crate) fn read_alignment(reader: impl BufRead) -> Result<Vec<Sequence>> {
    let mut sequences = Vec::<Sequence>::new();
    let mut header = String::new();
    let mut sequence = String::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if let Some(content) = line.strip_prefix('>') {
            if !header.is_empty() {
                sequences.push(Sequence::new(header.clone(), sequence.clone()));
                sequence.clear();
            } else if !sequence.is_empty() {
                bail!("unexpected sequence without header");
            }

            header = content.trim().to_string();
        } else {
            sequence.extend(line.chars().filter(|c| !c.is_whitespace()));
        }
    }

    if !header.is_empty() {
        sequences.push(Sequence::new(header, sequence));
    }

    if sequences.is_empty() {
        bail!("alignment is empty");
    }

    Ok(sequences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_multiline_records() {
        let content = ">A first\nACGT\nAC\n\n>B\nAAAA\nTT\n>C\nGG GGCC\n";
        let sequences = read_alignment(Cursor::new(content)).unwrap();

        assert_eq!(sequences.len(), 3);
        assert_eq!(sequences[0].header_content(), "A first");
        assert_eq!(sequences[0].sequence_content(), "ACGTAC");
        assert_eq!(sequences[2].sequence_content(), "GGGGCC");
    }

    #[test]
    fn test_sequence_without_header_fails() {
        assert!(read_alignment(Cursor::new("ACGT\n>A\nACGT\n")).is_err());
        assert!(read_alignment(Cursor::new("\n\n")).is_err());
    }
}
