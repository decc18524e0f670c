//! Plain-text word list import
//!
//! One `word,definition` record per line. A leading `Word,...` header is
//! skipped, blank lines are ignored and records missing either field are
//! dropped. Only the first two fields of a record are used.

use std::fs;
use std::path::Path;

use serde::Serialize;

use super::models::WordEntry;

/// Result of parsing an import file
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedImport {
    pub words: Vec<WordEntry>,
    /// Non-blank records that were dropped because a field was missing or
    /// the line could not be read
    pub skipped: usize,
}

/// Parse the contents of a word list file.
///
/// Lines are read independently, so an unbalanced quote only costs the line
/// it appears on.
pub fn parse_word_list(content: &str) -> ParsedImport {
    let mut parsed = ParsedImport::default();
    let mut first_record = true;

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let record = match parse_line(line) {
            Ok(Some(r)) => r,
            Ok(None) => continue,
            Err(e) => {
                log::debug!("Skipping unreadable import line: {}", e);
                parsed.skipped += 1;
                continue;
            }
        };

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let word = record.get(0).unwrap_or_default();
        let definition = record.get(1).unwrap_or_default();

        if first_record {
            first_record = false;
            if word.eq_ignore_ascii_case("word") {
                continue;
            }
        }

        if word.is_empty() || definition.is_empty() {
            parsed.skipped += 1;
            continue;
        }

        parsed.words.push(WordEntry::new(word, definition));
    }

    parsed
}

/// Split a single line into fields
fn parse_line(line: &str) -> csv::Result<Option<csv::StringRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());

    let mut record = csv::StringRecord::new();
    if reader.read_record(&mut record)? {
        Ok(Some(record))
    } else {
        Ok(None)
    }
}

/// Read and parse a word list file from disk
pub fn parse_word_file(path: &Path) -> std::io::Result<ParsedImport> {
    let content = fs::read_to_string(path)?;
    Ok(parse_word_list(&content))
}
