//! Vocabulary tables from Word documents
//!
//! Reads every top-level table in `word/document.xml`. Each row holds up to
//! two `No. | Word | Meaning` groups side by side: columns 1-2 and 4-5.
//! Header rows (first cell mentioning "no", "word" or "meaning") are skipped,
//! only English words and phrases are kept, and meanings are cleaned of
//! part-of-speech tags, bracketed notes and stray punctuation.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use thiserror::Error;
use zip::ZipArchive;

use super::import::ParsedImport;
use super::models::WordEntry;

const DOCUMENT_PART: &str = "word/document.xml";

const HEADER_MARKERS: &[&str] = &["no", "word", "meaning"];

#[derive(Error, Debug)]
pub enum DocxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a Word document: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),
}

type Result<T> = std::result::Result<T, DocxError>;

/// Table rows as cell texts, one entry per grid column
type Table = Vec<Vec<String>>;

/// Parse the vocabulary tables of a `.docx` file
pub fn parse_docx_file(path: &Path) -> Result<ParsedImport> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;

    let tables = extract_tables(&xml)?;
    log::info!("Found {} tables in {}", tables.len(), path.display());
    extract_word_pairs(&tables)
}

/// Collect the text of every top-level table in a document body.
///
/// Paragraphs inside a cell are joined with newlines. Nested tables are
/// left out of their parent cell.
fn extract_tables(xml: &str) -> Result<Vec<Table>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut tables: Vec<Table> = Vec::new();
    let mut depth = 0usize;
    let mut row: Vec<String> = Vec::new();
    let mut cell: Option<String> = None;
    let mut span = 1usize;
    let mut paragraphs = 0usize;
    let mut in_text = false;

    loop {
        let read = reader.read_event_into(&mut buf);
        match read.map_err(|e| DocxError::Xml(e.to_string()))? {
            Event::Start(ref e) => match e.name().as_ref() {
                b"w:tbl" => {
                    depth += 1;
                    if depth == 1 {
                        tables.push(Vec::new());
                    }
                }
                b"w:tr" if depth == 1 => row.clear(),
                b"w:tc" if depth == 1 => {
                    cell = Some(String::new());
                    span = 1;
                    paragraphs = 0;
                }
                b"w:p" if depth == 1 => start_paragraph(&mut cell, &mut paragraphs),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(ref e) if depth == 1 => match e.name().as_ref() {
                b"w:p" => start_paragraph(&mut cell, &mut paragraphs),
                b"w:tab" => push_text(&mut cell, "\t"),
                b"w:br" => push_text(&mut cell, "\n"),
                b"w:gridSpan" => span = grid_span(e).unwrap_or(1),
                _ => {}
            },
            Event::End(ref e) => match e.name().as_ref() {
                b"w:tbl" => depth = depth.saturating_sub(1),
                b"w:tr" if depth == 1 => {
                    if let Some(table) = tables.last_mut() {
                        table.push(std::mem::take(&mut row));
                    }
                }
                b"w:tc" if depth == 1 => {
                    if let Some(text) = cell.take() {
                        for _ in 0..span {
                            row.push(text.clone());
                        }
                    }
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Text(e) if in_text && depth == 1 => {
                let text = e.unescape().map_err(|e| DocxError::Xml(e.to_string()))?;
                push_text(&mut cell, &text);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(tables)
}

fn start_paragraph(cell: &mut Option<String>, paragraphs: &mut usize) {
    if cell.is_none() {
        return;
    }
    if *paragraphs > 0 {
        push_text(cell, "\n");
    }
    *paragraphs += 1;
}

fn push_text(cell: &mut Option<String>, text: &str) {
    if let Some(cell) = cell {
        cell.push_str(text);
    }
}

/// Number of grid columns a cell covers (`<w:gridSpan w:val="2"/>`)
fn grid_span(element: &BytesStart) -> Option<usize> {
    element
        .attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == b"w:val")
        .and_then(|a| String::from_utf8_lossy(&a.value).parse().ok())
        .filter(|n| *n > 0)
}

/// Cleans meaning cells and recognizes English headwords
struct MeaningCleaner {
    part_of_speech: Regex,
    brackets: Regex,
    bullets: Regex,
    whitespace: Regex,
    leading: Regex,
    trailing: Regex,
    english: Regex,
}

impl MeaningCleaner {
    fn new() -> Result<Self> {
        Ok(Self {
            part_of_speech: Regex::new(r"[a-zA-Z]+\.")?,
            brackets: Regex::new(r"[（(].*?[)）]")?,
            bullets: Regex::new(r"[・•]")?,
            whitespace: Regex::new(r"\s+")?,
            leading: Regex::new(r"^[,，;；\s]+")?,
            trailing: Regex::new(r"[,，;；\s…]+$")?,
            english: Regex::new(r"^[a-zA-Z\s'-]+$")?,
        })
    }

    /// Strip tags like `n.` or `adj.`, bracketed notes, bullets and the
    /// punctuation left dangling at either end
    fn clean(&self, meaning: &str) -> String {
        let text = self.part_of_speech.replace_all(meaning, "");
        let text = self.brackets.replace_all(&text, "");
        let text = self.bullets.replace_all(&text, "");
        let text = self.whitespace.replace_all(&text, " ");
        let text = self.leading.replace(&text, "");
        let text = self.trailing.replace(&text, "");
        text.trim().to_string()
    }

    /// Letters, spaces, hyphens and apostrophes only
    fn is_english(&self, word: &str) -> bool {
        let word = word.trim();
        !word.is_empty() && self.english.is_match(word)
    }
}

fn is_header_row(row: &[String]) -> bool {
    let first = row[0].to_lowercase();
    HEADER_MARKERS.iter().any(|marker| first.contains(marker))
}

/// Turn table rows into word entries, dropping exact repeats.
///
/// `skipped` counts word cells that were filled in but rejected.
fn extract_word_pairs(tables: &[Table]) -> Result<ParsedImport> {
    let cleaner = MeaningCleaner::new()?;
    let mut parsed = ParsedImport::default();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for row in tables.iter().flatten() {
        if row.len() < 3 || is_header_row(row) {
            continue;
        }

        let groups: &[(usize, usize)] = if row.len() >= 6 {
            &[(1, 2), (4, 5)]
        } else {
            &[(1, 2)]
        };

        for &(word_col, meaning_col) in groups {
            let word = row[word_col].trim();
            if word.is_empty() {
                continue;
            }

            let meaning = cleaner.clean(row[meaning_col].trim());
            if !cleaner.is_english(word) || meaning.is_empty() {
                parsed.skipped += 1;
                continue;
            }

            if seen.insert((word.to_string(), meaning.clone())) {
                parsed.words.push(WordEntry::new(word, meaning));
            }
        }
    }

    Ok(parsed)
}

/// Render entries as a `word,definition` list, quoting fields when needed
pub fn to_word_list(entries: &[WordEntry]) -> std::result::Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    for entry in entries {
        writer.write_record([entry.word.as_str(), entry.definition.as_str()])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use crate::words::parse_word_list;

    fn cell(text: &str) -> String {
        format!("<w:tc><w:p><w:r><w:t>{}</w:t></w:r></w:p></w:tc>", text)
    }

    fn table(rows: &[&[&str]]) -> String {
        let rows: String = rows
            .iter()
            .map(|cells| {
                let cells: String = cells.iter().map(|c| cell(c)).collect();
                format!("<w:tr>{}</w:tr>", cells)
            })
            .collect();
        format!("<w:tbl>{}</w:tbl>", rows)
    }

    fn document(body: &str) -> String {
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<w:document xmlns:w="#,
                r#""http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
                "<w:body>{}</w:body></w:document>"
            ),
            body
        )
    }

    fn pairs(parsed: &ParsedImport) -> Vec<(&str, &str)> {
        parsed
            .words
            .iter()
            .map(|w| (w.word.as_str(), w.definition.as_str()))
            .collect()
    }

    #[test]
    fn test_clean_meaning() {
        let cleaner = MeaningCleaner::new().unwrap();
        assert_eq!(cleaner.clean("n. 苹果（水果）；"), "苹果");
        assert_eq!(cleaner.clean("adj. 快乐的；幸福的…"), "快乐的；幸福的");
        assert_eq!(cleaner.clean("• v.  跑 (fast),"), "跑");
        assert_eq!(cleaner.clean("n."), "");
    }

    #[test]
    fn test_is_english() {
        let cleaner = MeaningCleaner::new().unwrap();
        assert!(cleaner.is_english("apple"));
        assert!(cleaner.is_english("give up"));
        assert!(cleaner.is_english("well-known"));
        assert!(cleaner.is_english("don't"));
        assert!(!cleaner.is_english("苹果"));
        assert!(!cleaner.is_english("café"));
        assert!(!cleaner.is_english("42"));
        assert!(!cleaner.is_english("   "));
    }

    #[test]
    fn test_two_column_groups_and_header() {
        let xml = document(&table(&[
            &["No.", "Word", "Meaning", "No.", "Word", "Meaning"],
            &["1", "apple", "n. 苹果", "2", "run", "v. 跑"],
            &["3", "tree", "n. 树"],
        ]));

        let parsed = extract_word_pairs(&extract_tables(&xml).unwrap()).unwrap();
        assert_eq!(
            pairs(&parsed),
            vec![("apple", "苹果"), ("run", "跑"), ("tree", "树")]
        );
        assert_eq!(parsed.skipped, 0);
    }

    #[test]
    fn test_rejected_and_repeated_rows() {
        let xml = document(&format!(
            "{}{}",
            table(&[
                &["1", "苹果", "apple"],
                &["2", "cat", "n. 猫"],
                &["3", "dog", "n."],
                &["4", "short"],
            ]),
            table(&[&["5", "cat", "n. 猫"]]),
        ));

        let parsed = extract_word_pairs(&extract_tables(&xml).unwrap()).unwrap();
        assert_eq!(pairs(&parsed), vec![("cat", "猫")]);
        assert_eq!(parsed.skipped, 2);
    }

    #[test]
    fn test_cell_paragraphs_spans_and_nested_tables() {
        let nested = table(&[&["x", "ignored", "nested"]]);
        let xml = document(&format!(
            "<w:tbl><w:tr>{}{}<w:tc><w:tcPr><w:gridSpan w:val=\"2\"/></w:tcPr>\
             <w:p><w:r><w:t>n. 银行</w:t></w:r></w:p>\
             <w:p><w:r><w:t>(金融)</w:t></w:r></w:p>{}</w:tc>\
             </w:tr></w:tbl>",
            cell("7"),
            cell("bank"),
            nested
        ));

        let tables = extract_tables(&xml).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(
            tables[0][0],
            vec!["7", "bank", "n. 银行\n(金融)", "n. 银行\n(金融)"]
        );

        let parsed = extract_word_pairs(&tables).unwrap();
        assert_eq!(pairs(&parsed), vec![("bank", "银行")]);
    }

    #[test]
    fn test_parse_docx_file_and_export() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vocabulary.docx");

        let mut zip = ZipWriter::new(File::create(&path).unwrap());
        zip.start_file(DOCUMENT_PART, SimpleFileOptions::default())
            .unwrap();
        let xml = document(&table(&[
            &["No", "Word", "Meaning"],
            &["1", "apple", "n. 苹果, 苹果树"],
        ]));
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap();

        let parsed = parse_docx_file(&path).unwrap();
        assert_eq!(pairs(&parsed), vec![("apple", "苹果, 苹果树")]);

        let list = to_word_list(&parsed.words).unwrap();
        assert_eq!(list, "apple,\"苹果, 苹果树\"\n");
        assert_eq!(pairs(&parse_word_list(&list)), pairs(&parsed));
    }

    #[test]
    fn test_missing_document_part() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.docx");

        let mut zip = ZipWriter::new(File::create(&path).unwrap());
        zip.start_file("readme.txt", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"not a document").unwrap();
        zip.finish().unwrap();

        assert!(matches!(parse_docx_file(&path), Err(DocxError::Zip(_))));
    }

    #[test]
    fn test_not_a_zip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plain.docx");
        std::fs::write(&path, "apple,a fruit").unwrap();

        assert!(matches!(parse_docx_file(&path), Err(DocxError::Zip(_))));
    }
}
