use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use wordmatch_lib::words::{parse_docx_file, parse_word_file, to_word_list, ParsedImport};

use crate::app::{store_failure, App};
use crate::render::terminal::truncate;
use crate::OutputFormat;

/// How parsed words should be stored
pub enum ImportTarget<'a> {
    /// Only show what would be imported
    Preview,
    /// Save as a new named list
    List(&'a str),
    /// Upsert into the unlisted word set by word text
    Upsert,
}

/// Parse a word file, reading `.docx` vocabulary tables by extension
fn load_words(path: &Path) -> Result<ParsedImport> {
    let is_docx = path
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("docx"));

    let parsed = if is_docx {
        parse_docx_file(path)
            .with_context(|| format!("Failed to read Word document {}", path.display()))?
    } else {
        parse_word_file(path).with_context(|| format!("Failed to read {}", path.display()))?
    };

    if parsed.words.is_empty() {
        bail!("No valid words found in {}", path.display());
    }
    Ok(parsed)
}

pub fn run(app: &mut App, path: &Path, target: ImportTarget, format: &OutputFormat) -> Result<()> {
    let parsed = load_words(path)?;

    let stored = match target {
        ImportTarget::Preview => None,
        ImportTarget::List(title) => {
            let list = app
                .store
                .save_list(title, &parsed.words)
                .map_err(|e| store_failure(e, "save word list"))?;
            Some(serde_json::json!({ "listId": list.id, "title": list.title }))
        }
        ImportTarget::Upsert => {
            let stats = app
                .store
                .import_words(&parsed.words)
                .map_err(|e| store_failure(e, "import words"))?;
            Some(serde_json::json!({ "inserted": stats.inserted, "updated": stats.updated }))
        }
    };

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "words": parsed.words,
                "skipped": parsed.skipped,
                "stored": stored,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if stored.is_none() {
                for entry in &parsed.words {
                    println!(
                        "{:<24} {}",
                        truncate(&entry.word, 24),
                        truncate(&entry.definition, 60)
                    );
                }
                println!();
            }
            println!("Imported {} words.", parsed.words.len());
            if let Some(stored) = stored {
                if let Some(title) = stored.get("title").and_then(|t| t.as_str()) {
                    println!("Saved as list \"{}\".", title);
                } else {
                    println!(
                        "{} new, {} updated.",
                        stored["inserted"], stored["updated"]
                    );
                }
            }
        }
    }

    Ok(())
}

/// Write the words of `path` out as a plain `word,definition` list
pub fn run_convert(path: &Path, output: &Path, format: &OutputFormat) -> Result<()> {
    let parsed = load_words(path)?;
    let list = to_word_list(&parsed.words).context("Failed to format word list")?;
    fs::write(output, list).with_context(|| format!("Failed to write {}", output.display()))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "output": output.display().to_string(),
                "converted": parsed.words.len(),
                "skipped": parsed.skipped,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "Wrote {} words to {} ({} skipped).",
                parsed.words.len(),
                output.display(),
                parsed.skipped
            );
        }
    }
    Ok(())
}
