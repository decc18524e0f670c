use anyhow::Result;

use crate::app::{store_failure, App};
use crate::render::terminal::{paint, truncate, Color};
use crate::OutputFormat;

pub fn run_add(
    app: &mut App,
    word: &str,
    definition: &str,
    format: &OutputFormat,
) -> Result<()> {
    let id = app
        .store
        .add_word(word, definition)
        .map_err(|e| store_failure(e, "add word"))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": id,
                "word": word.trim(),
                "definition": definition.trim(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Added \"{}\" (id {})", word.trim(), id);
        }
    }

    Ok(())
}

pub fn run_list(
    app: &App,
    list: Option<&str>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let words = app.words(list)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&words)?);
        }
        OutputFormat::Plain => {
            if words.is_empty() {
                println!("No words found.");
                return Ok(());
            }

            let word_width = words
                .iter()
                .map(|w| w.word.chars().count())
                .max()
                .unwrap_or(4)
                .min(30)
                .max(4);

            println!("{:<ww$} Definition", "Word", ww = word_width);
            println!("{} {}", "\u{2500}".repeat(word_width), "\u{2500}".repeat(40));

            for entry in &words {
                let word = format!("{:<ww$}", truncate(&entry.word, word_width), ww = word_width);
                let word = if app.favorites.contains(&entry.word) {
                    paint(&word, Color::YELLOW, use_color)
                } else {
                    word
                };
                println!("{} {}", word, truncate(&entry.definition, 60));
            }

            println!("\n{} words total", words.len());
        }
    }

    Ok(())
}

pub fn run_remove(app: &mut App, word: &str) -> Result<()> {
    let removed = app
        .store
        .delete_word(word)
        .map_err(|e| store_failure(e, "delete word"))?;

    if removed {
        println!("Deleted \"{}\"", word);
    } else {
        println!("No word \"{}\" found.", word);
    }
    Ok(())
}

pub fn run_clear(app: &mut App) -> Result<()> {
    let count = app.store.get_all_words()?.len();
    app.store
        .clear_words()
        .map_err(|e| store_failure(e, "clear words"))?;
    println!("Deleted {} words.", count);
    Ok(())
}
