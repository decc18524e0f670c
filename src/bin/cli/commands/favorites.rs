use anyhow::{Context, Result};

use wordmatch_lib::favorites::lookup_definition;
use wordmatch_lib::RoundController;

use crate::app::App;
use crate::OutputFormat;

pub fn run_list(app: &App, format: &OutputFormat) -> Result<()> {
    let favorites = app.favorites.list();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(favorites)?);
        }
        OutputFormat::Plain => {
            if favorites.is_empty() {
                println!("No favorites yet.");
                return Ok(());
            }

            for entry in favorites {
                println!("* {:<24} {}", entry.word, entry.meaning);
            }
            println!("\n{} favorites total", favorites.len());
        }
    }

    Ok(())
}

pub fn run_toggle(app: &mut App, word: &str) -> Result<()> {
    let all_words = app.all_words()?;
    let now_favorite = app
        .favorites
        .toggle(word, |w| lookup_definition(w, None::<&RoundController>, &all_words))
        .context("Failed to save favorites")?;

    if now_favorite {
        println!("Added \"{}\" to favorites.", word);
    } else {
        println!("Removed \"{}\" from favorites.", word);
    }
    Ok(())
}
