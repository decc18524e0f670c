use anyhow::Result;

use crate::app::{store_failure, App};
use crate::OutputFormat;

pub fn run_list(app: &App, format: &OutputFormat) -> Result<()> {
    let lists = app.list_summaries()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&lists)?);
        }
        OutputFormat::Plain => {
            if lists.is_empty() {
                println!("No word lists saved.");
                return Ok(());
            }

            let title_width = lists
                .iter()
                .map(|l| l.list.title.chars().count())
                .max()
                .unwrap_or(5)
                .min(40)
                .max(5);

            println!("{:<tw$} {:>6} Created", "Title", "Words", tw = title_width);
            println!(
                "{} {} {}",
                "\u{2500}".repeat(title_width),
                "\u{2500}".repeat(6),
                "\u{2500}".repeat(10)
            );

            for summary in &lists {
                println!(
                    "{:<tw$} {:>6} {}",
                    summary.list.title,
                    summary.word_count,
                    summary.list.created_at.format("%Y-%m-%d"),
                    tw = title_width
                );
            }

            println!("\n{} lists total", lists.len());
        }
    }

    Ok(())
}

pub fn run_remove(app: &mut App, title: &str) -> Result<()> {
    let list = app.find_list(title)?;
    let removed = app
        .store
        .delete_list(list.id)
        .map_err(|e| store_failure(e, "delete word list"))?;

    println!("Deleted list \"{}\" and its {} words.", list.title, removed);
    Ok(())
}
