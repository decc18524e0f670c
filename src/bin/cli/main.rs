mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::import::ImportTarget;

#[derive(Parser)]
#[command(name = "wordmatch-cli", about = "Vocabulary matching game", version)]
struct Cli {
    /// Directory holding words.json, favorites.json and config.toml
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Manage individual words
    #[command(subcommand)]
    Words(WordsCommand),

    /// Manage saved word lists
    #[command(subcommand)]
    Lists(ListsCommand),

    /// Import words from a word,definition file or a .docx vocabulary table
    Import {
        /// Path to the word list or .docx file
        file: PathBuf,
        /// Save the words as a new list with this title
        #[arg(long, conflicts_with = "upsert")]
        save: Option<String>,
        /// Insert new words and update definitions of existing ones
        #[arg(long)]
        upsert: bool,
    },

    /// Convert a .docx vocabulary table into a word,definition list
    Convert {
        /// Word document (or word list) to read
        file: PathBuf,
        /// Where to write the list
        output: PathBuf,
    },

    /// Favorite words
    #[command(subcommand)]
    Fav(FavCommand),

    /// Play a matching round
    Play {
        /// Play only the words of this list (case-insensitive prefix match)
        #[arg(long)]
        list: Option<String>,
    },
}

#[derive(Subcommand)]
enum WordsCommand {
    /// Add a word
    Add { word: String, definition: String },
    /// List words
    Ls {
        /// Only words of this list
        #[arg(long)]
        list: Option<String>,
    },
    /// Delete a word by its text
    Rm { word: String },
    /// Delete every word
    Clear,
}

#[derive(Subcommand)]
enum ListsCommand {
    /// List saved word lists
    Ls,
    /// Show the words of a list
    Show { title: String },
    /// Delete a list and its words
    Rm { title: String },
}

#[derive(Subcommand)]
enum FavCommand {
    /// List favorites
    Ls,
    /// Add or remove a favorite
    Toggle { word: String },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    if let Command::Convert { file, output } = &cli.command {
        return commands::import::run_convert(file, output, &cli.format);
    }

    let mut app = app::App::new(cli.data_dir)?;

    match cli.command {
        Command::Words(subcmd) => match subcmd {
            WordsCommand::Add { word, definition } => {
                commands::words::run_add(&mut app, &word, &definition, &cli.format)?;
            }
            WordsCommand::Ls { list } => {
                commands::words::run_list(&app, list.as_deref(), &cli.format, use_color)?;
            }
            WordsCommand::Rm { word } => commands::words::run_remove(&mut app, &word)?,
            WordsCommand::Clear => commands::words::run_clear(&mut app)?,
        },
        Command::Lists(subcmd) => match subcmd {
            ListsCommand::Ls => commands::lists::run_list(&app, &cli.format)?,
            ListsCommand::Show { title } => {
                commands::words::run_list(&app, Some(&title), &cli.format, use_color)?;
            }
            ListsCommand::Rm { title } => commands::lists::run_remove(&mut app, &title)?,
        },
        Command::Import { file, save, upsert } => {
            let target = match (&save, upsert) {
                (Some(title), _) => ImportTarget::List(title.as_str()),
                (None, true) => ImportTarget::Upsert,
                (None, false) => ImportTarget::Preview,
            };
            commands::import::run(&mut app, &file, target, &cli.format)?;
        }
        Command::Convert { .. } => {}
        Command::Fav(subcmd) => match subcmd {
            FavCommand::Ls => commands::favorites::run_list(&app, &cli.format)?,
            FavCommand::Toggle { word } => commands::favorites::run_toggle(&mut app, &word)?,
        },
        Command::Play { list } => {
            commands::play::run(&mut app, list.as_deref(), use_color)?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
