use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use wordmatch_lib::words::{ErrorKind, StoreError, WordEntry, WordList, WordListSummary, WordStore};
use wordmatch_lib::{Favorites, GameConfig};

/// Shared application state for CLI commands
pub struct App {
    pub config: GameConfig,
    pub store: WordStore,
    pub favorites: Favorites,
}

impl App {
    /// Initialize from the given data directory, or the default one
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => WordStore::default_data_dir().context("Failed to get data directory")?,
        };

        let mut store = WordStore::new(data_dir.clone());
        store.init().with_context(|| {
            format!(
                "Failed to initialize word store at {}; fix or remove the file and try again",
                store.path().display()
            )
        })?;

        let config = GameConfig::load(&data_dir).context("Failed to load config.toml")?;
        let favorites = Favorites::load(data_dir.clone()).context("Failed to load favorites")?;

        log::info!("Using data directory {}", data_dir.display());

        Ok(Self {
            config,
            store,
            favorites,
        })
    }

    /// Find a list by title (case-insensitive prefix match)
    pub fn find_list(&self, title: &str) -> Result<WordList> {
        let lists = self.store.get_lists().context("Failed to list word lists")?;

        let title_lower = title.to_lowercase();

        // Exact match first
        if let Some(list) = lists.iter().find(|l| l.title.to_lowercase() == title_lower) {
            return Ok(list.clone());
        }

        // Prefix match
        let matches: Vec<&WordList> = lists
            .iter()
            .filter(|l| l.title.to_lowercase().starts_with(&title_lower))
            .collect();

        match matches.len() {
            0 => bail!(
                "No word list matching '{}'. Available lists:\n{}",
                title,
                lists
                    .iter()
                    .map(|l| format!("  - {}", l.title))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
            1 => Ok(matches[0].clone()),
            _ => bail!(
                "Ambiguous list title '{}'. Matches:\n{}",
                title,
                matches
                    .iter()
                    .map(|l| format!("  - {}", l.title))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        }
    }

    /// Words of one list, or every stored word
    pub fn words(&self, list: Option<&str>) -> Result<Vec<WordEntry>> {
        match list {
            Some(title) => {
                let list = self.find_list(title)?;
                self.store
                    .get_words_by_list(list.id)
                    .context("Failed to load list words")
            }
            None => self.store.get_all_words().context("Failed to load words"),
        }
    }

    pub fn all_words(&self) -> Result<Vec<WordEntry>> {
        self.words(None)
    }

    pub fn list_summaries(&self) -> Result<Vec<WordListSummary>> {
        self.store
            .list_summaries()
            .context("Failed to list word lists")
    }
}

/// Turn a failed store change into the message shown to the user
pub fn store_failure(err: StoreError, action: &str) -> anyhow::Error {
    match err.kind() {
        ErrorKind::ConstraintViolation | ErrorKind::InvalidInput => {
            anyhow!("Could not {}: {}", action, err)
        }
        ErrorKind::NotInitialized => {
            anyhow!("Could not {}: the word store is not ready, run the command again", action)
        }
        ErrorKind::StorageFailure => anyhow::Error::new(err)
            .context(format!("Could not {}; check that the data directory is writable", action)),
    }
}
