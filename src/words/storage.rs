//! Storage operations for words and word lists
//!
//! Everything lives in a single document so that a change touching several
//! rows (a list and all of its words) lands in one write:
//! ```text
//! {data-dir}/
//! └── words.json   # schema version, id counters, lists and words
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::models::*;

/// Bumped whenever the document layout changes. Older documents are wiped.
pub const SCHEMA_VERSION: u32 = 2;

const STORE_FILE: &str = "words.json";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Word store accessed before it was initialized")]
    NotInitialized,

    #[error("A word list titled '{0}' already exists")]
    Duplicate(String),

    #[error("Word list not found: {0}")]
    ListNotFound(i64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Could not determine data directory")]
    DataDirNotFound,
}

/// Coarse classification of store failures, used to pick a user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConstraintViolation,
    NotInitialized,
    InvalidInput,
    StorageFailure,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) | Self::Json(_) | Self::DataDirNotFound => ErrorKind::StorageFailure,
            Self::NotInitialized => ErrorKind::NotInitialized,
            Self::Duplicate(_) => ErrorKind::ConstraintViolation,
            Self::ListNotFound(_) | Self::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Outcome of an upserting import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
    pub inserted: usize,
    pub updated: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreDocument {
    schema_version: u32,
    next_word_id: i64,
    next_list_id: i64,
    #[serde(default)]
    lists: Vec<WordList>,
    #[serde(default)]
    words: Vec<WordEntry>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            next_word_id: 1,
            next_list_id: 1,
            lists: Vec::new(),
            words: Vec::new(),
        }
    }
}

impl StoreDocument {
    fn insert_word(&mut self, word: &str, definition: &str, list_id: Option<i64>) -> i64 {
        let id = self.next_word_id;
        self.next_word_id += 1;
        self.words.push(WordEntry {
            id,
            word: word.to_string(),
            definition: definition.to_string(),
            list_id,
        });
        id
    }

    fn insert_list(&mut self, title: &str) -> Result<WordList> {
        if self.lists.iter().any(|l| l.title == title) {
            return Err(StoreError::Duplicate(title.to_string()));
        }
        let list = WordList::new(self.next_list_id, title.to_string());
        self.next_list_id += 1;
        self.lists.push(list.clone());
        Ok(list)
    }
}

/// Storage manager for words and word lists
pub struct WordStore {
    path: PathBuf,
    /// `None` until `init` has loaded or created the document
    doc: Option<StoreDocument>,
}

impl WordStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            path: data_dir.join(STORE_FILE),
            doc: None,
        }
    }

    /// Get the default data directory for the app
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("wordmatch"))
            .ok_or(StoreError::DataDirNotFound)
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_initialized(&self) -> bool {
        self.doc.is_some()
    }

    /// Load the document from disk, creating it if needed.
    ///
    /// A document written with a different schema version is discarded and
    /// replaced by an empty one.
    pub fn init(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let doc = if self.path.exists() {
            let content = fs::read_to_string(&self.path)?;
            let value: serde_json::Value = serde_json::from_str(&content)?;
            let version = value.get("schemaVersion").and_then(|v| v.as_u64());

            if version == Some(SCHEMA_VERSION as u64) {
                serde_json::from_value(value)?
            } else {
                log::warn!(
                    "Word store at {:?} has schema version {:?}, expected {}; recreating it",
                    self.path,
                    version,
                    SCHEMA_VERSION
                );
                let fresh = StoreDocument::default();
                self.write(&fresh)?;
                fresh
            }
        } else {
            let fresh = StoreDocument::default();
            self.write(&fresh)?;
            fresh
        };

        log::info!(
            "Word store ready: {} words in {} lists",
            doc.words.len(),
            doc.lists.len()
        );
        self.doc = Some(doc);
        Ok(())
    }

    fn doc(&self) -> Result<&StoreDocument> {
        self.doc.as_ref().ok_or(StoreError::NotInitialized)
    }

    /// Write atomically (write to .tmp then rename)
    fn write(&self, doc: &StoreDocument) -> Result<()> {
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(doc)?)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Apply a change to a copy of the document and persist it.
    ///
    /// The in-memory document is only replaced once the write succeeded, so a
    /// failed change leaves both copies untouched.
    fn update<T>(&mut self, change: impl FnOnce(&mut StoreDocument) -> Result<T>) -> Result<T> {
        let mut doc = self.doc()?.clone();
        let out = change(&mut doc)?;
        self.write(&doc)?;
        self.doc = Some(doc);
        Ok(out)
    }

    // ==================== Word Operations ====================

    /// Add a single word. Duplicate word text is allowed.
    pub fn add_word(&mut self, word: &str, definition: &str) -> Result<i64> {
        let (word, definition) = validate_pair(word, definition)?;
        self.update(|doc| Ok(doc.insert_word(word, definition, None)))
    }

    /// All stored words in insertion order
    pub fn get_all_words(&self) -> Result<Vec<WordEntry>> {
        Ok(self.doc()?.words.clone())
    }

    /// Words belonging to one list
    pub fn get_words_by_list(&self, list_id: i64) -> Result<Vec<WordEntry>> {
        Ok(self
            .doc()?
            .words
            .iter()
            .filter(|w| w.list_id == Some(list_id))
            .cloned()
            .collect())
    }

    /// Delete the oldest entry with exactly this word text.
    ///
    /// Returns whether anything was removed.
    pub fn delete_word(&mut self, word: &str) -> Result<bool> {
        if !self.doc()?.words.iter().any(|w| w.word == word) {
            return Ok(false);
        }
        self.update(|doc| {
            if let Some(pos) = doc.words.iter().position(|w| w.word == word) {
                doc.words.remove(pos);
            }
            Ok(true)
        })
    }

    /// Remove every word. Lists are kept.
    pub fn clear_words(&mut self) -> Result<()> {
        self.update(|doc| {
            doc.words.clear();
            Ok(())
        })
    }

    /// Upsert by word text: the first entry with the same text gets the new
    /// definition, otherwise a new unlisted entry is added.
    pub fn import_words(&mut self, entries: &[WordEntry]) -> Result<ImportStats> {
        for entry in entries {
            validate_pair(&entry.word, &entry.definition)?;
        }

        self.update(|doc| {
            let mut stats = ImportStats::default();
            for entry in entries {
                let word = entry.word.trim();
                let definition = entry.definition.trim();
                match doc.words.iter_mut().find(|w| w.word == word) {
                    Some(existing) => {
                        existing.definition = definition.to_string();
                        stats.updated += 1;
                    }
                    None => {
                        doc.insert_word(word, definition, None);
                        stats.inserted += 1;
                    }
                }
            }
            Ok(stats)
        })
    }

    // ==================== List Operations ====================

    /// All lists, oldest first
    pub fn get_lists(&self) -> Result<Vec<WordList>> {
        Ok(self.doc()?.lists.clone())
    }

    /// All lists with the number of words each one owns
    pub fn list_summaries(&self) -> Result<Vec<WordListSummary>> {
        let doc = self.doc()?;
        Ok(doc
            .lists
            .iter()
            .map(|list| WordListSummary {
                list: list.clone(),
                word_count: doc
                    .words
                    .iter()
                    .filter(|w| w.list_id == Some(list.id))
                    .count(),
            })
            .collect())
    }

    pub fn get_list(&self, list_id: i64) -> Result<WordList> {
        self.doc()?
            .lists
            .iter()
            .find(|l| l.id == list_id)
            .cloned()
            .ok_or(StoreError::ListNotFound(list_id))
    }

    /// Create an empty list. Titles are unique.
    pub fn create_list(&mut self, title: &str) -> Result<i64> {
        let title = validate_title(title)?;
        self.update(|doc| doc.insert_list(title).map(|l| l.id))
    }

    /// Add entries to an existing list
    pub fn import_words_to_list(&mut self, list_id: i64, entries: &[WordEntry]) -> Result<usize> {
        validate_list_id(list_id)?;
        validate_batch(entries)?;
        self.get_list(list_id)?;

        self.update(|doc| {
            for entry in entries {
                doc.insert_word(entry.word.trim(), entry.definition.trim(), Some(list_id));
            }
            Ok(entries.len())
        })
    }

    /// Create a list and fill it in one write
    pub fn save_list(&mut self, title: &str, entries: &[WordEntry]) -> Result<WordList> {
        let title = validate_title(title)?;
        validate_batch(entries)?;

        let list = self.update(|doc| {
            let list = doc.insert_list(title)?;
            for entry in entries {
                doc.insert_word(entry.word.trim(), entry.definition.trim(), Some(list.id));
            }
            Ok(list)
        })?;

        log::info!("Saved word list '{}' with {} words", list.title, entries.len());
        Ok(list)
    }

    /// Delete a list and every word it owns.
    ///
    /// Returns the number of words removed.
    pub fn delete_list(&mut self, list_id: i64) -> Result<usize> {
        validate_list_id(list_id)?;
        self.update(|doc| {
            let before = doc.words.len();
            doc.words.retain(|w| w.list_id != Some(list_id));
            doc.lists.retain(|l| l.id != list_id);
            Ok(before - doc.words.len())
        })
    }
}

fn validate_pair<'a>(word: &'a str, definition: &'a str) -> Result<(&'a str, &'a str)> {
    let word = word.trim();
    let definition = definition.trim();
    if word.is_empty() || definition.is_empty() {
        return Err(StoreError::InvalidInput(
            "word and definition are both required".to_string(),
        ));
    }
    Ok((word, definition))
}

fn validate_title(title: &str) -> Result<&str> {
    let title = title.trim();
    if title.is_empty() {
        return Err(StoreError::InvalidInput("list title is required".to_string()));
    }
    Ok(title)
}

fn validate_list_id(list_id: i64) -> Result<()> {
    if list_id <= 0 {
        return Err(StoreError::InvalidInput(format!("invalid list id {}", list_id)));
    }
    Ok(())
}

fn validate_batch(entries: &[WordEntry]) -> Result<()> {
    if entries.is_empty() {
        return Err(StoreError::InvalidInput("word list is empty".to_string()));
    }
    for entry in entries {
        validate_pair(&entry.word, &entry.definition)?;
    }
    Ok(())
}
