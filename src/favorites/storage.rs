//! Favorites storage
//!
//! Favorites live in `favorites.json` and are written through on every change.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use super::models::FavoriteEntry;

const FAVORITES_FILE: &str = "favorites.json";

#[derive(Error, Debug)]
pub enum FavoritesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

type Result<T> = std::result::Result<T, FavoritesError>;

/// The user's favorite words, unique by word text
pub struct Favorites {
    path: PathBuf,
    entries: Vec<FavoriteEntry>,
}

impl Favorites {
    /// Load favorites from the data directory. A missing file means none.
    pub fn load(data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir)?;
        let path = data_dir.join(FAVORITES_FILE);

        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Vec::new()
        };

        Ok(Self { path, entries })
    }

    pub fn list(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.iter().any(|f| f.word == word)
    }

    /// Remove the word if present, otherwise add it with the definition
    /// found by `lookup_definition`.
    ///
    /// Returns whether the word is a favorite afterwards.
    pub fn toggle<F>(&mut self, word: &str, lookup_definition: F) -> Result<bool>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        if self.contains(word) {
            self.remove(word)?;
            Ok(false)
        } else {
            self.insert(word, lookup_definition)?;
            Ok(true)
        }
    }

    /// Add the word unless it already is a favorite.
    ///
    /// Returns whether it was newly added.
    pub fn ensure<F>(&mut self, word: &str, lookup_definition: F) -> Result<bool>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        if self.contains(word) {
            return Ok(false);
        }
        self.insert(word, lookup_definition)?;
        Ok(true)
    }

    /// Returns whether anything was removed
    pub fn remove(&mut self, word: &str) -> Result<bool> {
        let Some(pos) = self.entries.iter().position(|f| f.word == word) else {
            return Ok(false);
        };

        let removed = self.entries.remove(pos);
        if let Err(e) = self.save() {
            self.entries.insert(pos, removed);
            return Err(e);
        }
        Ok(true)
    }

    fn insert<F>(&mut self, word: &str, lookup_definition: F) -> Result<()>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let meaning = lookup_definition(word).unwrap_or_else(|| {
            log::warn!("No definition found for favorite '{}'", word);
            String::new()
        });

        self.entries.push(FavoriteEntry {
            word: word.to_string(),
            meaning,
        });
        if let Err(e) = self.save() {
            self.entries.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Write atomically (write to .tmp then rename)
    fn save(&self) -> Result<()> {
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(&self.entries)?)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_favorites() -> (Favorites, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let favorites = Favorites::load(temp_dir.path().to_path_buf()).unwrap();
        (favorites, temp_dir)
    }

    fn fruit(_: &str) -> Option<String> {
        Some("a fruit".to_string())
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let (mut favorites, _temp) = create_test_favorites();

        assert!(favorites.toggle("apple", fruit).unwrap());
        assert!(favorites.contains("apple"));
        assert_eq!(favorites.list()[0].meaning, "a fruit");

        assert!(!favorites.toggle("apple", fruit).unwrap());
        assert!(!favorites.contains("apple"));
        assert!(favorites.list().is_empty());
    }

    #[test]
    fn test_toggle_persists_each_change() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut favorites = Favorites::load(temp_dir.path().to_path_buf()).unwrap();
            favorites.toggle("apple", fruit).unwrap();
            favorites.toggle("pear", |_| None).unwrap();
        }

        let favorites = Favorites::load(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(favorites.list().len(), 2);
        assert_eq!(favorites.list()[1].word, "pear");
        assert_eq!(favorites.list()[1].meaning, "");
    }

    #[test]
    fn test_ensure_does_not_toggle_off() {
        let (mut favorites, _temp) = create_test_favorites();

        assert!(favorites.ensure("apple", fruit).unwrap());
        assert!(!favorites.ensure("apple", fruit).unwrap());
        assert!(favorites.contains("apple"));
        assert_eq!(favorites.list().len(), 1);
    }

    #[test]
    fn test_lookup_only_called_when_adding() {
        let (mut favorites, _temp) = create_test_favorites();
        favorites.toggle("apple", fruit).unwrap();

        favorites
            .toggle("apple", |_| panic!("lookup should not run on removal"))
            .unwrap();
        assert!(!favorites.remove("apple").unwrap());
    }

    #[test]
    fn test_failed_write_leaves_set_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let mut favorites = Favorites::load(temp_dir.path().to_path_buf()).unwrap();
        favorites.toggle("apple", fruit).unwrap();

        // Turn the target into a directory so the rename fails
        let path = temp_dir.path().join(FAVORITES_FILE);
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(favorites.toggle("pear", fruit).is_err());
        assert!(!favorites.contains("pear"));
        assert!(favorites.toggle("apple", fruit).is_err());
        assert!(favorites.contains("apple"));
    }
}
