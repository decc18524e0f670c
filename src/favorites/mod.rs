//! Favorite words, kept independently of rounds

pub mod models;
pub mod storage;

use rand::Rng;

pub use models::FavoriteEntry;
pub use storage::{Favorites, FavoritesError};

use crate::round::RoundController;
use crate::words::WordEntry;

/// Current definition of a word: the active round's displayed cards first,
/// then the full word set
pub fn lookup_definition<R: Rng>(
    word: &str,
    round: Option<&RoundController<R>>,
    all_words: &[WordEntry],
) -> Option<String> {
    round
        .and_then(|r| r.find_displayed(word))
        .or_else(|| all_words.iter().find(|w| w.word == word))
        .map(|entry| entry.definition.clone())
}
