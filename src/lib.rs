//! Vocabulary matching game
//!
//! Words and named lists are kept in a local store. A round shows a few
//! words and their shuffled definitions; every correct pair counts towards
//! mastery and the round continues until each word has been matched
//! `round::MASTERY_THRESHOLD` times.

pub mod config;
pub mod favorites;
pub mod round;
pub mod words;

pub use config::{ConfigError, GameConfig};
pub use favorites::{FavoriteEntry, Favorites, FavoritesError};
pub use round::{GameSession, RoundController, RoundError, RoundStatus, MASTERY_THRESHOLD};
pub use words::{StoreError, WordEntry, WordList, WordStore};
