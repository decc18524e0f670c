//! Data models for a matching round

use serde::Serialize;

use crate::words::WordEntry;

/// Successful matches a word needs before it stops coming back
pub const MASTERY_THRESHOLD: u32 = 5;

/// Number of word cards shown at once
pub const DEFAULT_DISPLAY_COUNT: usize = 5;

/// Lifecycle of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundStatus {
    /// No round started yet, or the last one was abandoned
    Idle,
    InProgress,
    /// Every word reached the mastery threshold
    Complete,
}

impl Default for RoundStatus {
    fn default() -> Self {
        Self::Idle
    }
}

/// What happened when a displayed word was matched
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub slot: usize,
    pub entry: WordEntry,
    /// Appearance count of the word after this match
    pub appearances: u32,
    /// The pool was rebuilt while backfilling
    pub replenished: bool,
    /// Word moved into the freed slot, if any was left
    pub backfilled: Option<WordEntry>,
    pub complete: bool,
}

/// Summary of round progress for display
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundProgress {
    pub total_words: usize,
    pub mastered_words: usize,
    pub matches: u32,
    pub pool_remaining: usize,
    pub displayed: usize,
}
