//! Data models for stored words and word lists

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single word with its definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEntry {
    /// Generated by the store; 0 for entries that were never persisted
    #[serde(default)]
    pub id: i64,
    pub word: String,
    pub definition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_id: Option<i64>,
}

impl WordEntry {
    pub fn new(word: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            id: 0,
            word: word.into(),
            definition: definition.into(),
            list_id: None,
        }
    }
}

/// A named collection of words
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordList {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl WordList {
    pub fn new(id: i64, title: String) -> Self {
        Self {
            id,
            title,
            created_at: Utc::now(),
        }
    }
}

/// A word list together with the number of words it owns
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordListSummary {
    #[serde(flatten)]
    pub list: WordList,
    pub word_count: usize,
}
