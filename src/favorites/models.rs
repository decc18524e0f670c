//! Data models for favorites

use serde::{Deserialize, Serialize};

/// A word the user marked for later review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub word: String,
    #[serde(default)]
    pub meaning: String,
}
