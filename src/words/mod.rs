//! Word storage for the matching game
//!
//! This module provides:
//! - Word and word list models
//! - A single-document JSON store with list cascades and upserting import
//! - Plain-text `word,definition` file parsing
//! - Vocabulary tables from `.docx` documents

pub mod docx;
pub mod import;
pub mod models;
pub mod storage;

pub use docx::{parse_docx_file, to_word_list, DocxError};
pub use import::{parse_word_file, parse_word_list, ParsedImport};
pub use models::*;
pub use storage::{ErrorKind, ImportStats, StoreError, WordStore};
