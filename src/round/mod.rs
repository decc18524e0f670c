//! Matching rounds
//!
//! This module provides:
//! - Fisher–Yates shuffling
//! - The round controller (word pool, displayed cards, mastery tracking)
//! - The interactive session (selection, scoring, pause, delayed removal)

pub mod controller;
pub mod models;
pub mod session;
pub mod shuffle;

pub use controller::{RoundController, RoundError};
pub use models::*;
pub use session::{ClickOutcome, GameSession, PendingMatch, Resolution};
