//! Interactive game session on top of a round
//!
//! Tracks card selection, scoring and pause state, and gates removals behind a
//! short feedback delay. A correct pair is not removed immediately: it fades
//! while a single pending removal is outstanding, and the caller resolves it
//! once the delay has elapsed. While that removal is pending the fading cards
//! ignore clicks and no second match can be scored.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::controller::{Result, RoundController, RoundError};
use super::models::*;
use super::shuffle::shuffle;
use crate::config::GameConfig;
use crate::words::WordEntry;

/// A correct pair waiting for its feedback delay to pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMatch {
    pub word_slot: usize,
    pub definition_position: usize,
    pub word: String,
    pub resolve_at: Instant,
}

/// Result of clicking a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Paused, or the card is fading out
    Ignored,
    /// Card selected; waiting for the other half of the pair
    Selected,
    /// A pair was completed while another match was still resolving
    Discarded,
    Correct { word: String, resolve_at: Instant },
    /// `word` was paired with the definition of `definition_of`
    Incorrect { word: String, definition_of: String },
}

/// A resolved pending match
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    #[serde(flatten)]
    pub record: MatchRecord,
    pub score: u32,
}

pub struct GameSession<R = StdRng> {
    round: RoundController<R>,
    display_count: usize,
    feedback_delay: Duration,
    correct_points: u32,
    miss_penalty: u32,
    score: u32,
    paused: bool,
    selected_word: Option<usize>,
    selected_definition: Option<usize>,
    /// Definition position -> display slot of the word it belongs to
    definition_layout: Vec<usize>,
    pending: Option<PendingMatch>,
}

impl GameSession<StdRng> {
    pub fn new(config: &GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> GameSession<R> {
    pub fn with_rng(config: &GameConfig, rng: R) -> Self {
        Self {
            round: RoundController::with_rng(rng),
            display_count: config.display_count,
            feedback_delay: config.feedback_delay(),
            correct_points: config.correct_points,
            miss_penalty: config.miss_penalty,
            score: 0,
            paused: false,
            selected_word: None,
            selected_definition: None,
            definition_layout: Vec::new(),
            pending: None,
        }
    }

    /// Start a fresh round, cancelling anything left over from the last one
    pub fn start(&mut self, words: &[WordEntry]) -> Result<()> {
        self.cancel();
        self.round.start_round(words, self.display_count)?;
        self.round.fill_display();
        self.relayout();
        self.score = 0;
        self.paused = false;
        Ok(())
    }

    /// Drop any pending removal and selection
    pub fn cancel(&mut self) {
        self.pending = None;
        self.selected_word = None;
        self.selected_definition = None;
    }

    /// Leave the game view
    pub fn leave(&mut self) {
        self.cancel();
        self.round.abandon();
        self.definition_layout.clear();
    }

    /// Returns the new paused state
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn select_word(&mut self, slot: usize) -> Result<ClickOutcome> {
        if self.paused {
            return Ok(ClickOutcome::Ignored);
        }
        if self.round.slot(slot).is_none() {
            return Err(RoundError::EmptySlot(slot));
        }
        if self.is_fading_word(slot) {
            return Ok(ClickOutcome::Ignored);
        }

        self.selected_word = Some(slot);
        self.check_selection()
    }

    pub fn select_definition(&mut self, position: usize) -> Result<ClickOutcome> {
        if self.paused {
            return Ok(ClickOutcome::Ignored);
        }
        if position >= self.definition_layout.len() {
            return Err(RoundError::EmptyDefinition(position));
        }
        if self.is_fading_definition(position) {
            return Ok(ClickOutcome::Ignored);
        }

        self.selected_definition = Some(position);
        self.check_selection()
    }

    fn check_selection(&mut self) -> Result<ClickOutcome> {
        let (word_slot, position) = match (self.selected_word, self.selected_definition) {
            (Some(w), Some(d)) => (w, d),
            _ => return Ok(ClickOutcome::Selected),
        };

        if self.pending.is_some() {
            self.selected_definition = None;
            return Ok(ClickOutcome::Discarded);
        }

        let definition_slot = self.definition_layout[position];
        let word_entry = self.round.slot(word_slot).ok_or(RoundError::EmptySlot(word_slot))?;
        let definition_entry = self
            .round
            .slot(definition_slot)
            .ok_or(RoundError::EmptySlot(definition_slot))?;

        let is_match = word_entry.word == definition_entry.word
            && word_entry.definition == definition_entry.definition;

        self.selected_word = None;
        self.selected_definition = None;

        if is_match {
            let word = word_entry.word.clone();
            let resolve_at = Instant::now() + self.feedback_delay;
            self.score = self.score.saturating_add(self.correct_points);
            self.pending = Some(PendingMatch {
                word_slot,
                definition_position: position,
                word: word.clone(),
                resolve_at,
            });
            Ok(ClickOutcome::Correct { word, resolve_at })
        } else {
            let outcome = ClickOutcome::Incorrect {
                word: word_entry.word.clone(),
                definition_of: definition_entry.word.clone(),
            };
            self.score = self.score.saturating_sub(self.miss_penalty);
            Ok(outcome)
        }
    }

    /// Remove the fading pair once its delay has passed.
    ///
    /// Returns `None` when nothing is pending or the deadline is still ahead.
    pub fn resolve_pending(&mut self, now: Instant) -> Result<Option<Resolution>> {
        match &self.pending {
            Some(pending) if now >= pending.resolve_at => {}
            _ => return Ok(None),
        }
        let pending = match self.pending.take() {
            Some(p) => p,
            None => return Ok(None),
        };

        let record = self.round.record_match_at(pending.word_slot)?;
        if self.selected_word == Some(pending.word_slot) {
            self.selected_word = None;
        }
        self.relayout();

        Ok(Some(Resolution {
            record,
            score: self.score,
        }))
    }

    /// Reshuffle where each displayed word's definition is shown
    fn relayout(&mut self) {
        let mut layout: Vec<usize> = self.round.displayed().map(|(slot, _)| slot).collect();
        shuffle(&mut layout, self.round.rng_mut());
        self.definition_layout = layout;
        self.selected_definition = None;
    }

    fn is_fading_word(&self, slot: usize) -> bool {
        self.pending.as_ref().map_or(false, |p| p.word_slot == slot)
    }

    fn is_fading_definition(&self, position: usize) -> bool {
        self.pending
            .as_ref()
            .map_or(false, |p| p.definition_position == position)
    }

    // ==================== Accessors ====================

    pub fn round(&self) -> &RoundController<R> {
        &self.round
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// A correct match is waiting for its feedback delay
    pub fn is_processing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingMatch> {
        self.pending.as_ref()
    }

    pub fn selected_word(&self) -> Option<usize> {
        self.selected_word
    }

    pub fn selected_definition(&self) -> Option<usize> {
        self.selected_definition
    }

    /// Word cards by display slot
    pub fn word_cards(&self) -> Vec<(usize, &WordEntry)> {
        self.round.displayed().collect()
    }

    /// Definition cards by position
    pub fn definition_cards(&self) -> Vec<(usize, &str)> {
        self.definition_layout
            .iter()
            .enumerate()
            .filter_map(|(pos, slot)| {
                self.round
                    .slot(*slot)
                    .map(|entry| (pos, entry.definition.as_str()))
            })
            .collect()
    }

    /// Slot of the word whose definition sits at `position`
    pub fn definition_slot(&self, position: usize) -> Option<usize> {
        self.definition_layout.get(position).copied()
    }

    pub fn status(&self) -> RoundStatus {
        self.round.status()
    }
}
