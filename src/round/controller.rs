//! Round controller
//!
//! Owns the word pool, the displayed cards and the per-word appearance
//! counts of one round. Words are consumed from the front of a shuffled
//! pool into fixed display slots. Whenever the pool runs dry it is rebuilt
//! from the words that have not yet been matched `MASTERY_THRESHOLD` times,
//! and the round ends once every word is mastered and nothing is left on
//! screen or in the pool.
//!
//! A rebuilt pool may hold a word that is still on display. Both copies get
//! matched eventually, so a word's final count can end up above
//! `MASTERY_THRESHOLD`.
//!
//! Appearances are counted per word *text*. Two stored entries with the same
//! word but different definitions share one counter.

use std::collections::{HashMap, VecDeque};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use super::models::*;
use super::shuffle::shuffled;
use crate::words::WordEntry;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoundError {
    #[error("No words available")]
    NoWords,

    #[error("Display count must be at least 1")]
    InvalidDisplayCount,

    #[error("No round in progress")]
    NotInProgress,

    #[error("Word is not on display: {0}")]
    WordNotDisplayed(String),

    #[error("No word in display slot {0}")]
    EmptySlot(usize),

    #[error("No definition at position {0}")]
    EmptyDefinition(usize),
}

pub type Result<T> = std::result::Result<T, RoundError>;

pub struct RoundController<R = StdRng> {
    rng: R,
    status: RoundStatus,
    /// Entries the round was started with; replenishment draws from these
    words: Vec<WordEntry>,
    pool: VecDeque<WordEntry>,
    /// Display slot index -> entry shown there
    slots: Vec<Option<WordEntry>>,
    appearance_counts: HashMap<String, u32>,
}

impl RoundController<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for RoundController<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RoundController<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            status: RoundStatus::Idle,
            words: Vec::new(),
            pool: VecDeque::new(),
            slots: Vec::new(),
            appearance_counts: HashMap::new(),
        }
    }

    /// Begin a new round, discarding any previous one
    pub fn start_round(&mut self, words: &[WordEntry], display_count: usize) -> Result<()> {
        if words.is_empty() {
            return Err(RoundError::NoWords);
        }
        if display_count == 0 {
            return Err(RoundError::InvalidDisplayCount);
        }

        self.appearance_counts.clear();
        for entry in words {
            self.appearance_counts.insert(entry.word.clone(), 0);
        }

        let shared = words.len() - self.appearance_counts.len();
        if shared > 0 {
            log::warn!(
                "{} entries repeat the word text of another entry; they share one appearance count",
                shared
            );
        }

        self.words = words.to_vec();
        self.pool = shuffled(words, &mut self.rng).into();
        self.slots = vec![None; display_count];
        self.status = RoundStatus::InProgress;

        log::info!(
            "Round started with {} words, {} cards at a time",
            self.appearance_counts.len(),
            display_count
        );
        Ok(())
    }

    /// Fill empty display slots from the front of the pool.
    ///
    /// Returns the slots that received a word.
    pub fn fill_display(&mut self) -> Vec<usize> {
        let mut filled = Vec::new();
        if self.status != RoundStatus::InProgress {
            return filled;
        }

        if self.pool.is_empty() && self.first_free_slot().is_some() {
            self.replenish();
        }

        while let Some(slot) = self.first_free_slot() {
            match self.pool.pop_front() {
                Some(entry) => {
                    self.slots[slot] = Some(entry);
                    filled.push(slot);
                }
                None => break,
            }
        }
        filled
    }

    /// Rebuild an empty pool from the words still below the threshold.
    ///
    /// Returns whether the pool was rebuilt. Does nothing while the pool
    /// still holds words.
    pub fn replenish(&mut self) -> bool {
        if !self.pool.is_empty() {
            return false;
        }

        let pending: Vec<WordEntry> = self
            .words
            .iter()
            .filter(|entry| self.appearances(&entry.word) < MASTERY_THRESHOLD)
            .cloned()
            .collect();

        if pending.is_empty() {
            return false;
        }

        log::debug!("Replenishing pool with {} words", pending.len());
        self.pool = shuffled(&pending, &mut self.rng).into();
        true
    }

    /// Record a successful match for the first displayed card with this word
    pub fn record_match(&mut self, word: &str) -> Result<MatchRecord> {
        self.ensure_in_progress()?;
        let slot = self
            .slots
            .iter()
            .position(|s| s.as_ref().map_or(false, |e| e.word == word))
            .ok_or_else(|| RoundError::WordNotDisplayed(word.to_string()))?;
        self.record_match_at(slot)
    }

    /// Record a successful match for the card in `slot` and backfill that
    /// slot with at most one new word
    pub fn record_match_at(&mut self, slot: usize) -> Result<MatchRecord> {
        self.ensure_in_progress()?;
        let entry = self
            .slots
            .get_mut(slot)
            .and_then(Option::take)
            .ok_or(RoundError::EmptySlot(slot))?;

        let count = self.appearance_counts.entry(entry.word.clone()).or_insert(0);
        *count += 1;
        let appearances = *count;

        let replenished = self.replenish();
        let backfilled = self.pool.pop_front();
        self.slots[slot] = backfilled.clone();

        let complete = self.is_round_complete();
        if complete {
            self.status = RoundStatus::Complete;
            log::info!("Round complete: all {} words mastered", self.appearance_counts.len());
        }

        Ok(MatchRecord {
            slot,
            entry,
            appearances,
            replenished,
            backfilled,
            complete,
        })
    }

    /// True once every word reached the threshold and nothing is left to show
    pub fn is_round_complete(&self) -> bool {
        !self.appearance_counts.is_empty()
            && self
                .appearance_counts
                .values()
                .all(|count| *count >= MASTERY_THRESHOLD)
            && self.pool.is_empty()
            && self.slots.iter().all(Option::is_none)
    }

    /// Drop the current round without completing it
    pub fn abandon(&mut self) {
        self.status = RoundStatus::Idle;
        self.words.clear();
        self.pool.clear();
        self.slots.clear();
        self.appearance_counts.clear();
    }

    fn ensure_in_progress(&self) -> Result<()> {
        if self.status != RoundStatus::InProgress {
            return Err(RoundError::NotInProgress);
        }
        Ok(())
    }

    fn first_free_slot(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    pub(crate) fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    // ==================== Accessors ====================

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn display_count(&self) -> usize {
        self.slots.len()
    }

    /// Display slots, indexed by position
    pub fn slots(&self) -> &[Option<WordEntry>] {
        &self.slots
    }

    pub fn slot(&self, slot: usize) -> Option<&WordEntry> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Occupied slots with their entries
    pub fn displayed(&self) -> impl Iterator<Item = (usize, &WordEntry)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|e| (i, e)))
    }

    /// First displayed entry with this word text
    pub fn find_displayed(&self, word: &str) -> Option<&WordEntry> {
        self.displayed().map(|(_, e)| e).find(|e| e.word == word)
    }

    pub fn pool(&self) -> impl Iterator<Item = &WordEntry> {
        self.pool.iter()
    }

    pub fn appearances(&self, word: &str) -> u32 {
        self.appearance_counts.get(word).copied().unwrap_or(0)
    }

    pub fn appearance_counts(&self) -> &HashMap<String, u32> {
        &self.appearance_counts
    }

    pub fn progress(&self) -> RoundProgress {
        RoundProgress {
            total_words: self.appearance_counts.len(),
            mastered_words: self
                .appearance_counts
                .values()
                .filter(|c| **c >= MASTERY_THRESHOLD)
                .count(),
            matches: self.appearance_counts.values().sum(),
            pool_remaining: self.pool.len(),
            displayed: self.displayed().count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(names: &[&str]) -> Vec<WordEntry> {
        names
            .iter()
            .map(|w| WordEntry::new(*w, format!("meaning of {}", w)))
            .collect()
    }

    fn seeded(seed: u64) -> RoundController<StdRng> {
        RoundController::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Match the first displayed card until the round ends, checking the
    /// round invariants after every step. Returns the number of matches.
    fn play_to_completion(round: &mut RoundController<StdRng>) -> usize {
        let mut matches = 0;
        assert!(!round.fill_display().is_empty());

        while round.status() == RoundStatus::InProgress {
            let slot = round
                .displayed()
                .map(|(slot, _)| slot)
                .next()
                .expect("a card is always on display during a round");
            let record = round.record_match_at(slot).unwrap();
            matches += 1;

            if record.replenished {
                for entry in round.pool().chain(record.backfilled.iter()) {
                    let count = round.appearances(&entry.word);
                    assert!(
                        count < MASTERY_THRESHOLD,
                        "{} came back with {} appearances",
                        entry.word,
                        count
                    );
                }
            }

            let any_unmastered = round
                .appearance_counts()
                .values()
                .any(|c| *c < MASTERY_THRESHOLD);
            if any_unmastered {
                assert!(!round.is_round_complete());
                assert_eq!(round.status(), RoundStatus::InProgress);
            }

            assert!(matches < 10_000, "round did not terminate");
        }

        matches
    }

    #[test]
    fn test_start_round_requires_words() {
        let mut round = seeded(1);
        assert_eq!(round.start_round(&[], 5), Err(RoundError::NoWords));
        assert_eq!(round.status(), RoundStatus::Idle);
        assert!(!round.is_round_complete());
    }

    #[test]
    fn test_start_round_initializes_state() {
        let mut round = seeded(2);
        round.start_round(&words(&["a", "b", "c"]), 5).unwrap();

        assert_eq!(round.status(), RoundStatus::InProgress);
        assert_eq!(round.pool().count(), 3);
        assert_eq!(round.displayed().count(), 0);
        assert!(round.appearance_counts().values().all(|c| *c == 0));
    }

    #[test]
    fn test_fill_display_respects_display_count() {
        let mut round = seeded(3);
        round
            .start_round(&words(&["a", "b", "c", "d", "e", "f", "g"]), 5)
            .unwrap();

        let filled = round.fill_display();
        assert_eq!(filled, vec![0, 1, 2, 3, 4]);
        assert_eq!(round.pool().count(), 2);

        // Already full, nothing moves
        assert!(round.fill_display().is_empty());
    }

    #[test]
    fn test_fill_display_with_fewer_words_than_slots() {
        let mut round = seeded(4);
        round.start_round(&words(&["a", "b"]), 5).unwrap();

        assert_eq!(round.fill_display().len(), 2);
        assert_eq!(round.displayed().count(), 2);
        assert_eq!(round.pool().count(), 0);
    }

    #[test]
    fn test_record_match_backfills_freed_slot() {
        let mut round = seeded(5);
        round
            .start_round(&words(&["a", "b", "c", "d", "e", "f"]), 5)
            .unwrap();
        round.fill_display();

        let word = round.slot(2).unwrap().word.clone();
        let record = round.record_match(&word).unwrap();

        assert_eq!(record.slot, 2);
        assert_eq!(record.appearances, 1);
        assert_eq!(round.appearances(&word), 1);
        assert!(record.backfilled.is_some());
        assert_eq!(round.slot(2), record.backfilled.as_ref());
        assert_eq!(round.displayed().count(), 5);
        assert!(!record.replenished);
    }

    #[test]
    fn test_record_match_unknown_word() {
        let mut round = seeded(6);
        round.start_round(&words(&["a", "b"]), 5).unwrap();
        round.fill_display();

        assert_eq!(
            round.record_match("zzz").unwrap_err(),
            RoundError::WordNotDisplayed("zzz".to_string())
        );
        assert_eq!(round.record_match_at(4).unwrap_err(), RoundError::EmptySlot(4));
    }

    #[test]
    fn test_record_match_requires_round() {
        let mut round = seeded(7);
        assert_eq!(round.record_match("a").unwrap_err(), RoundError::NotInProgress);
    }

    #[test]
    fn test_single_card_round_matches_each_word_exactly_threshold_times() {
        let mut round = seeded(8);
        round.start_round(&words(&["a", "b"]), 1).unwrap();

        let matches = play_to_completion(&mut round);

        assert_eq!(matches, 2 * MASTERY_THRESHOLD as usize);
        assert_eq!(round.appearances("a"), MASTERY_THRESHOLD);
        assert_eq!(round.appearances("b"), MASTERY_THRESHOLD);
        assert_eq!(round.status(), RoundStatus::Complete);
    }

    #[test]
    fn test_every_word_reaches_threshold() {
        for (seed, count) in [(10u64, 1usize), (11, 3), (12, 5), (13, 8), (14, 23)] {
            let names: Vec<String> = (0..count).map(|i| format!("w{}", i)).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();

            let mut round = seeded(seed);
            round.start_round(&words(&refs), 5).unwrap();
            play_to_completion(&mut round);

            assert!(round.is_round_complete());
            for name in &names {
                assert!(round.appearances(name) >= MASTERY_THRESHOLD);
            }
        }
    }

    #[test]
    fn test_replenish_skips_mastered_words() {
        let mut round = seeded(20);
        round.start_round(&words(&["a", "b", "c"]), 1).unwrap();
        round.pool.clear();
        round.appearance_counts.insert("a".to_string(), MASTERY_THRESHOLD);
        round.appearance_counts.insert("c".to_string(), MASTERY_THRESHOLD + 2);
        round.appearance_counts.insert("b".to_string(), MASTERY_THRESHOLD - 1);

        assert!(round.replenish());
        let pooled: Vec<&str> = round.pool().map(|e| e.word.as_str()).collect();
        assert_eq!(pooled, vec!["b"]);

        // A non-empty pool is left alone
        assert!(!round.replenish());
    }

    #[test]
    fn test_fill_display_replenishes_empty_pool() {
        let mut round = seeded(26);
        round.start_round(&words(&["a", "b"]), 1).unwrap();
        round.pool.clear();
        round.appearance_counts.insert("a".to_string(), MASTERY_THRESHOLD);

        assert_eq!(round.fill_display(), vec![0]);
        assert_eq!(round.slot(0).map(|e| e.word.as_str()), Some("b"));
    }

    #[test]
    fn test_replenish_noop_when_all_mastered() {
        let mut round = seeded(21);
        round.start_round(&words(&["a"]), 1).unwrap();
        round.pool.clear();
        round.appearance_counts.insert("a".to_string(), MASTERY_THRESHOLD);

        assert!(!round.replenish());
        assert!(round.is_round_complete());
    }

    #[test]
    fn test_not_complete_with_cards_left() {
        let mut round = seeded(22);
        round.start_round(&words(&["a"]), 1).unwrap();
        round.fill_display();
        round.appearance_counts.insert("a".to_string(), MASTERY_THRESHOLD);

        // Counts are done but a card is still on display
        assert!(!round.is_round_complete());
    }

    #[test]
    fn test_word_on_display_twice_can_pass_threshold() {
        let mut round = seeded(27);
        round.start_round(&words(&["a", "b"]), 2).unwrap();
        round.fill_display();
        round.appearance_counts.insert("a".to_string(), MASTERY_THRESHOLD - 2);
        round.appearance_counts.insert("b".to_string(), MASTERY_THRESHOLD - 1);

        // Mastering "b" rebuilds the pool with "a", which lands beside the "a" on screen
        let record = round.record_match("b").unwrap();
        assert!(record.replenished);
        assert!(round.displayed().all(|(_, e)| e.word == "a"));
        assert_eq!(round.displayed().count(), 2);

        while round.status() == RoundStatus::InProgress {
            round.record_match("a").unwrap();
        }

        assert_eq!(round.appearances("a"), MASTERY_THRESHOLD + 1);
        assert_eq!(round.appearances("b"), MASTERY_THRESHOLD);
        assert!(round.is_round_complete());
    }

    #[test]
    fn test_duplicate_word_text_shares_count() {
        let mut entries = words(&["bank"]);
        entries.push(WordEntry::new("bank", "side of a river"));

        let mut round = seeded(23);
        round.start_round(&entries, 5).unwrap();
        assert_eq!(round.appearance_counts().len(), 1);

        round.fill_display();
        round.record_match("bank").unwrap();
        round.record_match("bank").unwrap();
        assert_eq!(round.appearances("bank"), 2);
        assert_eq!(round.progress().total_words, 1);
    }

    #[test]
    fn test_restart_after_completion() {
        let mut round = seeded(24);
        round.start_round(&words(&["a"]), 5).unwrap();
        play_to_completion(&mut round);
        assert_eq!(round.status(), RoundStatus::Complete);
        assert_eq!(round.record_match("a").unwrap_err(), RoundError::NotInProgress);

        round.start_round(&words(&["x", "y"]), 5).unwrap();
        assert_eq!(round.status(), RoundStatus::InProgress);
        assert_eq!(round.appearances("a"), 0);
        assert_eq!(round.appearances("x"), 0);
    }

    #[test]
    fn test_abandon_returns_to_idle() {
        let mut round = seeded(25);
        round.start_round(&words(&["a", "b"]), 5).unwrap();
        round.fill_display();

        round.abandon();
        assert_eq!(round.status(), RoundStatus::Idle);
        assert_eq!(round.displayed().count(), 0);
        assert!(round.fill_display().is_empty());
    }
}
