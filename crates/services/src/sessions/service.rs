use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;

use sananki_core::answer;
use sananki_core::model::{Card, CardId, CardType};

use super::progress::StudyProgress;

/// In-memory state of one study pass.
///
/// This is a disposable view over a persisted session: it drives a single
/// UI run and is rebuilt from `SessionState` on reload. Completion is
/// reflected into progress records and the persisted counters, never by
/// persisting this type. All mutation goes through its methods so there is
/// exactly one writer per field.
pub struct StudySession {
    cards: Vec<Card>,
    current: usize,
    results: HashMap<CardId, bool>,
    started_at: DateTime<Utc>,
}

impl StudySession {
    #[must_use]
    pub fn new(cards: Vec<Card>, started_at: DateTime<Utc>) -> Self {
        Self {
            cards,
            current: 0,
            results: HashMap::new(),
            started_at,
        }
    }

    /// Resumes at a previously persisted cursor position.
    #[must_use]
    pub fn resumed_at(cards: Vec<Card>, current: usize, started_at: DateTime<Utc>) -> Self {
        let current = current.min(cards.len());
        Self {
            cards,
            current,
            results: HashMap::new(),
            started_at,
        }
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The card under the cursor, or `None` once the pass is finished.
    #[must_use]
    pub fn current_card(&self) -> Option<&Card> {
        self.cards.get(self.current)
    }

    /// Records the result for a card. Re-answering the same card keeps
    /// only the latest result.
    pub fn record_result(&mut self, card_id: CardId, is_correct: bool) {
        self.results.insert(card_id, is_correct);
    }

    /// Checks a typed answer against the current card and records the
    /// verdict. Returns `None` once the pass is finished.
    ///
    /// Fill-in-the-blank cards are matched strictly after normalization;
    /// everything else goes through the lenient checker (case, punctuation
    /// and numeric-equivalence tolerant).
    pub fn answer_current(&mut self, given: &str) -> Option<bool> {
        let card = self.cards.get(self.current)?;
        let is_correct = match card.card_type {
            CardType::FillInBlank => answer::check_blank_answer(given, &card.answer),
            _ => answer::check_answer(given, &card.answer),
        };
        let id = card.id.clone();
        self.results.insert(id, is_correct);
        Some(is_correct)
    }

    /// Moves the cursor forward; returns false when the pass is over.
    pub fn move_to_next(&mut self) -> bool {
        self.current += 1;
        self.current < self.cards.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current >= self.cards.len()
    }

    /// 1-based progress snapshot for display.
    #[must_use]
    pub fn progress(&self) -> StudyProgress {
        let total = self.cards.len();
        let current = (self.current + 1).min(total.max(1));
        let percentage = if total == 0 {
            100
        } else {
            (current * 100 + total / 2) / total
        };
        StudyProgress {
            current,
            total,
            percentage,
        }
    }

    /// Ids answered incorrectly during this pass, for the retry round.
    #[must_use]
    pub fn incorrect_card_ids(&self) -> Vec<CardId> {
        self.results
            .iter()
            .filter(|(_, correct)| !**correct)
            .map(|(id, _)| id.clone())
            .collect()
    }

    #[must_use]
    pub fn results(&self) -> &HashMap<CardId, bool> {
        &self.results
    }
}

impl fmt::Debug for StudySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudySession")
            .field("cards_len", &self.cards.len())
            .field("current", &self.current)
            .field("results_len", &self.results.len())
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}
