use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::CardId;

//
// ─── SESSION KIND ──────────────────────────────────────────────────────────────
//

/// The two independent session tracks per calendar day.
///
/// The tracks never share state: each has its own persisted row keyed by
/// `(date, kind)` and its own card pool, and both reset independently when
/// the study date rolls over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// The main daily batch.
    Daily,
    /// Optional supplementary batch on top of the daily one.
    Additional,
}

impl SessionKind {
    /// Maps the persisted `is_additional_study` flag back to a kind.
    #[must_use]
    pub fn from_additional_flag(is_additional: bool) -> Self {
        if is_additional {
            SessionKind::Additional
        } else {
            SessionKind::Daily
        }
    }

    /// The persisted flag value for this kind.
    #[must_use]
    pub fn is_additional(self) -> bool {
        matches!(self, SessionKind::Additional)
    }

    /// How many cards a new session of this kind selects.
    #[must_use]
    pub fn capacity(self) -> usize {
        match self {
            SessionKind::Daily => 30,
            SessionKind::Additional => 10,
        }
    }
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStateError {
    #[error("completed cards ({completed}) exceeds total ({total})")]
    CompletedExceedsTotal { completed: u32, total: u32 },

    #[error("current index ({index}) exceeds total cards ({total})")]
    IndexOutOfRange { index: u32, total: u32 },
}

/// Durable state of one session, keyed by `(date, kind)`.
///
/// `card_ids` is fixed when the session is created for the day; only the
/// cursor and the completed-cards high-water mark change afterwards. A new
/// study date simply gets a fresh row; old rows are never touched again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub date: NaiveDate,
    pub kind: SessionKind,
    pub card_ids: Vec<CardId>,
    pub current_index: u32,
    pub total_cards: u32,
    pub completed_cards: u32,
}

impl SessionState {
    /// A fresh session for today with its card order fixed.
    #[must_use]
    pub fn new(date: NaiveDate, kind: SessionKind, card_ids: Vec<CardId>) -> Self {
        let total = u32::try_from(card_ids.len()).unwrap_or(u32::MAX);
        Self {
            date,
            kind,
            card_ids,
            current_index: 0,
            total_cards: total,
            completed_cards: 0,
        }
    }

    /// Rehydrates persisted state, validating counter invariants.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError` if the persisted counters are mutually
    /// inconsistent.
    pub fn from_persisted(
        date: NaiveDate,
        kind: SessionKind,
        card_ids: Vec<CardId>,
        current_index: u32,
        total_cards: u32,
        completed_cards: u32,
    ) -> Result<Self, SessionStateError> {
        if completed_cards > total_cards {
            return Err(SessionStateError::CompletedExceedsTotal {
                completed: completed_cards,
                total: total_cards,
            });
        }
        if current_index > total_cards {
            return Err(SessionStateError::IndexOutOfRange {
                index: current_index,
                total: total_cards,
            });
        }
        Ok(Self {
            date,
            kind,
            card_ids,
            current_index,
            total_cards,
            completed_cards,
        })
    }

    /// Records that the card at `index` was answered.
    ///
    /// `completed_cards` is a monotonic high-water mark: out-of-order and
    /// duplicate calls never decrease it. The cursor follows the mark so a
    /// resumed session lands on the first unanswered position.
    pub fn record_answered(&mut self, index: u32) {
        let answered = index.saturating_add(1).min(self.total_cards);
        if answered > self.completed_cards {
            self.completed_cards = answered;
        }
        if self.completed_cards > self.current_index {
            self.current_index = self.completed_cards.min(self.total_cards);
        }
    }

    /// Cards not yet answered.
    #[must_use]
    pub fn remaining_cards(&self) -> u32 {
        self.total_cards.saturating_sub(self.completed_cards)
    }

    /// Whether every card in the session has been answered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_cards >= self.total_cards
    }
}
