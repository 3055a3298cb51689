use serde::Serialize;

use sananki_core::model::Card;

/// 1-based position within an in-memory study pass, for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StudyProgress {
    pub current: usize,
    pub total: usize,
    pub percentage: usize,
}

/// A session as handed to the study UI: rehydrated cards plus the
/// persisted counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionData {
    pub cards: Vec<Card>,
    pub current_index: u32,
    pub total_cards: u32,
    pub completed_cards: u32,
}

/// Aggregate counters for the day's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub total_cards: u32,
    pub completed_cards: u32,
    pub remaining_cards: u32,
}
