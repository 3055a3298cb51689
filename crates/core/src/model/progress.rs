use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::CardId;
use crate::scheduler;

//
// ─── ANSWER RESULT ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnswerResultError {
    #[error("unknown answer result: {0}")]
    Unknown(String),
}

/// Outcome of the most recent answer for a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerResult {
    Correct,
    Incorrect,
}

impl AnswerResult {
    /// Stable storage representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AnswerResult::Correct => "correct",
            AnswerResult::Incorrect => "incorrect",
        }
    }

    /// Parses the storage representation.
    ///
    /// # Errors
    ///
    /// Returns `AnswerResultError::Unknown` for any other string.
    pub fn parse(value: &str) -> Result<Self, AnswerResultError> {
        match value {
            "correct" => Ok(AnswerResult::Correct),
            "incorrect" => Ok(AnswerResult::Incorrect),
            other => Err(AnswerResultError::Unknown(other.to_owned())),
        }
    }
}

//
// ─── PROGRESS RECORD ───────────────────────────────────────────────────────────
//

/// Per-card study progress, keyed by card id.
///
/// One record per card, upserted on every answer and never deleted. A card
/// with no record at all is simply "unseen".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub card_id: CardId,
    /// Consecutive correct answers since the last incorrect one.
    pub correct_streak: u32,
    /// `None` until the card has been answered at least once.
    pub last_result: Option<AnswerResult>,
    pub last_studied_at: Option<DateTime<Utc>>,
    /// `None` means never scheduled: eligible immediately.
    pub next_review_at: Option<NaiveDate>,
}

impl ProgressRecord {
    /// A fresh record for a card that has never been studied.
    #[must_use]
    pub fn new(card_id: CardId) -> Self {
        Self {
            card_id,
            correct_streak: 0,
            last_result: None,
            last_studied_at: None,
            next_review_at: None,
        }
    }

    /// Whether the card is due on the given study date.
    ///
    /// Unscheduled cards are always due.
    #[must_use]
    pub fn is_due(&self, today: NaiveDate) -> bool {
        match self.next_review_at {
            None => true,
            Some(date) => date <= today,
        }
    }

    /// Applies one answer, updating streak, result, and the next review
    /// date.
    ///
    /// Correct answers increment the streak by exactly one and schedule the
    /// next review from the interval table; incorrect answers reset the
    /// streak to zero and schedule for tomorrow. `today` must come from the
    /// study-date rule so scheduling stays anchored to the same calendar.
    pub fn apply_answer(&mut self, is_correct: bool, today: NaiveDate, now: DateTime<Utc>) {
        if is_correct {
            self.correct_streak += 1;
            self.last_result = Some(AnswerResult::Correct);
            self.next_review_at = Some(scheduler::next_review_date(today, self.correct_streak));
        } else {
            self.correct_streak = 0;
            self.last_result = Some(AnswerResult::Incorrect);
            self.next_review_at = Some(scheduler::retry_date(today));
        }
        self.last_studied_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn fresh_record_is_due_and_unanswered() {
        let record = ProgressRecord::new(CardId::new("c1"));
        assert!(record.is_due(today()));
        assert_eq!(record.correct_streak, 0);
        assert!(record.last_result.is_none());
        assert!(record.next_review_at.is_none());
    }

    #[test]
    fn three_correct_answers_schedule_seven_days_out() {
        let mut record = ProgressRecord::new(CardId::new("c1"));
        for _ in 0..3 {
            record.apply_answer(true, today(), fixed_now());
        }
        assert_eq!(record.correct_streak, 3);
        assert_eq!(record.last_result, Some(AnswerResult::Correct));
        assert_eq!(
            record.next_review_at,
            Some(NaiveDate::from_ymd_opt(2024, 3, 8).unwrap())
        );
    }

    #[test]
    fn incorrect_answer_resets_streak_and_schedules_tomorrow() {
        let mut record = ProgressRecord::new(CardId::new("c1"));
        for _ in 0..5 {
            record.apply_answer(true, today(), fixed_now());
        }
        assert_eq!(record.correct_streak, 5);

        record.apply_answer(false, today(), fixed_now());
        assert_eq!(record.correct_streak, 0);
        assert_eq!(record.last_result, Some(AnswerResult::Incorrect));
        assert_eq!(
            record.next_review_at,
            Some(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap())
        );
        assert_eq!(record.last_studied_at, Some(fixed_now()));
    }

    #[test]
    fn due_comparison_is_inclusive() {
        let mut record = ProgressRecord::new(CardId::new("c1"));
        record.next_review_at = Some(today());
        assert!(record.is_due(today()));
        record.next_review_at = Some(today().succ_opt().unwrap());
        assert!(!record.is_due(today()));
    }

    #[test]
    fn answer_result_round_trips_through_storage_form() {
        for result in [AnswerResult::Correct, AnswerResult::Incorrect] {
            assert_eq!(AnswerResult::parse(result.as_str()).unwrap(), result);
        }
        assert!(AnswerResult::parse("maybe").is_err());
    }
}
