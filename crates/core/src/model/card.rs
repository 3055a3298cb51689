use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::CardId;

//
// ─── CARD TYPE ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CardTypeError {
    #[error("unknown card type: {0}")]
    Unknown(String),
}

/// Closed set of question variants supported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    /// Choices list present; `answer` is the 1-based choice number.
    MultipleChoice,
    /// `answer` is "O" or "X".
    TrueFalse,
    /// `answer` is the text that fills the blank in `question`.
    FillInBlank,
    /// `answer` is free text, compared after normalization.
    ShortAnswer,
}

impl CardType {
    /// Stable storage representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CardType::MultipleChoice => "multiple_choice",
            CardType::TrueFalse => "true_false",
            CardType::FillInBlank => "fill_in_blank",
            CardType::ShortAnswer => "short_answer",
        }
    }

    /// Parses the storage representation.
    ///
    /// # Errors
    ///
    /// Returns `CardTypeError::Unknown` for any other string.
    pub fn parse(value: &str) -> Result<Self, CardTypeError> {
        match value {
            "multiple_choice" => Ok(CardType::MultipleChoice),
            "true_false" => Ok(CardType::TrueFalse),
            "fill_in_blank" => Ok(CardType::FillInBlank),
            "short_answer" => Ok(CardType::ShortAnswer),
            other => Err(CardTypeError::Unknown(other.to_owned())),
        }
    }
}

//
// ─── CARD ──────────────────────────────────────────────────────────────────────
//

/// Immutable catalog entry.
///
/// Cards are created by content authoring and never mutated by the study
/// core; everything that changes over time lives in `ProgressRecord`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub category: String,
    pub question: String,
    /// Canonical correct answer; interpretation depends on `card_type`.
    pub answer: String,
    /// Ordered choices; empty for everything but multiple choice.
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(rename = "type")]
    pub card_type: CardType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Card {
    #[must_use]
    pub fn id(&self) -> &CardId {
        &self.id
    }
}
