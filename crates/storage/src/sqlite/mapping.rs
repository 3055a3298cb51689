use chrono::{DateTime, NaiveDate, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use sananki_core::model::{
    AnswerResult, Card, CardId, CardType, ProgressRecord, SessionKind, SessionState,
};

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn choices_to_json(choices: &[String]) -> Result<String, StorageError> {
    serde_json::to_string(choices).map_err(ser)
}

pub(crate) fn card_ids_to_json(ids: &[CardId]) -> Result<String, StorageError> {
    serde_json::to_string(ids).map_err(ser)
}

pub(crate) fn map_card_row(row: &SqliteRow) -> Result<Card, StorageError> {
    let choices_json: String = row.try_get("choices").map_err(ser)?;
    let choices: Vec<String> = serde_json::from_str(&choices_json).map_err(ser)?;

    let type_str: String = row.try_get("card_type").map_err(ser)?;
    let card_type = CardType::parse(&type_str).map_err(ser)?;

    Ok(Card {
        id: CardId::new(row.try_get::<String, _>("id").map_err(ser)?),
        category: row.try_get("category").map_err(ser)?,
        question: row.try_get("question").map_err(ser)?,
        answer: row.try_get("answer").map_err(ser)?,
        choices,
        explanation: row.try_get("explanation").map_err(ser)?,
        card_type,
        source: row.try_get("source").map_err(ser)?,
    })
}

pub(crate) fn map_progress_row(row: &SqliteRow) -> Result<ProgressRecord, StorageError> {
    let streak_i64: i64 = row.try_get("correct_streak").map_err(ser)?;
    let correct_streak = u32::try_from(streak_i64)
        .map_err(|_| StorageError::Serialization(format!("invalid streak: {streak_i64}")))?;

    let last_result = row
        .try_get::<Option<String>, _>("last_result")
        .map_err(ser)?
        .map(|s| AnswerResult::parse(&s))
        .transpose()
        .map_err(ser)?;

    Ok(ProgressRecord {
        card_id: CardId::new(row.try_get::<String, _>("card_id").map_err(ser)?),
        correct_streak,
        last_result,
        last_studied_at: row
            .try_get::<Option<DateTime<Utc>>, _>("last_studied_at")
            .map_err(ser)?,
        next_review_at: row
            .try_get::<Option<NaiveDate>, _>("next_review_at")
            .map_err(ser)?,
    })
}

pub(crate) fn map_session_row(row: &SqliteRow) -> Result<SessionState, StorageError> {
    let date: NaiveDate = row.try_get("date").map_err(ser)?;
    let is_additional: bool = row.try_get("is_additional_study").map_err(ser)?;

    let ids_json: String = row.try_get("card_ids").map_err(ser)?;
    let card_ids: Vec<CardId> = serde_json::from_str(&ids_json).map_err(ser)?;

    let index = counter(row, "current_index")?;
    let total = counter(row, "total_cards")?;
    let completed = counter(row, "completed_cards")?;

    SessionState::from_persisted(
        date,
        SessionKind::from_additional_flag(is_additional),
        card_ids,
        index,
        total,
        completed,
    )
    .map_err(ser)
}

fn counter(row: &SqliteRow, field: &'static str) -> Result<u32, StorageError> {
    let value: i64 = row.try_get(field).map_err(ser)?;
    u32::try_from(value)
        .map_err(|_| StorageError::Serialization(format!("invalid {field}: {value}")))
}
