use chrono::NaiveDate;
use sqlx::Row;

use sananki_core::model::{AnswerResult, CardId, ProgressRecord};

use super::{SqliteRepository, mapping};
use crate::repository::{ProgressRepository, StorageError};

fn conn_err(e: sqlx::Error) -> StorageError {
    StorageError::Unavailable(e.to_string())
}

fn ids_from_rows(rows: Vec<sqlx::sqlite::SqliteRow>) -> Result<Vec<CardId>, StorageError> {
    rows.into_iter()
        .map(|row| {
            row.try_get::<String, _>("card_id")
                .map(CardId::new)
                .map_err(|e| StorageError::Serialization(e.to_string()))
        })
        .collect()
}

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn get_progress(&self, card_id: &CardId) -> Result<Option<ProgressRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT card_id, correct_streak, last_result, last_studied_at, next_review_at
            FROM card_progress
            WHERE card_id = ?1
            ",
        )
        .bind(card_id.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(conn_err)?;

        row.as_ref().map(mapping::map_progress_row).transpose()
    }

    async fn upsert_progress(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO card_progress (
                card_id, correct_streak, last_result, last_studied_at, next_review_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(card_id) DO UPDATE SET
                correct_streak = excluded.correct_streak,
                last_result = excluded.last_result,
                last_studied_at = excluded.last_studied_at,
                next_review_at = excluded.next_review_at
            ",
        )
        .bind(record.card_id.as_str())
        .bind(i64::from(record.correct_streak))
        .bind(record.last_result.map(AnswerResult::as_str))
        .bind(record.last_studied_at)
        .bind(record.next_review_at)
        .execute(self.pool())
        .await
        .map_err(conn_err)?;

        Ok(())
    }

    async fn due_card_ids(&self, today: NaiveDate) -> Result<Vec<CardId>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT card_id
            FROM card_progress
            WHERE next_review_at IS NULL OR next_review_at <= ?1
            ORDER BY next_review_at IS NOT NULL, next_review_at ASC, card_id ASC
            ",
        )
        .bind(today)
        .fetch_all(self.pool())
        .await
        .map_err(conn_err)?;

        ids_from_rows(rows)
    }

    async fn tracked_card_ids(&self) -> Result<Vec<CardId>, StorageError> {
        let rows = sqlx::query("SELECT card_id FROM card_progress ORDER BY card_id")
            .fetch_all(self.pool())
            .await
            .map_err(conn_err)?;

        ids_from_rows(rows)
    }

    async fn incorrect_card_ids(&self) -> Result<Vec<CardId>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT card_id
            FROM card_progress
            WHERE last_result = 'incorrect'
            ORDER BY card_id
            ",
        )
        .fetch_all(self.pool())
        .await
        .map_err(conn_err)?;

        ids_from_rows(rows)
    }
}
