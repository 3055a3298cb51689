use chrono::NaiveDate;

use sananki_core::model::{SessionKind, SessionState};

use super::{SqliteRepository, mapping};
use crate::repository::{SessionRepository, StorageError};

fn conn_err(e: sqlx::Error) -> StorageError {
    StorageError::Unavailable(e.to_string())
}

#[async_trait::async_trait]
impl SessionRepository for SqliteRepository {
    async fn get_session(
        &self,
        date: NaiveDate,
        kind: SessionKind,
    ) -> Result<Option<SessionState>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT date, is_additional_study, card_ids, current_index, total_cards, completed_cards
            FROM daily_sessions
            WHERE date = ?1 AND is_additional_study = ?2
            ",
        )
        .bind(date)
        .bind(kind.is_additional())
        .fetch_optional(self.pool())
        .await
        .map_err(conn_err)?;

        row.as_ref().map(mapping::map_session_row).transpose()
    }

    async fn upsert_session(&self, state: &SessionState) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO daily_sessions (
                date, is_additional_study, card_ids, current_index, total_cards, completed_cards
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(date, is_additional_study) DO UPDATE SET
                -- card_ids is fixed at creation; rewriting it with the same
                -- value keeps the upsert a single statement
                card_ids = excluded.card_ids,
                current_index = excluded.current_index,
                total_cards = excluded.total_cards,
                completed_cards = excluded.completed_cards
            ",
        )
        .bind(state.date)
        .bind(state.kind.is_additional())
        .bind(mapping::card_ids_to_json(&state.card_ids)?)
        .bind(i64::from(state.current_index))
        .bind(i64::from(state.total_cards))
        .bind(i64::from(state.completed_cards))
        .execute(self.pool())
        .await
        .map_err(conn_err)?;

        Ok(())
    }
}
