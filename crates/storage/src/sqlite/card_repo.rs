use sananki_core::model::{Card, CardId};

use super::{SqliteRepository, mapping};
use crate::repository::{CardRepository, StorageError};

fn conn_err(e: sqlx::Error) -> StorageError {
    StorageError::Unavailable(e.to_string())
}

#[async_trait::async_trait]
impl CardRepository for SqliteRepository {
    async fn list_cards(&self) -> Result<Vec<Card>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, category, question, answer, choices, explanation, card_type, source
            FROM cards
            ORDER BY id
            ",
        )
        .fetch_all(self.pool())
        .await
        .map_err(conn_err)?;

        rows.iter().map(mapping::map_card_row).collect()
    }

    async fn get_card(&self, id: &CardId) -> Result<Option<Card>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, category, question, answer, choices, explanation, card_type, source
            FROM cards
            WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(conn_err)?;

        row.as_ref().map(mapping::map_card_row).transpose()
    }

    async fn insert_cards(&self, cards: &[Card]) -> Result<(), StorageError> {
        let mut tx = self.pool().begin().await.map_err(conn_err)?;

        for card in cards {
            sqlx::query(
                r"
                INSERT INTO cards (id, category, question, answer, choices, explanation, card_type, source)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(id) DO UPDATE SET
                    category = excluded.category,
                    question = excluded.question,
                    answer = excluded.answer,
                    choices = excluded.choices,
                    explanation = excluded.explanation,
                    card_type = excluded.card_type,
                    source = excluded.source
                ",
            )
            .bind(card.id.as_str())
            .bind(&card.category)
            .bind(&card.question)
            .bind(&card.answer)
            .bind(mapping::choices_to_json(&card.choices)?)
            .bind(&card.explanation)
            .bind(card.card_type.as_str())
            .bind(&card.source)
            .execute(&mut *tx)
            .await
            .map_err(conn_err)?;
        }

        tx.commit().await.map_err(conn_err)
    }
}
