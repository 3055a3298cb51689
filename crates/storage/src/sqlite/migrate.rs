use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Runs a single, consolidated migration for the current schema.
///
/// Creates the card catalog, per-card progress, and per-day session tables
/// plus the indexes the due/incorrect queries rely on.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: full schema.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS cards (
                    id TEXT PRIMARY KEY,
                    category TEXT NOT NULL,
                    question TEXT NOT NULL,
                    answer TEXT NOT NULL,
                    choices TEXT NOT NULL,
                    explanation TEXT,
                    card_type TEXT NOT NULL,
                    source TEXT
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS card_progress (
                    card_id TEXT PRIMARY KEY,
                    correct_streak INTEGER NOT NULL CHECK (correct_streak >= 0),
                    last_result TEXT,
                    last_studied_at TEXT,
                    next_review_at TEXT,
                    FOREIGN KEY (card_id) REFERENCES cards(id) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS daily_sessions (
                    id INTEGER PRIMARY KEY,
                    date TEXT NOT NULL,
                    is_additional_study INTEGER NOT NULL CHECK (is_additional_study IN (0, 1)),
                    card_ids TEXT NOT NULL,
                    current_index INTEGER NOT NULL CHECK (current_index >= 0),
                    total_cards INTEGER NOT NULL CHECK (total_cards >= 0),
                    completed_cards INTEGER NOT NULL CHECK (completed_cards >= 0),
                    UNIQUE (date, is_additional_study)
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_progress_next_review
             ON card_progress(next_review_at);",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_progress_last_result
             ON card_progress(last_result);",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (1, ?1)")
            .bind(Utc::now().to_rfc3339())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
    }

    Ok(())
}
