//! Top-level facade wiring the services to a storage backend.

use std::sync::Arc;

use sananki_core::Clock;
use sananki_core::model::{Card, CardId, ProgressRecord, SessionKind};
use storage::repository::Storage;

use crate::error::{AppServicesError, ReviewServiceError, SessionError};
use crate::progress_service::ProgressService;
use crate::review_service::ReviewService;
use crate::sessions::{SessionData, SessionManager, SessionStats};

/// One bundle of every service the application talks to.
///
/// The backend is picked once at construction; callers never see which
/// one is behind the trait objects.
#[derive(Clone)]
pub struct AppServices {
    pub sessions: SessionManager,
    pub progress: ProgressService,
    pub review: ReviewService,
}

impl AppServices {
    #[must_use]
    pub fn new(storage: &Storage, clock: Clock) -> Self {
        Self {
            sessions: SessionManager::new(
                clock,
                Arc::clone(&storage.cards),
                Arc::clone(&storage.progress),
                Arc::clone(&storage.sessions),
            ),
            progress: ProgressService::new(clock, Arc::clone(&storage.progress)),
            review: ReviewService::new(Arc::clone(&storage.cards), Arc::clone(&storage.progress)),
        }
    }

    /// Services over a fresh in-memory backend pre-loaded with a catalog.
    #[must_use]
    pub fn in_memory_with_cards(cards: Vec<Card>, clock: Clock) -> Self {
        Self::new(&Storage::in_memory_with_cards(cards), clock)
    }

    /// Services over a SQLite backend, connecting and migrating eagerly.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Sqlite` when the database cannot be
    /// opened or migrated.
    pub async fn new_sqlite(database_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(database_url).await?;
        Ok(Self::new(&storage, clock))
    }

    /// Picks the backend from the environment: SQLite when `DATABASE_URL`
    /// is set, an empty in-memory store otherwise.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Sqlite` when `DATABASE_URL` is set but
    /// the database cannot be opened or migrated.
    pub async fn from_env(clock: Clock) -> Result<Self, AppServicesError> {
        match std::env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => {
                tracing::info!(%url, "using sqlite storage");
                Self::new_sqlite(&url, clock).await
            }
            _ => {
                tracing::warn!("DATABASE_URL not set, using in-memory storage");
                Ok(Self::new(&Storage::in_memory(), clock))
            }
        }
    }

    /// Today's session of the requested kind, created on first call and
    /// resumed on every later one within the same study date.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError::Storage` from the backend.
    pub async fn fetch_today_session(&self, additional: bool) -> Result<SessionData, SessionError> {
        let kind = SessionKind::from_additional_flag(additional);
        self.sessions.get_or_create_session(kind).await
    }

    /// Records one answer: progress update plus session counter advance.
    ///
    /// # Errors
    ///
    /// See [`SessionManager::advance`].
    pub async fn submit_answer(
        &self,
        card_id: &CardId,
        is_correct: bool,
        index: u32,
        additional: bool,
    ) -> Result<ProgressRecord, SessionError> {
        let kind = SessionKind::from_additional_flag(additional);
        self.sessions.advance(card_id, is_correct, index, kind).await
    }

    /// Cards whose most recent answer was incorrect, for review study.
    ///
    /// # Errors
    ///
    /// Propagates `ReviewServiceError::Storage` from the backend.
    pub async fn fetch_review_cards(&self) -> Result<Vec<Card>, ReviewServiceError> {
        self.review.review_cards().await
    }

    /// Counters for today's daily session.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError::Storage` from the backend.
    pub async fn fetch_today_stats(&self) -> Result<SessionStats, SessionError> {
        self.sessions.today_stats(SessionKind::Daily).await
    }
}
