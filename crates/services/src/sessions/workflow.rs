use std::sync::Arc;

use sananki_core::Clock;
use sananki_core::model::{CardId, ProgressRecord, SessionKind, SessionState};
use storage::repository::{CardRepository, ProgressRepository, SessionRepository};

use super::progress::{SessionData, SessionStats};
use super::queries::SessionQueries;
use crate::error::SessionError;
use crate::progress_service::ProgressService;

/// Owns the lifecycle of today's sessions.
///
/// One persisted row per `(study date, kind)`: created on the first
/// request of the day, resumed on every further request, and naturally
/// superseded when the study date rolls over — the old row is simply
/// never addressed again.
#[derive(Clone)]
pub struct SessionManager {
    clock: Clock,
    cards: Arc<dyn CardRepository>,
    progress: Arc<dyn ProgressRepository>,
    sessions: Arc<dyn SessionRepository>,
}

impl SessionManager {
    #[must_use]
    pub fn new(
        clock: Clock,
        cards: Arc<dyn CardRepository>,
        progress: Arc<dyn ProgressRepository>,
        sessions: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            clock,
            cards,
            progress,
            sessions,
        }
    }

    /// Loads today's session for the kind, creating it if this is the
    /// first request of the day.
    ///
    /// On resume, cards deleted from the catalog since creation are
    /// silently dropped from the rehydrated list; the persisted cursor and
    /// counters are returned as stored.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` when the backend fails.
    pub async fn get_or_create_session(
        &self,
        kind: SessionKind,
    ) -> Result<SessionData, SessionError> {
        let today = self.clock.study_date();

        if let Some(state) = self.sessions.get_session(today, kind).await? {
            if !state.card_ids.is_empty() {
                return self.rehydrate(&state).await;
            }
        }

        let plan = SessionQueries::plan_from_storage(
            self.cards.as_ref(),
            self.progress.as_ref(),
            today,
            kind.capacity(),
        )
        .await?;

        let card_ids: Vec<CardId> = plan.cards.iter().map(|c| c.id.clone()).collect();
        let state = SessionState::new(today, kind, card_ids);
        self.sessions.upsert_session(&state).await?;

        tracing::debug!(
            date = %today,
            kind = ?kind,
            due = plan.due_selected,
            new = plan.new_selected,
            filler = plan.filler_selected,
            "created session"
        );

        Ok(SessionData {
            cards: plan.cards,
            current_index: state.current_index,
            total_cards: state.total_cards,
            completed_cards: state.completed_cards,
        })
    }

    /// Records an answer: updates the card's progress record, then raises
    /// the session's completed-cards high-water mark to `index + 1`.
    ///
    /// The two writes are independent; if the second fails after the first
    /// committed, the next `get_or_create_session` still returns a
    /// consistent (merely conservative) counter.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidInput` for an empty card id, before any
    ///   storage access.
    /// - `SessionError::UnknownCard` when the id is not in the catalog.
    /// - `SessionError::Storage` / `SessionError::Progress` for backend
    ///   failures.
    pub async fn advance(
        &self,
        card_id: &CardId,
        is_correct: bool,
        index: u32,
        kind: SessionKind,
    ) -> Result<ProgressRecord, SessionError> {
        if card_id.is_empty() {
            return Err(SessionError::InvalidInput("card id must not be empty".into()));
        }

        if self.cards.get_card(card_id).await?.is_none() {
            return Err(SessionError::UnknownCard(card_id.clone()));
        }

        let progress_service = ProgressService::new(self.clock, Arc::clone(&self.progress));
        let record = progress_service.update_progress(card_id, is_correct).await?;

        let today = self.clock.study_date();
        match self.sessions.get_session(today, kind).await? {
            Some(mut state) => {
                state.record_answered(index);
                self.sessions.upsert_session(&state).await?;
            }
            None => {
                // progress is already committed; a missing session row is
                // a tolerated inconsistency, not a failure
                tracing::debug!(date = %today, kind = ?kind, "no session row to advance");
            }
        }

        Ok(record)
    }

    /// Today's counters for the kind.
    ///
    /// When no session exists yet, the totals reflect what a new session
    /// would select, without persisting anything.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` when the backend fails.
    pub async fn today_stats(&self, kind: SessionKind) -> Result<SessionStats, SessionError> {
        let today = self.clock.study_date();

        if let Some(state) = self.sessions.get_session(today, kind).await? {
            return Ok(SessionStats {
                total_cards: state.total_cards,
                completed_cards: state.completed_cards,
                remaining_cards: state.remaining_cards(),
            });
        }

        let plan = SessionQueries::plan_from_storage(
            self.cards.as_ref(),
            self.progress.as_ref(),
            today,
            kind.capacity(),
        )
        .await?;
        let total = u32::try_from(plan.total()).unwrap_or(u32::MAX);
        Ok(SessionStats {
            total_cards: total,
            completed_cards: 0,
            remaining_cards: total,
        })
    }

    async fn rehydrate(&self, state: &SessionState) -> Result<SessionData, SessionError> {
        let mut cards = Vec::with_capacity(state.card_ids.len());
        for id in &state.card_ids {
            match self.cards.get_card(id).await? {
                Some(card) => cards.push(card),
                None => {
                    tracing::warn!(card_id = %id, "session card no longer in catalog");
                }
            }
        }
        Ok(SessionData {
            cards,
            current_index: state.current_index,
            total_cards: state.total_cards,
            completed_cards: state.completed_cards,
        })
    }
}
