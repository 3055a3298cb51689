use std::sync::Arc;

use sananki_core::Clock;
use sananki_core::model::{CardId, ProgressRecord};
use storage::repository::ProgressRepository;

use crate::error::ProgressServiceError;

/// Applies answers to per-card progress records.
///
/// Each update is a single read-modify-write against one row keyed by card
/// id; the streak math itself lives on `ProgressRecord` so every backend
/// behaves identically.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    progress: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, progress: Arc<dyn ProgressRepository>) -> Self {
        Self { clock, progress }
    }

    /// The stored record for a card; `None` means never studied.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` on backend failure.
    pub async fn get_progress(
        &self,
        card_id: &CardId,
    ) -> Result<Option<ProgressRecord>, ProgressServiceError> {
        Ok(self.progress.get_progress(card_id).await?)
    }

    /// Records one answer and persists the updated record.
    ///
    /// A missing record is treated as streak 0 with no prior result. The
    /// "today" used for scheduling comes from the study-date rule, so an
    /// answer given at 01:30 local still anchors to the previous day.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty card id (checked before any
    /// storage access) and `Storage` if the backend fails.
    pub async fn update_progress(
        &self,
        card_id: &CardId,
        is_correct: bool,
    ) -> Result<ProgressRecord, ProgressServiceError> {
        if card_id.is_empty() {
            return Err(ProgressServiceError::InvalidInput(
                "card id must not be empty".into(),
            ));
        }

        let mut record = self
            .progress
            .get_progress(card_id)
            .await?
            .unwrap_or_else(|| ProgressRecord::new(card_id.clone()));

        let now = self.clock.now();
        record.apply_answer(is_correct, self.clock.study_date(), now);
        self.progress.upsert_progress(&record).await?;

        tracing::debug!(
            card_id = %record.card_id,
            streak = record.correct_streak,
            "progress updated"
        );
        Ok(record)
    }
}
