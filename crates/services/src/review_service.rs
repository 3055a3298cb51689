use std::sync::Arc;

use sananki_core::model::{Card, CardId};
use storage::repository::{CardRepository, ProgressRepository};

use crate::error::ReviewServiceError;

/// Builds the pool of cards for a dedicated review pass.
#[derive(Clone)]
pub struct ReviewService {
    cards: Arc<dyn CardRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl ReviewService {
    #[must_use]
    pub fn new(cards: Arc<dyn CardRepository>, progress: Arc<dyn ProgressRepository>) -> Self {
        Self { cards, progress }
    }

    /// Every card whose latest answer was incorrect.
    ///
    /// Recomputed on each call: a card leaves this set as soon as it is
    /// answered correctly and re-enters on the next miss. Ids whose card
    /// has been removed from the catalog are skipped.
    ///
    /// # Errors
    ///
    /// Returns `ReviewServiceError::Storage` on backend failure.
    pub async fn review_cards(&self) -> Result<Vec<Card>, ReviewServiceError> {
        let ids = self.progress.incorrect_card_ids().await?;
        self.rehydrate(&ids).await
    }

    /// Rehydrates an explicit list of card ids for an in-session retry
    /// pass, preserving the given order and dropping unknown ids.
    ///
    /// # Errors
    ///
    /// Returns `ReviewServiceError::Storage` on backend failure.
    pub async fn cards_for_retry(&self, ids: &[CardId]) -> Result<Vec<Card>, ReviewServiceError> {
        self.rehydrate(ids).await
    }

    async fn rehydrate(&self, ids: &[CardId]) -> Result<Vec<Card>, ReviewServiceError> {
        let mut cards = Vec::with_capacity(ids.len());
        for id in ids {
            match self.cards.get_card(id).await? {
                Some(card) => cards.push(card),
                None => {
                    tracing::warn!(card_id = %id, "review card no longer in catalog");
                }
            }
        }
        Ok(cards)
    }
}
