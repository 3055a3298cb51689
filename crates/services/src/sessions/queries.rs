use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use sananki_core::model::{Card, CardId};
use storage::repository::{CardRepository, ProgressRepository};

use super::plan::{SessionBuilder, SessionPlan};
use crate::error::SessionError;

/// Storage-backed candidate assembly for the daily planner.
pub(crate) struct SessionQueries;

impl SessionQueries {
    /// Builds the day's plan from repository data.
    ///
    /// Splits the catalog into the three pools the builder expects: due
    /// (progress record unscheduled or due today), new (no record at all),
    /// and the remainder used only as random filler.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` when repository access fails.
    pub async fn plan_from_storage(
        cards: &dyn CardRepository,
        progress: &dyn ProgressRepository,
        today: NaiveDate,
        limit: usize,
    ) -> Result<SessionPlan, SessionError> {
        let due_ids = progress.due_card_ids(today).await?;
        let tracked: HashSet<CardId> = progress.tracked_card_ids().await?.into_iter().collect();

        let catalog = cards.list_cards().await?;
        let mut by_id: HashMap<CardId, Card> = catalog
            .iter()
            .map(|card| (card.id.clone(), card.clone()))
            .collect();

        // due pool keeps the store's deterministic order; progress rows
        // whose card has left the catalog drop out here
        let due: Vec<Card> = due_ids.iter().filter_map(|id| by_id.remove(id)).collect();

        let mut new_cards = Vec::new();
        let mut rest = Vec::new();
        for card in catalog {
            if !by_id.contains_key(&card.id) {
                continue; // already claimed by the due pool
            }
            if tracked.contains(&card.id) {
                rest.push(card);
            } else {
                new_cards.push(card);
            }
        }

        let plan = SessionBuilder::new(limit).build(due, new_cards, rest, &mut rand::rng());
        Ok(plan)
    }
}
