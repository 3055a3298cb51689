use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use sananki_core::model::{Card, CardId};

/// Selection result for a session build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub cards: Vec<Card>,
    pub due_selected: usize,
    pub new_selected: usize,
    pub filler_selected: usize,
}

impl SessionPlan {
    /// Total number of cards in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.cards.len()
    }

    /// Returns true when no cards were selected for this session.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Builds a session batch from the three candidate pools.
///
/// Priority is strict: due cards first, then never-studied cards, then a
/// random fill from the rest of the catalog when the batch is still short.
/// The combined list is truncated to the limit and shuffled once so study
/// order does not reveal the grouping.
pub struct SessionBuilder {
    limit: usize,
}

impl SessionBuilder {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Build a plan from storage-provided candidate pools.
    ///
    /// - `due_cards` are due or unscheduled, in store order.
    /// - `new_cards` have no progress record yet.
    /// - `rest` is the remainder of the catalog, drawn from uniformly
    ///   without replacement only if the first two pools run short.
    ///
    /// No card appears twice even if the pools overlap.
    pub fn build<R: Rng + ?Sized>(
        &self,
        due_cards: impl IntoIterator<Item = Card>,
        new_cards: impl IntoIterator<Item = Card>,
        rest: impl IntoIterator<Item = Card>,
        rng: &mut R,
    ) -> SessionPlan {
        let mut selected: Vec<Card> = Vec::new();
        let mut selected_ids: HashSet<CardId> = HashSet::new();

        let mut take = |pool: &mut dyn Iterator<Item = Card>,
                        selected: &mut Vec<Card>,
                        selected_ids: &mut HashSet<CardId>,
                        limit: usize| {
            let mut count = 0;
            for card in pool {
                if selected.len() >= limit {
                    break;
                }
                if selected_ids.insert(card.id.clone()) {
                    selected.push(card);
                    count += 1;
                }
            }
            count
        };

        let due_selected = take(
            &mut due_cards.into_iter(),
            &mut selected,
            &mut selected_ids,
            self.limit,
        );
        let new_selected = take(
            &mut new_cards.into_iter(),
            &mut selected,
            &mut selected_ids,
            self.limit,
        );

        let mut filler_selected = 0;
        if selected.len() < self.limit {
            let mut filler: Vec<Card> = rest
                .into_iter()
                .filter(|c| !selected_ids.contains(&c.id))
                .collect();
            filler.as_mut_slice().shuffle(rng);
            filler_selected = take(
                &mut filler.into_iter(),
                &mut selected,
                &mut selected_ids,
                self.limit,
            );
        }

        selected.truncate(self.limit);
        // one shuffle per new session; a resumed session keeps its order
        selected.as_mut_slice().shuffle(rng);

        SessionPlan {
            cards: selected,
            due_selected,
            new_selected,
            filler_selected,
        }
    }
}
