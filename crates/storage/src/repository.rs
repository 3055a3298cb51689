use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use sananki_core::model::{Card, CardId, ProgressRecord, SessionKind, SessionState};

/// Errors surfaced by storage adapters.
///
/// "Not found" is not in here: legitimate absence (unseen card, no session
/// yet today) is expressed as `Ok(None)` so callers cannot confuse it with
/// a backend failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// Backend unreachable or a write was rejected.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A persisted row could not be decoded into its domain type.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Read access to the card catalog. The catalog is authored out of band
/// and never mutated by the study core; `insert_cards` exists for seeding.
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// Every card in the catalog, in stable store order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    async fn list_cards(&self) -> Result<Vec<Card>, StorageError>;

    /// Fetch a single card; `None` if no such id exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn get_card(&self, id: &CardId) -> Result<Option<Card>, StorageError>;

    /// Bulk-load catalog entries (seeding only).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if any card cannot be stored.
    async fn insert_cards(&self, cards: &[Card]) -> Result<(), StorageError>;
}

/// CRUD for per-card progress records, keyed uniquely by card id.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// The record for a card; `None` means the card has never been studied.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn get_progress(&self, card_id: &CardId) -> Result<Option<ProgressRecord>, StorageError>;

    /// Create-or-overwrite the record for its card id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write is rejected.
    async fn upsert_progress(&self, record: &ProgressRecord) -> Result<(), StorageError>;

    /// Ids of cards whose next review is unset or on/before `today`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn due_card_ids(&self, today: NaiveDate) -> Result<Vec<CardId>, StorageError>;

    /// Ids of every card that has a progress record at all.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn tracked_card_ids(&self) -> Result<Vec<CardId>, StorageError>;

    /// Ids of cards whose latest answer was incorrect.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn incorrect_card_ids(&self) -> Result<Vec<CardId>, StorageError>;
}

/// Persistence for the per-day session rows, keyed by `(date, kind)`.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// The session row for `(date, kind)`; `None` if no session was started.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn get_session(
        &self,
        date: NaiveDate,
        kind: SessionKind,
    ) -> Result<Option<SessionState>, StorageError>;

    /// Create-or-overwrite the row for the state's `(date, kind)` key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write is rejected.
    async fn upsert_session(&self, state: &SessionState) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY BACKEND ─────────────────────────────────────────────────────────
//

/// In-process store used when no database is configured, and as the test
/// double. It honors the exact same contracts as the SQLite backend, so
/// the services layer cannot tell the two apart.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    cards: Arc<Mutex<Vec<Card>>>,
    progress: Arc<Mutex<HashMap<CardId, ProgressRecord>>>,
    sessions: Arc<Mutex<HashMap<(NaiveDate, SessionKind), SessionState>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository pre-loaded with a card catalog.
    #[must_use]
    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self {
            cards: Arc::new(Mutex::new(cards)),
            progress: Arc::default(),
            sessions: Arc::default(),
        }
    }
}

fn lock_err<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Unavailable(e.to_string())
}

#[async_trait]
impl CardRepository for InMemoryRepository {
    async fn list_cards(&self) -> Result<Vec<Card>, StorageError> {
        let guard = self.cards.lock().map_err(lock_err)?;
        Ok(guard.clone())
    }

    async fn get_card(&self, id: &CardId) -> Result<Option<Card>, StorageError> {
        let guard = self.cards.lock().map_err(lock_err)?;
        Ok(guard.iter().find(|c| c.id() == id).cloned())
    }

    async fn insert_cards(&self, cards: &[Card]) -> Result<(), StorageError> {
        let mut guard = self.cards.lock().map_err(lock_err)?;
        for card in cards {
            match guard.iter_mut().find(|c| c.id() == card.id()) {
                Some(existing) => *existing = card.clone(),
                None => guard.push(card.clone()),
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_progress(&self, card_id: &CardId) -> Result<Option<ProgressRecord>, StorageError> {
        let guard = self.progress.lock().map_err(lock_err)?;
        Ok(guard.get(card_id).cloned())
    }

    async fn upsert_progress(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let mut guard = self.progress.lock().map_err(lock_err)?;
        guard.insert(record.card_id.clone(), record.clone());
        Ok(())
    }

    async fn due_card_ids(&self, today: NaiveDate) -> Result<Vec<CardId>, StorageError> {
        let guard = self.progress.lock().map_err(lock_err)?;
        let mut due: Vec<&ProgressRecord> =
            guard.values().filter(|r| r.is_due(today)).collect();
        // unscheduled first, then by next review date; matches the SQL order
        due.sort_by(|a, b| {
            a.next_review_at
                .cmp(&b.next_review_at)
                .then_with(|| a.card_id.cmp(&b.card_id))
        });
        Ok(due.into_iter().map(|r| r.card_id.clone()).collect())
    }

    async fn tracked_card_ids(&self) -> Result<Vec<CardId>, StorageError> {
        let guard = self.progress.lock().map_err(lock_err)?;
        let mut ids: Vec<CardId> = guard.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    async fn incorrect_card_ids(&self) -> Result<Vec<CardId>, StorageError> {
        let guard = self.progress.lock().map_err(lock_err)?;
        let mut ids: Vec<CardId> = guard
            .values()
            .filter(|r| r.last_result == Some(sananki_core::model::AnswerResult::Incorrect))
            .map(|r| r.card_id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn get_session(
        &self,
        date: NaiveDate,
        kind: SessionKind,
    ) -> Result<Option<SessionState>, StorageError> {
        let guard = self.sessions.lock().map_err(lock_err)?;
        Ok(guard.get(&(date, kind)).cloned())
    }

    async fn upsert_session(&self, state: &SessionState) -> Result<(), StorageError> {
        let mut guard = self.sessions.lock().map_err(lock_err)?;
        guard.insert((state.date, state.kind), state.clone());
        Ok(())
    }
}

//
// ─── STORAGE AGGREGATE ─────────────────────────────────────────────────────────
//

/// Aggregates the three repositories behind trait objects so backends can
/// be swapped once at startup.
#[derive(Clone)]
pub struct Storage {
    pub cards: Arc<dyn CardRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub sessions: Arc<dyn SessionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::in_memory_with_cards(Vec::new())
    }

    /// An in-memory storage pre-loaded with a catalog.
    #[must_use]
    pub fn in_memory_with_cards(cards: Vec<Card>) -> Self {
        let repo = InMemoryRepository::with_cards(cards);
        let cards: Arc<dyn CardRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let sessions: Arc<dyn SessionRepository> = Arc::new(repo);
        Self {
            cards,
            progress,
            sessions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sananki_core::model::CardType;
    use sananki_core::time::fixed_now;

    fn build_card(id: &str) -> Card {
        Card {
            id: CardId::new(id),
            category: "silviculture".into(),
            question: format!("Q {id}"),
            answer: "1".into(),
            choices: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            explanation: None,
            card_type: CardType::MultipleChoice,
            source: None,
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[tokio::test]
    async fn catalog_lookup_distinguishes_missing_from_present() {
        let repo = InMemoryRepository::with_cards(vec![build_card("c1")]);
        assert!(repo.get_card(&CardId::new("c1")).await.unwrap().is_some());
        assert!(repo.get_card(&CardId::new("nope")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn progress_upsert_overwrites_by_card_id() {
        let repo = InMemoryRepository::new();
        let mut record = ProgressRecord::new(CardId::new("c1"));
        record.apply_answer(true, date(1), fixed_now());
        repo.upsert_progress(&record).await.unwrap();

        record.apply_answer(false, date(1), fixed_now());
        repo.upsert_progress(&record).await.unwrap();

        let stored = repo
            .get_progress(&CardId::new("c1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.correct_streak, 0);

        // one row per card regardless of how many writes happened
        assert_eq!(repo.tracked_card_ids().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn due_query_includes_unscheduled_and_past_dates() {
        let repo = InMemoryRepository::new();

        let unscheduled = ProgressRecord::new(CardId::new("a"));
        repo.upsert_progress(&unscheduled).await.unwrap();

        let mut past = ProgressRecord::new(CardId::new("b"));
        past.next_review_at = Some(date(1));
        repo.upsert_progress(&past).await.unwrap();

        let mut future = ProgressRecord::new(CardId::new("c"));
        future.next_review_at = Some(date(9));
        repo.upsert_progress(&future).await.unwrap();

        let due = repo.due_card_ids(date(2)).await.unwrap();
        assert_eq!(due, vec![CardId::new("a"), CardId::new("b")]);
    }

    #[tokio::test]
    async fn incorrect_ids_follow_last_result() {
        let repo = InMemoryRepository::new();
        let mut record = ProgressRecord::new(CardId::new("c1"));
        record.apply_answer(false, date(1), fixed_now());
        repo.upsert_progress(&record).await.unwrap();
        assert_eq!(
            repo.incorrect_card_ids().await.unwrap(),
            vec![CardId::new("c1")]
        );

        record.apply_answer(true, date(1), fixed_now());
        repo.upsert_progress(&record).await.unwrap();
        assert!(repo.incorrect_card_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sessions_are_keyed_by_date_and_kind() {
        let repo = InMemoryRepository::new();
        let daily = SessionState::new(date(1), SessionKind::Daily, vec![CardId::new("x")]);
        let extra = SessionState::new(date(1), SessionKind::Additional, vec![CardId::new("y")]);
        repo.upsert_session(&daily).await.unwrap();
        repo.upsert_session(&extra).await.unwrap();

        let loaded = repo
            .get_session(date(1), SessionKind::Daily)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.card_ids, vec![CardId::new("x")]);

        assert!(
            repo.get_session(date(2), SessionKind::Daily)
                .await
                .unwrap()
                .is_none()
        );
    }
}
