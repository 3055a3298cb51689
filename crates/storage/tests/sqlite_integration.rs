use chrono::NaiveDate;
use sananki_core::model::{Card, CardId, CardType, ProgressRecord, SessionKind, SessionState};
use sananki_core::time::fixed_now;
use storage::repository::{CardRepository, ProgressRepository, SessionRepository};
use storage::sqlite::SqliteRepository;

fn build_card(id: &str) -> Card {
    Card {
        id: CardId::new(id),
        category: "silviculture".into(),
        question: format!("Q {id}"),
        answer: "2".into(),
        choices: vec!["1".into(), "2".into(), "3".into(), "4".into()],
        explanation: Some("because".into()),
        card_type: CardType::MultipleChoice,
        source: Some("2019 exam".into()),
    }
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_round_trips_cards_with_choices() {
    let repo = connect("memdb_cards").await;

    let card = build_card("c1");
    repo.insert_cards(std::slice::from_ref(&card))
        .await
        .unwrap();

    let fetched = repo.get_card(&CardId::new("c1")).await.unwrap().unwrap();
    assert_eq!(fetched, card);

    assert!(repo.get_card(&CardId::new("missing")).await.unwrap().is_none());
    assert_eq!(repo.list_cards().await.unwrap().len(), 1);
}

#[tokio::test]
async fn sqlite_progress_upsert_and_queries() {
    let repo = connect("memdb_progress").await;
    repo.insert_cards(&[build_card("a"), build_card("b"), build_card("c")])
        .await
        .unwrap();

    // "a" answered incorrectly, due tomorrow
    let mut a = ProgressRecord::new(CardId::new("a"));
    a.apply_answer(false, date(1), fixed_now());
    repo.upsert_progress(&a).await.unwrap();

    // "b" answered correctly twice, due in 3 days
    let mut b = ProgressRecord::new(CardId::new("b"));
    b.apply_answer(true, date(1), fixed_now());
    b.apply_answer(true, date(1), fixed_now());
    repo.upsert_progress(&b).await.unwrap();

    let stored = repo.get_progress(&CardId::new("b")).await.unwrap().unwrap();
    assert_eq!(stored.correct_streak, 2);
    assert_eq!(stored.next_review_at, Some(date(4)));

    // on day 2 only "a" is due; "c" has no record at all
    assert_eq!(repo.due_card_ids(date(2)).await.unwrap(), vec![CardId::new("a")]);
    assert_eq!(
        repo.tracked_card_ids().await.unwrap(),
        vec![CardId::new("a"), CardId::new("b")]
    );
    assert_eq!(
        repo.incorrect_card_ids().await.unwrap(),
        vec![CardId::new("a")]
    );

    // on day 4 both are due
    assert_eq!(repo.due_card_ids(date(4)).await.unwrap().len(), 2);
}

#[tokio::test]
async fn sqlite_session_rows_keyed_by_date_and_kind() {
    let repo = connect("memdb_sessions").await;
    repo.insert_cards(&[build_card("x"), build_card("y")])
        .await
        .unwrap();

    let mut daily = SessionState::new(
        date(1),
        SessionKind::Daily,
        vec![CardId::new("x"), CardId::new("y")],
    );
    repo.upsert_session(&daily).await.unwrap();

    let extra = SessionState::new(date(1), SessionKind::Additional, vec![CardId::new("y")]);
    repo.upsert_session(&extra).await.unwrap();

    // counters persist through the upsert
    daily.record_answered(0);
    repo.upsert_session(&daily).await.unwrap();

    let loaded = repo
        .get_session(date(1), SessionKind::Daily)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.completed_cards, 1);
    assert_eq!(loaded.card_ids, vec![CardId::new("x"), CardId::new("y")]);

    let loaded_extra = repo
        .get_session(date(1), SessionKind::Additional)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded_extra.card_ids, vec![CardId::new("y")]);

    assert!(
        repo.get_session(date(2), SessionKind::Daily)
            .await
            .unwrap()
            .is_none()
    );
}
