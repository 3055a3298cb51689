use chrono::{Duration, TimeZone, Utc};
use sananki_core::model::{Card, CardId, CardType};
use services::{AppServices, Clock};

fn build_card(id: &str) -> Card {
    Card {
        id: CardId::new(id),
        category: "silviculture".into(),
        question: format!("Q {id}"),
        answer: "1".into(),
        choices: vec!["1".into(), "2".into(), "3".into(), "4".into()],
        explanation: None,
        card_type: CardType::MultipleChoice,
        source: None,
    }
}

fn catalog(n: usize) -> Vec<Card> {
    (0..n).map(|i| build_card(&format!("card-{i:03}"))).collect()
}

// 12:00 UTC = 21:00 UTC+9, well inside the study window
fn evening_clock() -> Clock {
    Clock::fixed(Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap())
}

#[tokio::test]
async fn full_day_of_study_end_to_end() {
    let app = AppServices::in_memory_with_cards(catalog(35), evening_clock());

    // first request of the day caps the session at 30 cards
    let session = app.fetch_today_session(false).await.unwrap();
    assert_eq!(session.cards.len(), 30);
    assert_eq!(session.completed_cards, 0);

    // answer the first three, second one incorrectly
    for (index, correct) in [(0_u32, true), (1, false), (2, true)] {
        let card = &session.cards[index as usize];
        let record = app
            .submit_answer(&card.id, correct, index, false)
            .await
            .unwrap();
        assert_eq!(record.correct_streak, u32::from(correct));
    }

    let stats = app.fetch_today_stats().await.unwrap();
    assert_eq!(stats.total_cards, 30);
    assert_eq!(stats.completed_cards, 3);
    assert_eq!(stats.remaining_cards, 27);

    // a later fetch resumes the same session, same order, same cursor
    let resumed = app.fetch_today_session(false).await.unwrap();
    let before: Vec<_> = session.cards.iter().map(|c| c.id.clone()).collect();
    let after: Vec<_> = resumed.cards.iter().map(|c| c.id.clone()).collect();
    assert_eq!(before, after);
    assert_eq!(resumed.completed_cards, 3);
    assert_eq!(resumed.current_index, 3);

    // the incorrectly answered card is now in the review pool
    let review = app.fetch_review_cards().await.unwrap();
    let review_ids: Vec<_> = review.iter().map(|c| c.id.clone()).collect();
    assert_eq!(review_ids, vec![session.cards[1].id.clone()]);
}

#[tokio::test]
async fn additional_session_is_independent_of_the_daily_one() {
    let app = AppServices::in_memory_with_cards(catalog(50), evening_clock());

    let daily = app.fetch_today_session(false).await.unwrap();
    let extra = app.fetch_today_session(true).await.unwrap();
    assert_eq!(daily.cards.len(), 30);
    assert_eq!(extra.cards.len(), 10);

    app.submit_answer(&extra.cards[0].id, true, 0, true)
        .await
        .unwrap();

    // the daily counters never move from an additional-session answer
    let stats = app.fetch_today_stats().await.unwrap();
    assert_eq!(stats.completed_cards, 0);

    let extra_resumed = app.fetch_today_session(true).await.unwrap();
    assert_eq!(extra_resumed.completed_cards, 1);
}

#[tokio::test]
async fn session_survives_past_midnight_until_two_am_local() {
    let mut clock = evening_clock();
    let storage = storage::repository::Storage::in_memory_with_cards(catalog(6));

    let app = AppServices::new(&storage, clock);
    let first = app.fetch_today_session(false).await.unwrap();
    app.submit_answer(&first.cards[0].id, true, 0, false)
        .await
        .unwrap();

    // 16:30 UTC = 01:30 local the next calendar day, still the same study date
    clock.advance(Duration::minutes(270));
    let late_night = AppServices::new(&storage, clock);
    let resumed = late_night.fetch_today_session(false).await.unwrap();
    assert_eq!(resumed.completed_cards, 1);

    // past 02:00 local, a new study date begins with a fresh session
    clock.advance(Duration::hours(1));
    let next_day = AppServices::new(&storage, clock);
    let fresh = next_day.fetch_today_session(false).await.unwrap();
    assert_eq!(fresh.completed_cards, 0);
}

#[tokio::test]
async fn correct_answers_push_cards_out_of_tomorrows_session() {
    let mut clock = evening_clock();
    let storage = storage::repository::Storage::in_memory_with_cards(catalog(4));

    let app = AppServices::new(&storage, clock);
    let session = app.fetch_today_session(false).await.unwrap();
    assert_eq!(session.cards.len(), 4);

    // answer every card correctly twice in a row across two days: the
    // streak-2 interval is 3 days, so day three's session has no due cards
    for (index, card) in session.cards.iter().enumerate() {
        app.submit_answer(&card.id, true, index as u32, false)
            .await
            .unwrap();
    }

    clock.advance(Duration::hours(24));
    let day2 = AppServices::new(&storage, clock);
    let session2 = day2.fetch_today_session(false).await.unwrap();
    assert_eq!(session2.cards.len(), 4, "streak-1 cards are due next day");
    for (index, card) in session2.cards.iter().enumerate() {
        day2.submit_answer(&card.id, true, index as u32, false)
            .await
            .unwrap();
    }

    clock.advance(Duration::hours(24));
    let day3 = AppServices::new(&storage, clock);
    let session3 = day3.fetch_today_session(false).await.unwrap();
    // nothing due and nothing new; the tracked catalog fills in as filler
    assert_eq!(session3.cards.len(), 4);
    let stats = day3.fetch_today_stats().await.unwrap();
    assert_eq!(stats.completed_cards, 0);
}

#[tokio::test]
async fn incorrect_card_returns_the_next_day() {
    let mut clock = evening_clock();
    let storage = storage::repository::Storage::in_memory_with_cards(catalog(1));

    let app = AppServices::new(&storage, clock);
    let session = app.fetch_today_session(false).await.unwrap();
    let card_id = session.cards[0].id.clone();

    let record = app.submit_answer(&card_id, false, 0, false).await.unwrap();
    assert_eq!(record.correct_streak, 0);

    clock.advance(Duration::hours(24));
    let tomorrow = AppServices::new(&storage, clock);
    let session2 = tomorrow.fetch_today_session(false).await.unwrap();
    assert_eq!(session2.cards[0].id, card_id);

    // still in the review pool until answered correctly
    let review = tomorrow.fetch_review_cards().await.unwrap();
    assert_eq!(review.len(), 1);
    tomorrow
        .submit_answer(&card_id, true, 0, false)
        .await
        .unwrap();
    assert!(tomorrow.fetch_review_cards().await.unwrap().is_empty());
}
