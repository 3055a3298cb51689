//! Fixed-interval spaced repetition schedule.
//!
//! The review interval depends only on the current correct streak; there is
//! no per-card ease factor. Streaks past five all land on the same long
//! interval.

use chrono::{Days, NaiveDate};

/// Days until the next review for a given correct streak.
///
/// Lookup table: streak 1 → 1 day, 2 → 3, 3 → 7, 4 → 14, 5 → 30, and
/// anything from 6 up → 60. Streak 0 (never answered correctly) also maps
/// to 1 day so the function is total over all non-negative inputs.
#[must_use]
pub fn next_review_interval(streak: u32) -> u64 {
    match streak {
        0 | 1 => 1,
        2 => 3,
        3 => 7,
        4 => 14,
        5 => 30,
        _ => 60,
    }
}

/// The review date scheduled by a correct answer at `streak`, anchored at
/// the resolved study date.
#[must_use]
pub fn next_review_date(today: NaiveDate, streak: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(next_review_interval(streak)))
        .unwrap_or(NaiveDate::MAX)
}

/// The date scheduled by an incorrect answer: always tomorrow.
#[must_use]
pub fn retry_date(today: NaiveDate) -> NaiveDate {
    today.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX)
}
