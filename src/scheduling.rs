//! Review scheduling and next-due card selection
//!
//! Everything here is pure: callers load cards and reviews from the
//! repository and pass in the current time.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use crate::models::{Card, Review};

/// Lowest quality score that earns the long interval
pub const EASY_QUALITY_THRESHOLD: i32 = 4;

/// Hours until a card reviewed below `EASY_QUALITY_THRESHOLD` is due again
pub const SHORT_INTERVAL_HOURS: i64 = 24;

/// Hours until a card reviewed at or above `EASY_QUALITY_THRESHOLD` is due again
pub const LONG_INTERVAL_HOURS: i64 = 72;

/// Returns the interval that follows a review of the given quality
pub fn review_interval(quality: i32) -> Duration {
    if quality >= EASY_QUALITY_THRESHOLD {
        Duration::hours(LONG_INTERVAL_HOURS)
    } else {
        Duration::hours(SHORT_INTERVAL_HOURS)
    }
}

/// Computes when a card becomes due again after a review
///
/// ### Arguments
///
/// * `quality` - The quality score of the review (1-5)
/// * `reviewed_at` - When the review happened
///
/// ### Returns
///
/// `reviewed_at` plus 72 hours for quality 4 and 5, plus 24 hours otherwise
pub fn next_review_at(quality: i32, reviewed_at: DateTime<Utc>) -> DateTime<Utc> {
    reviewed_at + review_interval(quality)
}

/// When a card is due for study
///
/// `Immediately` orders before every `At`, which is what puts never-reviewed
/// cards ahead of reviewed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DueTime {
    /// The card has never been reviewed
    Immediately,
    /// The card is due at this instant
    At(DateTime<Utc>),
}

impl DueTime {
    /// Whether a card with this due time can be studied at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self {
            DueTime::Immediately => true,
            DueTime::At(due) => *due <= now,
        }
    }
}

/// Derives a card's due time from its most recent review
pub fn effective_due_time(latest_review: Option<&Review>) -> DueTime {
    match latest_review {
        Some(review) => DueTime::At(review.get_next_review_at()),
        None => DueTime::Immediately,
    }
}

/// Picks the most recent review: latest `reviewed_at`, then highest id
pub fn most_recent_review<'a, I>(reviews: I) -> Option<&'a Review>
where
    I: IntoIterator<Item = &'a Review>,
{
    reviews
        .into_iter()
        .max_by_key(|review| (review.get_reviewed_at(), review.get_id()))
}

/// Reduces a batch of reviews to the most recent review of each card
///
/// ### Returns
///
/// A map from card id to that card's most recent review
pub fn latest_reviews_by_card(reviews: Vec<Review>) -> HashMap<i32, Review> {
    let mut latest: HashMap<i32, Review> = HashMap::new();

    for review in reviews {
        let keep_current = latest.get(&review.get_card_id()).is_some_and(|current| {
            most_recent_review([current, &review]).is_some_and(|winner| std::ptr::eq(winner, current))
        });
        if !keep_current {
            latest.insert(review.get_card_id(), review);
        }
    }

    latest
}

/// Selects the card to study next
///
/// A card is eligible when its effective due time is at or before `now`.
/// Among eligible cards the earliest due time wins, never-reviewed cards
/// first; equal due times fall back to the lowest card id.
///
/// ### Arguments
///
/// * `cards` - The cards of one deck
/// * `latest_reviews` - Each card's most recent review, keyed by card id
/// * `now` - The current time
///
/// ### Returns
///
/// The selected card, or None if no card is due (including an empty deck)
pub fn select_next_due<'a>(
    cards: &'a [Card],
    latest_reviews: &HashMap<i32, Review>,
    now: DateTime<Utc>,
) -> Option<&'a Card> {
    cards
        .iter()
        .map(|card| (effective_due_time(latest_reviews.get(&card.get_id())), card))
        .filter(|(due, _)| due.is_due(now))
        .min_by_key(|(due, card)| (*due, card.get_id()))
        .map(|(_, card)| card)
}
