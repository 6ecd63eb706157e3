use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::scheduling;
use crate::schema::reviews;

/// An immutable record of one study attempt on a card
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Review {
    /// Identifier assigned by the database
    id: i32,

    /// The ID of the card this review belongs to
    card_id: i32,

    /// The quality score given during this review (1-5)
    quality: i32,

    /// When this review occurred
    #[serde(with = "super::timestamp")]
    reviewed_at: NaiveDateTime,

    /// When the card becomes due again
    #[serde(with = "super::timestamp")]
    next_review_at: NaiveDateTime,

    /// When this review was stored
    #[serde(with = "super::timestamp")]
    created_at: NaiveDateTime,

    /// When this review row was last written
    #[serde(with = "super::timestamp")]
    updated_at: NaiveDateTime,
}

impl Review {
    /// Creates a review with all fields specified
    ///
    /// ### Arguments
    ///
    /// * `id` - The identifier of the review
    /// * `card_id` - The ID of the card this review belongs to
    /// * `quality` - The quality score given during the review
    /// * `reviewed_at` - When the review occurred
    /// * `next_review_at` - When the card becomes due again
    ///
    /// ### Returns
    ///
    /// A new `Review` instance whose created/updated timestamps equal `reviewed_at`
    pub fn new_with_fields(
        id: i32,
        card_id: i32,
        quality: i32,
        reviewed_at: DateTime<Utc>,
        next_review_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            card_id,
            quality,
            reviewed_at: reviewed_at.naive_utc(),
            next_review_at: next_review_at.naive_utc(),
            created_at: reviewed_at.naive_utc(),
            updated_at: reviewed_at.naive_utc(),
        }
    }

    /// Gets the review's ID
    pub fn get_id(&self) -> i32 {
        self.id
    }

    /// Gets the review's card ID
    ///
    /// ### Returns
    ///
    /// The ID of the card this review belongs to
    pub fn get_card_id(&self) -> i32 {
        self.card_id
    }

    /// Gets the review's quality score
    pub fn get_quality(&self) -> i32 {
        self.quality
    }

    /// Gets when the review occurred as a DateTime<Utc>
    pub fn get_reviewed_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.reviewed_at, Utc)
    }

    /// Gets when the reviewed card is next due as a DateTime<Utc>
    pub fn get_next_review_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.next_review_at, Utc)
    }

    /// Gets the review's creation timestamp as a DateTime<Utc>
    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    /// Gets the review's last update timestamp as a DateTime<Utc>
    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }
}

/// A review that has not been stored yet
#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = reviews)]
pub struct NewReview {
    pub card_id: i32,
    pub quality: i32,
    pub reviewed_at: NaiveDateTime,
    pub next_review_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewReview {
    /// Creates a review submission, scheduling the card's next due time
    ///
    /// ### Arguments
    ///
    /// * `card_id` - The ID of the card being reviewed
    /// * `quality` - The quality score submitted by the learner
    /// * `reviewed_at` - When the review was submitted
    ///
    /// ### Returns
    ///
    /// A `NewReview` whose `next_review_at` follows `scheduling::next_review_at`
    pub fn new(card_id: i32, quality: i32, reviewed_at: DateTime<Utc>) -> Self {
        let next_review_at = scheduling::next_review_at(quality, reviewed_at);
        Self::new_with_fields(card_id, quality, reviewed_at, next_review_at)
    }

    /// Creates a review submission with an explicit next due time
    ///
    /// Used for importing review history and for tests that need reviews
    /// due at a fixed instant.
    pub fn new_with_fields(
        card_id: i32,
        quality: i32,
        reviewed_at: DateTime<Utc>,
        next_review_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            card_id,
            quality,
            reviewed_at: reviewed_at.naive_utc(),
            next_review_at: next_review_at.naive_utc(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Gets when the review occurred as a DateTime<Utc>
    pub fn get_reviewed_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.reviewed_at, Utc)
    }

    /// Gets when the reviewed card becomes due as a DateTime<Utc>
    pub fn get_next_review_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.next_review_at, Utc)
    }
}
