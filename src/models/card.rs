use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::cards;

/// A front/back study unit belonging to one deck
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = cards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Card {
    /// Identifier assigned by the database
    id: i32,

    /// The ID of the deck this card belongs to
    deck_id: i32,

    /// The prompt shown to the learner
    front: String,

    /// The answer revealed after the prompt
    back: String,

    /// When this card was created
    #[serde(with = "super::timestamp")]
    created_at: NaiveDateTime,

    /// When this card's content was last edited
    #[serde(with = "super::timestamp")]
    updated_at: NaiveDateTime,
}

impl Card {
    /// Creates a card with all fields specified
    ///
    /// ### Arguments
    ///
    /// * `id` - The identifier of the card
    /// * `deck_id` - The ID of the deck this card belongs to
    /// * `front` - The prompt side of the card
    /// * `back` - The answer side of the card
    /// * `created_at` - When the card was created
    /// * `updated_at` - When the card was last updated
    ///
    /// ### Returns
    ///
    /// A new `Card` instance with the specified fields
    pub fn new_with_fields(
        id: i32,
        deck_id: i32,
        front: String,
        back: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            deck_id,
            front,
            back,
            created_at: created_at.naive_utc(),
            updated_at: updated_at.naive_utc(),
        }
    }

    /// Gets the card's ID
    ///
    /// ### Returns
    ///
    /// The identifier of the card
    pub fn get_id(&self) -> i32 {
        self.id
    }

    /// Gets the card's deck ID
    ///
    /// ### Returns
    ///
    /// The ID of the deck this card belongs to
    pub fn get_deck_id(&self) -> i32 {
        self.deck_id
    }

    /// Gets the card's front text
    pub fn get_front(&self) -> String {
        self.front.clone()
    }

    /// Gets the card's back text
    pub fn get_back(&self) -> String {
        self.back.clone()
    }

    /// Gets the card's creation timestamp as a DateTime<Utc>
    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    /// Gets the card's last update timestamp as a DateTime<Utc>
    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }
}

/// A card that has not been stored yet
///
/// `deck_id` comes from the request path, not from the request body.
#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = cards)]
pub struct NewCard {
    pub deck_id: i32,
    pub front: String,
    pub back: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewCard {
    /// Creates a new card for a deck, stamped with the current time
    pub fn new(deck_id: i32, front: String, back: String) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            deck_id,
            front,
            back,
            created_at: now,
            updated_at: now,
        }
    }
}

/// An edit of an existing card's content
#[derive(AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = cards)]
pub struct CardChanges {
    pub front: String,
    pub back: String,
    pub updated_at: NaiveDateTime,
}

impl CardChanges {
    pub fn new(front: String, back: String) -> Self {
        Self {
            front,
            back,
            updated_at: Utc::now().naive_utc(),
        }
    }
}
