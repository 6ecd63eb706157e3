use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::decks;

/// A named collection of cards
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = decks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Deck {
    /// Identifier assigned by the database
    id: i32,

    /// Display name of the deck
    name: String,

    /// When this deck was created
    #[serde(with = "super::timestamp")]
    created_at: NaiveDateTime,

    /// When this deck was last renamed
    #[serde(with = "super::timestamp")]
    updated_at: NaiveDateTime,
}

impl Deck {
    /// Creates a deck with all fields specified
    ///
    /// ### Arguments
    ///
    /// * `id` - The identifier of the deck
    /// * `name` - The name of the deck
    /// * `created_at` - When the deck was created
    /// * `updated_at` - When the deck was last updated
    ///
    /// ### Returns
    ///
    /// A new `Deck` instance with the specified fields
    pub fn new_with_fields(
        id: i32,
        name: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            created_at: created_at.naive_utc(),
            updated_at: updated_at.naive_utc(),
        }
    }

    /// Gets the deck's ID
    pub fn get_id(&self) -> i32 {
        self.id
    }

    /// Gets the deck's name
    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    /// Gets the deck's creation timestamp as a DateTime<Utc>
    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    /// Gets the deck's last update timestamp as a DateTime<Utc>
    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }
}

/// A deck that has not been stored yet
#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = decks)]
pub struct NewDeck {
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewDeck {
    /// Creates a new deck stamped with the current time
    pub fn new(name: String) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            name,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A rename of an existing deck
#[derive(AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = decks)]
pub struct DeckChanges {
    pub name: String,
    pub updated_at: NaiveDateTime,
}

impl DeckChanges {
    pub fn new(name: String) -> Self {
        Self {
            name,
            updated_at: Utc::now().naive_utc(),
        }
    }
}
