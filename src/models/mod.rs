/// Data models module
///
/// This module defines the core data structures used throughout the application.
/// Each stored entity has a queryable model (`Deck`, `Card`, `Review`) and an
/// insertable counterpart used before the database has assigned an id.

mod timestamp;

mod deck;
pub use deck::{Deck, DeckChanges, NewDeck};

mod card;
pub use card::{Card, CardChanges, NewCard};

mod review;
pub use review::{NewReview, Review};
