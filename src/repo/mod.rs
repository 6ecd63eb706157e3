/// Repository module
///
/// This module provides the data access layer for the application.
/// It contains functions for interacting with the database: creating,
/// retrieving, updating and deleting decks, cards and reviews, and loading
/// the state the scheduling rules need to pick the next due card.
///
/// The repository pattern abstracts away the details of database access
/// and provides a clean API for the rest of the application to use.

mod deck_repo;
mod card_repo;
mod review_repo;

// Re-export all repository functions
pub use deck_repo::*;
pub use card_repo::*;
pub use review_repo::*;
