use crate::db::DbPool;
use crate::models::{Deck, DeckChanges, NewDeck};
use crate::schema::decks;
use anyhow::{Context, Result};
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a new deck in the database
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `new_deck` - The deck to insert
///
/// ### Returns
///
/// A Result containing the stored Deck, with its assigned id
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The database insert operation fails
#[instrument(skip(pool, new_deck), fields(name = %new_deck.name))]
pub fn create_deck(pool: &DbPool, new_deck: &NewDeck) -> Result<Deck> {
    debug!("Creating new deck");

    let conn = &mut pool.get()?;

    let deck = diesel::insert_into(decks::table)
        .values(new_deck)
        .returning(Deck::as_returning())
        .get_result(conn)
        .context("failed to create deck")?;

    info!("Successfully created deck with id: {}", deck.get_id());

    Ok(deck)
}

/// Retrieves a deck from the database by its ID
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `deck_id` - The ID of the deck to retrieve
///
/// ### Returns
///
/// A Result containing an Option with the Deck if found, or None if not found
#[instrument(skip(pool))]
pub fn get_deck(pool: &DbPool, deck_id: i32) -> Result<Option<Deck>> {
    debug!("Retrieving deck by id");

    let conn = &mut pool.get()?;

    let result = decks::table
        .find(deck_id)
        .select(Deck::as_select())
        .first(conn)
        .optional()
        .context("failed to get deck")?;

    if result.is_none() {
        debug!("Deck not found");
    }

    Ok(result)
}

/// Lists all decks, newest first
///
/// Decks created in the same instant are ordered by descending id.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
///
/// ### Returns
///
/// A Result containing a vector of all Decks
#[instrument(skip(pool))]
pub fn list_decks(pool: &DbPool) -> Result<Vec<Deck>> {
    debug!("Listing decks");

    let conn = &mut pool.get()?;

    let result = decks::table
        .order((decks::created_at.desc(), decks::id.desc()))
        .select(Deck::as_select())
        .load(conn)
        .context("failed to list decks")?;

    debug!("Retrieved {} decks", result.len());

    Ok(result)
}

/// Renames a deck
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `deck_id` - The ID of the deck to update
/// * `changes` - The new name and update timestamp
///
/// ### Returns
///
/// A Result containing the updated Deck, or None if the deck does not exist
#[instrument(skip(pool, changes))]
pub fn update_deck(pool: &DbPool, deck_id: i32, changes: &DeckChanges) -> Result<Option<Deck>> {
    debug!("Updating deck");

    let conn = &mut pool.get()?;

    let result = diesel::update(decks::table.find(deck_id))
        .set(changes)
        .returning(Deck::as_returning())
        .get_result(conn)
        .optional()
        .context("failed to update deck")?;

    if result.is_some() {
        info!("Successfully updated deck {}", deck_id);
    }

    Ok(result)
}

/// Deletes a deck, its cards, and their reviews
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `deck_id` - The ID of the deck to delete
///
/// ### Returns
///
/// A Result containing true if a deck was deleted, false if it did not exist
#[instrument(skip(pool))]
pub fn delete_deck(pool: &DbPool, deck_id: i32) -> Result<bool> {
    debug!("Deleting deck");

    let conn = &mut pool.get()?;

    let deleted = diesel::delete(decks::table.find(deck_id))
        .execute(conn)
        .context("failed to delete deck")?;

    if deleted > 0 {
        info!("Deleted deck {}", deck_id);
    }

    Ok(deleted > 0)
}
