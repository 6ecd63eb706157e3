use crate::db::DbPool;
use crate::models::{Card, CardChanges, NewCard};
use crate::scheduling;
use crate::schema::{cards, decks};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::{debug, info, instrument};

use super::review_repo::load_latest_reviews_for_deck;

/// Creates a new card in the database
///
/// The owning deck must exist; the foreign key rejects the insert otherwise.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `new_card` - The card to insert
///
/// ### Returns
///
/// A Result containing the stored Card, with its assigned id
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The database insert operation fails
#[instrument(skip(pool, new_card), fields(deck_id = %new_card.deck_id))]
pub fn create_card(pool: &DbPool, new_card: &NewCard) -> Result<Card> {
    debug!("Creating new card");

    let conn = &mut pool.get()?;

    let card = diesel::insert_into(cards::table)
        .values(new_card)
        .returning(Card::as_returning())
        .get_result(conn)
        .context("failed to create card")?;

    info!("Successfully created card with id: {}", card.get_id());

    Ok(card)
}

/// Creates a card if its deck exists
///
/// The deck lookup and the insert run in one immediate transaction, so a
/// deck deleted concurrently is reported as missing instead of failing on
/// the foreign key.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `new_card` - The validated card to insert
///
/// ### Returns
///
/// A Result containing the stored Card, or None if the deck does not exist
#[instrument(skip(pool, new_card), fields(deck_id = %new_card.deck_id))]
pub fn create_card_in_deck(pool: &DbPool, new_card: &NewCard) -> Result<Option<Card>> {
    debug!("Creating new card in deck");

    let conn = &mut pool.get()?;

    let card = conn
        .immediate_transaction(|conn| {
            let deck_exists = decks::table
                .find(new_card.deck_id)
                .count()
                .get_result::<i64>(conn)?
                > 0;

            if !deck_exists {
                return Ok(None);
            }

            diesel::insert_into(cards::table)
                .values(new_card)
                .returning(Card::as_returning())
                .get_result(conn)
                .map(Some)
        })
        .context("failed to create card")?;

    match &card {
        Some(card) => info!("Successfully created card with id: {}", card.get_id()),
        None => debug!("Deck not found"),
    }

    Ok(card)
}

/// Retrieves a card from the database by its ID
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `card_id` - The ID of the card to retrieve
///
/// ### Returns
///
/// A Result containing an Option with the Card if found, or None if not found
#[instrument(skip(pool))]
pub fn get_card(pool: &DbPool, card_id: i32) -> Result<Option<Card>> {
    debug!("Retrieving card by id");

    let conn = &mut pool.get()?;

    let result = cards::table
        .find(card_id)
        .select(Card::as_select())
        .first(conn)
        .optional()
        .context("failed to get card")?;

    if result.is_none() {
        debug!("Card not found");
    }

    Ok(result)
}

pub(super) fn load_cards_by_deck(conn: &mut SqliteConnection, deck_id: i32) -> QueryResult<Vec<Card>> {
    cards::table
        .filter(cards::deck_id.eq(deck_id))
        .order((cards::created_at.desc(), cards::id.desc()))
        .select(Card::as_select())
        .load(conn)
}

/// Gets all cards of a deck, newest first
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `deck_id` - The ID of the deck to get cards for
///
/// ### Returns
///
/// A Result containing the deck's cards; empty if the deck has none or does not exist
#[instrument(skip(pool))]
pub fn get_cards_by_deck(pool: &DbPool, deck_id: i32) -> Result<Vec<Card>> {
    debug!("Getting cards for deck");

    let conn = &mut pool.get()?;
    let result = load_cards_by_deck(conn, deck_id).context("failed to get cards by deck")?;

    debug!("Retrieved {} cards for deck {}", result.len(), deck_id);

    Ok(result)
}

/// Finds the card of a deck to study next
///
/// Loads the deck's cards and each card's most recent review in one read
/// transaction, then applies `scheduling::select_next_due`.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `deck_id` - The ID of the deck to study
/// * `now` - The instant due times are compared against
///
/// ### Returns
///
/// A Result containing the next due Card, or None if no card of the deck is due
#[instrument(skip(pool))]
pub fn get_next_due_card(pool: &DbPool, deck_id: i32, now: DateTime<Utc>) -> Result<Option<Card>> {
    debug!("Selecting next due card");

    let conn = &mut pool.get()?;

    let (deck_cards, latest_reviews) = conn
        .transaction(|conn| {
            let deck_cards = load_cards_by_deck(conn, deck_id)?;
            let latest_reviews = load_latest_reviews_for_deck(conn, deck_id)?;
            Ok::<_, diesel::result::Error>((deck_cards, latest_reviews))
        })
        .context("failed to get next due card")?;

    let next = scheduling::select_next_due(&deck_cards, &latest_reviews, now).cloned();

    match &next {
        Some(card) => debug!("Card {} is next out of {} cards", card.get_id(), deck_cards.len()),
        None => debug!("None of the {} cards are due", deck_cards.len()),
    }

    Ok(next)
}

/// Replaces a card's front and back text
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `card_id` - The ID of the card to update
/// * `changes` - The new content and update timestamp
///
/// ### Returns
///
/// A Result containing the updated Card, or None if the card does not exist
#[instrument(skip(pool, changes))]
pub fn update_card(pool: &DbPool, card_id: i32, changes: &CardChanges) -> Result<Option<Card>> {
    debug!("Updating card");

    let conn = &mut pool.get()?;

    let result = diesel::update(cards::table.find(card_id))
        .set(changes)
        .returning(Card::as_returning())
        .get_result(conn)
        .optional()
        .context("failed to update card")?;

    if result.is_some() {
        info!("Successfully updated card {}", card_id);
    }

    Ok(result)
}

/// Deletes a card and its reviews
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `card_id` - The ID of the card to delete
///
/// ### Returns
///
/// A Result containing true if a card was deleted, false if it did not exist
#[instrument(skip(pool))]
pub fn delete_card(pool: &DbPool, card_id: i32) -> Result<bool> {
    debug!("Deleting card");

    let conn = &mut pool.get()?;

    let deleted = diesel::delete(cards::table.find(card_id))
        .execute(conn)
        .context("failed to delete card")?;

    if deleted > 0 {
        info!("Deleted card {}", card_id);
    }

    Ok(deleted > 0)
}
