use crate::db::DbPool;
use crate::models::{NewReview, Review};
use crate::scheduling;
use crate::schema::{cards, reviews};
use anyhow::{Context, Result};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Inserts a review as given
///
/// No existence check beyond the foreign key; `record_review` is the
/// entry point for review submissions.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `new_review` - The review to insert
///
/// ### Returns
///
/// A Result containing the stored Review
#[instrument(skip(pool, new_review), fields(card_id = %new_review.card_id, quality = %new_review.quality))]
pub fn create_review(pool: &DbPool, new_review: &NewReview) -> Result<Review> {
    debug!("Inserting review");

    let conn = &mut pool.get()?;

    let review = diesel::insert_into(reviews::table)
        .values(new_review)
        .returning(Review::as_returning())
        .get_result(conn)
        .context("failed to create review")?;

    Ok(review)
}

/// Records a review submission for a card
///
/// The card lookup and the insert run in one immediate transaction, so a
/// card deleted concurrently is reported as missing instead of failing on
/// the foreign key.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `new_review` - The validated review, with `next_review_at` already scheduled
///
/// ### Returns
///
/// A Result containing the stored Review, or None if the card does not exist
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The database operations fail
#[instrument(skip(pool, new_review), fields(card_id = %new_review.card_id, quality = %new_review.quality))]
pub fn record_review(pool: &DbPool, new_review: &NewReview) -> Result<Option<Review>> {
    debug!("Recording review");

    let conn = &mut pool.get()?;

    let review = conn
        .immediate_transaction(|conn| {
            let card_exists = cards::table
                .find(new_review.card_id)
                .count()
                .get_result::<i64>(conn)?
                > 0;

            if !card_exists {
                return Ok(None);
            }

            diesel::insert_into(reviews::table)
                .values(new_review)
                .returning(Review::as_returning())
                .get_result(conn)
                .map(Some)
        })
        .context("failed to record review")?;

    match &review {
        Some(review) => info!(
            "Recorded review {}; card due again at {}",
            review.get_id(),
            review.get_next_review_at()
        ),
        None => debug!("Card not found"),
    }

    Ok(review)
}

/// Gets all reviews for a card, most recent first
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `card_id` - The ID of the card to get reviews for
///
/// ### Returns
///
/// A Result containing the card's reviews ordered by `reviewed_at` descending
#[instrument(skip(pool))]
pub fn get_reviews_for_card(pool: &DbPool, card_id: i32) -> Result<Vec<Review>> {
    let conn = &mut pool.get()?;

    let result = reviews::table
        .filter(reviews::card_id.eq(card_id))
        .order((reviews::reviewed_at.desc(), reviews::id.desc()))
        .select(Review::as_select())
        .load(conn)
        .context("failed to get reviews by card")?;

    debug!("Retrieved {} reviews", result.len());

    Ok(result)
}

/// Gets the review that currently determines when a card is due
///
/// ### Returns
///
/// A Result containing the card's most recent review, or None if it was never reviewed
#[instrument(skip(pool))]
pub fn get_most_recent_review(pool: &DbPool, card_id: i32) -> Result<Option<Review>> {
    let conn = &mut pool.get()?;

    let result = reviews::table
        .filter(reviews::card_id.eq(card_id))
        .order((reviews::reviewed_at.desc(), reviews::id.desc()))
        .select(Review::as_select())
        .first(conn)
        .optional()
        .context("failed to get most recent review")?;

    Ok(result)
}

pub(super) fn load_latest_reviews_for_deck(
    conn: &mut SqliteConnection,
    deck_id: i32,
) -> QueryResult<HashMap<i32, Review>> {
    let deck_reviews = reviews::table
        .inner_join(cards::table)
        .filter(cards::deck_id.eq(deck_id))
        .select(Review::as_select())
        .load::<Review>(conn)?;

    Ok(scheduling::latest_reviews_by_card(deck_reviews))
}

/// Gets the most recent review of every reviewed card in a deck
///
/// ### Returns
///
/// A Result containing a map from card id to that card's most recent review;
/// cards that were never reviewed have no entry
#[instrument(skip(pool))]
pub fn get_latest_reviews_for_deck(pool: &DbPool, deck_id: i32) -> Result<HashMap<i32, Review>> {
    let conn = &mut pool.get()?;
    load_latest_reviews_for_deck(conn, deck_id).context("failed to get latest reviews for deck")
}
