use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::dto::{CreateCardDto, UpdateCardDto};
use crate::errors::ApiError;
use crate::models::{Card, CardChanges, NewCard};
use crate::repo;
use crate::validation::Validate;

/// Returns 404 unless the deck exists
fn require_deck(pool: &DbPool, deck_id: i32) -> Result<(), ApiError> {
    repo::get_deck(pool, deck_id)
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::not_found("Deck"))?;
    Ok(())
}

/// Handler for creating a new card in a deck
///
/// This function handles POST requests to `/decks/{id}/cards`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `deck_id` - The ID of the deck to add the card to
/// * `payload` - The request payload containing the card's front and back
///
/// ### Returns
///
/// 201 with the newly created card as JSON
#[instrument(skip(pool, deck_id, payload))]
pub async fn create_card_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    // Extract the deck ID from the URL path
    deck_id: Result<Path<i32>, PathRejection>,
    // Extract and deserialize the JSON request body
    payload: Result<Json<CreateCardDto>, JsonRejection>,
) -> Result<(StatusCode, Json<Card>), ApiError> {
    let Path(deck_id) = deck_id.map_err(|r| ApiError::invalid_id("Deck", r))?;
    let Json(payload) = payload?;
    info!("Creating new card for deck {}", deck_id);

    let new_card = NewCard::new(deck_id, payload.front, payload.back);
    new_card.validate()?;

    let card = repo::create_card_in_deck(&pool, &new_card)
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::not_found("Deck"))?;

    Ok((StatusCode::CREATED, Json(card)))
}

/// Handler for listing the cards of a deck
///
/// This function handles GET requests to `/decks/{id}/cards`.
///
/// ### Returns
///
/// The deck's cards as JSON, newest first
#[instrument(skip(pool, deck_id))]
pub async fn list_cards_by_deck_handler(
    State(pool): State<Arc<DbPool>>,
    deck_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<Card>>, ApiError> {
    let Path(deck_id) = deck_id.map_err(|r| ApiError::invalid_id("Deck", r))?;
    debug!("Listing cards for deck {}", deck_id);

    require_deck(&pool, deck_id)?;

    let cards = repo::get_cards_by_deck(&pool, deck_id).map_err(ApiError::Database)?;

    info!("Retrieved {} cards", cards.len());

    Ok(Json(cards))
}

/// Handler for getting the next card due for study in a deck
///
/// This function handles GET requests to `/decks/{id}/cards/next`.
///
/// Never-reviewed cards come first. Otherwise the card whose most recent
/// review set the earliest due time at or before now is returned.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `deck_id` - The ID of the deck to study
///
/// ### Returns
///
/// The next due card as JSON, or 404 if the deck does not exist or nothing is due
#[instrument(skip(pool, deck_id))]
pub async fn get_next_due_card_handler(
    State(pool): State<Arc<DbPool>>,
    deck_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Card>, ApiError> {
    let Path(deck_id) = deck_id.map_err(|r| ApiError::invalid_id("Deck", r))?;
    debug!("Getting next due card for deck {}", deck_id);

    require_deck(&pool, deck_id)?;

    let card = repo::get_next_due_card(&pool, deck_id, Utc::now())
        .map_err(ApiError::Database)?
        .ok_or_else(|| {
            ApiError::NotFound(format!("No card due for study in deck {}", deck_id))
        })?;

    info!("Next due card is {}", card.get_id());

    Ok(Json(card))
}

/// Handler for retrieving a specific card
///
/// This function handles GET requests to `/cards/{id}`.
#[instrument(skip(pool, id))]
pub async fn get_card_handler(
    State(pool): State<Arc<DbPool>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Card>, ApiError> {
    let Path(id) = id.map_err(|r| ApiError::invalid_id("Card", r))?;
    debug!("Getting card {}", id);

    let card = repo::get_card(&pool, id)
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::not_found("Card"))?;

    Ok(Json(card))
}

/// Handler for replacing a card's front and back
///
/// This function handles PUT requests to `/cards/{id}`.
#[instrument(skip(pool, id, payload))]
pub async fn update_card_handler(
    State(pool): State<Arc<DbPool>>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateCardDto>, JsonRejection>,
) -> Result<Json<Card>, ApiError> {
    let Path(id) = id.map_err(|r| ApiError::invalid_id("Card", r))?;
    let Json(payload) = payload?;
    info!("Updating card {}", id);

    let changes = CardChanges::new(payload.front, payload.back);
    changes.validate()?;

    let card = repo::update_card(&pool, id, &changes)
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::not_found("Card"))?;

    Ok(Json(card))
}

/// Handler for deleting a card and its reviews
///
/// This function handles DELETE requests to `/cards/{id}`.
#[instrument(skip(pool, id))]
pub async fn delete_card_handler(
    State(pool): State<Arc<DbPool>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id.map_err(|r| ApiError::invalid_id("Card", r))?;
    info!("Deleting card {}", id);

    if !repo::delete_card(&pool, id).map_err(ApiError::Database)? {
        return Err(ApiError::not_found("Card"));
    }

    Ok(StatusCode::NO_CONTENT)
}
