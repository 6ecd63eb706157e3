use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::dto::{CreateDeckDto, UpdateDeckDto};
use crate::errors::ApiError;
use crate::models::{Deck, DeckChanges, NewDeck};
use crate::repo;
use crate::validation::Validate;

/// Handler for creating a new deck
///
/// This function handles POST requests to `/decks`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `payload` - The request payload containing the deck name
///
/// ### Returns
///
/// 201 with the newly created deck as JSON
#[instrument(skip(pool, payload))]
pub async fn create_deck_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    // Extract and deserialize the JSON request body
    payload: Result<Json<CreateDeckDto>, JsonRejection>,
) -> Result<(StatusCode, Json<Deck>), ApiError> {
    let Json(payload) = payload?;
    info!("Creating new deck");

    let new_deck = NewDeck::new(payload.name);
    new_deck.validate()?;

    let deck = repo::create_deck(&pool, &new_deck).map_err(ApiError::Database)?;

    Ok((StatusCode::CREATED, Json(deck)))
}

/// Handler for listing all decks
///
/// This function handles GET requests to `/decks`.
///
/// ### Returns
///
/// All decks as JSON, newest first
#[instrument(skip(pool))]
pub async fn list_decks_handler(
    State(pool): State<Arc<DbPool>>,
) -> Result<Json<Vec<Deck>>, ApiError> {
    debug!("Listing decks");

    let decks = repo::list_decks(&pool).map_err(ApiError::Database)?;

    info!("Retrieved {} decks", decks.len());

    Ok(Json(decks))
}

/// Handler for retrieving a specific deck
///
/// This function handles GET requests to `/decks/{id}`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `id` - The ID of the deck to retrieve, extracted from the URL path
///
/// ### Returns
///
/// The requested deck as JSON, or 404 if it does not exist
#[instrument(skip(pool, id))]
pub async fn get_deck_handler(
    State(pool): State<Arc<DbPool>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Deck>, ApiError> {
    let Path(id) = id.map_err(|r| ApiError::invalid_id("Deck", r))?;
    debug!("Getting deck {}", id);

    let deck = repo::get_deck(&pool, id)
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::not_found("Deck"))?;

    Ok(Json(deck))
}

/// Handler for renaming a deck
///
/// This function handles PUT requests to `/decks/{id}`.
///
/// ### Returns
///
/// The updated deck as JSON
#[instrument(skip(pool, id, payload))]
pub async fn update_deck_handler(
    State(pool): State<Arc<DbPool>>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateDeckDto>, JsonRejection>,
) -> Result<Json<Deck>, ApiError> {
    let Path(id) = id.map_err(|r| ApiError::invalid_id("Deck", r))?;
    let Json(payload) = payload?;
    info!("Updating deck {}", id);

    let changes = DeckChanges::new(payload.name);
    changes.validate()?;

    let deck = repo::update_deck(&pool, id, &changes)
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::not_found("Deck"))?;

    Ok(Json(deck))
}

/// Handler for deleting a deck along with its cards and reviews
///
/// This function handles DELETE requests to `/decks/{id}`.
///
/// ### Returns
///
/// 204 on success, 404 if the deck does not exist
#[instrument(skip(pool, id))]
pub async fn delete_deck_handler(
    State(pool): State<Arc<DbPool>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id.map_err(|r| ApiError::invalid_id("Deck", r))?;
    info!("Deleting deck {}", id);

    if !repo::delete_deck(&pool, id).map_err(ApiError::Database)? {
        return Err(ApiError::not_found("Deck"));
    }

    Ok(StatusCode::NO_CONTENT)
}
