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
use tracing::{debug, info, instrument, warn};

use crate::db::DbPool;
use crate::dto::CreateReviewDto;
use crate::errors::ApiError;
use crate::models::{NewReview, Review};
use crate::repo;
use crate::validation::Validate;

/// Handler for recording a review for a card
///
/// This function handles POST requests to `/cards/{id}/reviews`.
/// The review is stamped with the server's current time and the card's next
/// due time is scheduled from the submitted quality.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `card_id` - The ID of the reviewed card, extracted from the URL path
/// * `payload` - The request payload containing the quality score
///
/// ### Returns
///
/// 201 with the newly created review as JSON
#[instrument(skip(pool, card_id, payload))]
pub async fn create_review_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    // Extract the card ID from the URL path
    card_id: Result<Path<i32>, PathRejection>,
    // Extract and deserialize the JSON request body
    payload: Result<Json<CreateReviewDto>, JsonRejection>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let Path(card_id) = card_id.map_err(|r| ApiError::invalid_id("Card", r))?;
    let Json(payload) = payload?;
    info!("Creating new review for card {}", card_id);

    let new_review = NewReview::new(card_id, payload.quality, Utc::now());
    if let Err(err) = new_review.validate() {
        warn!("Rejected review: {}", err);
        return Err(err.into());
    }

    let review = repo::record_review(&pool, &new_review)
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::not_found("Card"))?;

    Ok((StatusCode::CREATED, Json(review)))
}

/// Handler for listing the reviews of a card
///
/// This function handles GET requests to `/cards/{id}/reviews`.
///
/// ### Returns
///
/// The card's reviews as JSON, most recent first
#[instrument(skip(pool, card_id))]
pub async fn list_reviews_by_card_handler(
    State(pool): State<Arc<DbPool>>,
    card_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let Path(card_id) = card_id.map_err(|r| ApiError::invalid_id("Card", r))?;
    debug!("Listing reviews for card {}", card_id);

    repo::get_card(&pool, card_id)
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::not_found("Card"))?;

    let reviews = repo::get_reviews_for_card(&pool, card_id).map_err(ApiError::Database)?;

    debug!("Retrieved {} reviews", reviews.len());

    Ok(Json(reviews))
}
