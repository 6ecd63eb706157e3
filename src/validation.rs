//! Checks run on incoming entities before they reach the database
//!
//! Handlers decode the request body, fill in the fields that come from the
//! request path or the clock, and then call [`Validate::validate`].

use thiserror::Error;

use crate::models::{CardChanges, DeckChanges, NewCard, NewDeck, NewReview};

/// Lowest accepted review quality
pub const MIN_QUALITY: i32 = 1;

/// Highest accepted review quality
pub const MAX_QUALITY: i32 = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} cannot be empty")]
    Blank(&'static str),
    #[error("{0} must be positive, got {1}")]
    NonPositiveId(&'static str, i32),
    #[error("quality must be between 1 and 5, got {0}")]
    QualityOutOfRange(i32),
    #[error("next_review_at must be later than reviewed_at")]
    NextReviewNotAfterReview,
}

/// Self-check an entity performs before it is persisted
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank(field));
    }
    Ok(())
}

fn require_positive_id(field: &'static str, id: i32) -> Result<(), ValidationError> {
    if id <= 0 {
        return Err(ValidationError::NonPositiveId(field, id));
    }
    Ok(())
}

impl Validate for NewDeck {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)
    }
}

impl Validate for DeckChanges {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)
    }
}

impl Validate for NewCard {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("front", &self.front)?;
        require_text("back", &self.back)?;
        require_positive_id("deck_id", self.deck_id)
    }
}

impl Validate for CardChanges {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("front", &self.front)?;
        require_text("back", &self.back)
    }
}

impl Validate for NewReview {
    fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&self.quality) {
            return Err(ValidationError::QualityOutOfRange(self.quality));
        }
        require_positive_id("card_id", self.card_id)?;
        if self.next_review_at <= self.reviewed_at {
            return Err(ValidationError::NextReviewNotAfterReview);
        }
        Ok(())
    }
}
