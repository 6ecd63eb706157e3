use serde::Deserialize;

/// Data transfer object for creating a new deck
///
/// This struct is used to deserialize JSON requests for creating decks.
#[derive(Deserialize, Debug)]
pub struct CreateDeckDto {
    /// The name of the deck
    pub name: String,
}

/// Data transfer object for renaming a deck
#[derive(Deserialize, Debug)]
pub struct UpdateDeckDto {
    /// The new name of the deck
    pub name: String,
}

/// Data transfer object for creating a new card
///
/// This struct is used to deserialize JSON requests for creating cards.
/// The owning deck comes from the request path.
#[derive(Deserialize, Debug)]
pub struct CreateCardDto {
    /// The prompt side of the card
    pub front: String,

    /// The answer side of the card
    pub back: String,
}

/// Data transfer object for replacing a card's content
#[derive(Deserialize, Debug)]
pub struct UpdateCardDto {
    pub front: String,
    pub back: String,
}

/// Data transfer object for creating a new review
///
/// This struct is used to deserialize JSON requests for recording reviews.
/// The range of `quality` is checked by validation, not by decoding, so an
/// out-of-range score yields a validation message instead of a decode error.
#[derive(Deserialize, Debug)]
pub struct CreateReviewDto {
    /// The quality score given during the review (1-5)
    pub quality: i32,
}
