/// Integration tests for review and study functionality
///
/// This file contains tests for:
/// - Recording reviews and the due times they schedule
/// - Rejecting out-of-range quality scores
/// - Picking the next due card of a deck

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use flashcards::models::{Card, NewReview, Review};
use flashcards::repo;
use serde_json::json;

mod common;
use common::*;

async fn submit_review(app: &axum::Router, card_id: i32, quality: i32) -> (StatusCode, serde_json::Value) {
    send(
        app,
        "POST",
        &format!("/cards/{}/reviews", card_id),
        Some(json!({ "quality": quality })),
    )
    .await
}

#[tokio::test]
async fn test_review_intervals_by_quality() {
    let (app, _pool) = create_test_app();
    let deck = create_deck(&app, "Spanish").await;
    let card = create_card(&app, deck.get_id(), "hola", "hello").await;

    for (quality, hours) in [(1, 24), (2, 24), (3, 24), (4, 72), (5, 72)] {
        let before = Utc::now();
        let (status, body) = submit_review(&app, card.get_id(), quality).await;
        let after = Utc::now();
        assert_eq!(status, StatusCode::CREATED, "Unexpected response: {}", body);

        let review: Review = serde_json::from_value(body).unwrap();
        assert_eq!(review.get_card_id(), card.get_id());
        assert_eq!(review.get_quality(), quality);
        assert!(review.get_reviewed_at() >= before && review.get_reviewed_at() <= after);
        assert_eq!(
            review.get_next_review_at() - review.get_reviewed_at(),
            Duration::hours(hours),
            "quality {} should schedule {}h",
            quality,
            hours
        );
    }
}

#[tokio::test]
async fn test_review_quality_out_of_range() {
    let (app, _pool) = create_test_app();
    let deck = create_deck(&app, "Spanish").await;
    let card = create_card(&app, deck.get_id(), "hola", "hello").await;

    for quality in [0, 6, -3] {
        let (status, body) = submit_review(&app, card.get_id(), quality).await;
        assert_error(status, &body, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            format!("quality must be between 1 and 5, got {}", quality)
        );
    }

    let (status, body) = send(&app, "GET", &format!("/cards/{}/reviews", card.get_id()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_review_malformed_quality() {
    let (app, _pool) = create_test_app();
    let deck = create_deck(&app, "Spanish").await;
    let card = create_card(&app, deck.get_id(), "hola", "hello").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/cards/{}/reviews", card.get_id()),
        Some(json!({ "quality": "great" })),
    )
    .await;

    assert_error(status, &body, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_review_unknown_card() {
    let (app, _pool) = create_test_app();

    let (status, body) = submit_review(&app, 9999, 3).await;

    assert_error(status, &body, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Card not found");
}

#[tokio::test]
async fn test_list_reviews_most_recent_first() {
    let (app, pool) = create_test_app();
    let deck = create_deck(&app, "Spanish").await;
    let card = create_card(&app, deck.get_id(), "hola", "hello").await;
    let now = Utc::now();
    repo::create_review(&pool, &NewReview::new(card.get_id(), 2, now - Duration::days(2))).unwrap();
    repo::create_review(&pool, &NewReview::new(card.get_id(), 5, now - Duration::days(1))).unwrap();

    let (status, body) = send(&app, "GET", &format!("/cards/{}/reviews", card.get_id()), None).await;

    assert_eq!(status, StatusCode::OK);
    let reviews: Vec<Review> = serde_json::from_value(body).unwrap();
    let qualities: Vec<i32> = reviews.iter().map(|r| r.get_quality()).collect();
    assert_eq!(qualities, vec![5, 2]);

    let (status, body) = send(&app, "GET", "/cards/999/reviews", None).await;
    assert_error(status, &body, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_next_card_empty_deck() {
    let (app, _pool) = create_test_app();
    let deck = create_deck(&app, "Empty").await;

    let (status, body) = next_card(&app, deck.get_id()).await;

    assert_error(status, &body, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_next_card_unknown_deck() {
    let (app, _pool) = create_test_app();

    let (status, body) = next_card(&app, 777).await;

    assert_error(status, &body, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Deck not found");
}

/// Walks through a first study session on a new deck
///
/// This test verifies:
/// 1. A fresh card is due immediately
/// 2. An easy review pushes it 72 hours out
/// 3. With its only card scheduled in the future the deck has nothing due
#[tokio::test]
async fn test_spanish_study_session() {
    let (app, _pool) = create_test_app();
    let deck = create_deck(&app, "Spanish").await;
    let card = create_card(&app, deck.get_id(), "hola", "hello").await;

    let (status, body) = next_card(&app, deck.get_id()).await;
    assert_eq!(status, StatusCode::OK);
    let next: Card = serde_json::from_value(body).unwrap();
    assert_eq!(next, card);

    let (status, body) = submit_review(&app, card.get_id(), 5).await;
    assert_eq!(status, StatusCode::CREATED);
    let review: Review = serde_json::from_value(body).unwrap();
    assert_eq!(
        review.get_next_review_at() - review.get_reviewed_at(),
        Duration::hours(72)
    );

    let (status, body) = next_card(&app, deck.get_id()).await;
    assert_error(status, &body, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_next_card_prefers_overdue_over_future() {
    let (app, pool) = create_test_app();
    let deck = create_deck(&app, "Spanish").await;
    let tomorrow_card = create_card(&app, deck.get_id(), "mañana", "tomorrow").await;
    let yesterday_card = create_card(&app, deck.get_id(), "ayer", "yesterday").await;
    let now = Utc::now();

    repo::create_review(
        &pool,
        &NewReview::new_with_fields(tomorrow_card.get_id(), 4, now - Duration::days(2), now + Duration::days(1)),
    )
    .unwrap();
    repo::create_review(
        &pool,
        &NewReview::new_with_fields(yesterday_card.get_id(), 2, now - Duration::days(2), now - Duration::days(1)),
    )
    .unwrap();

    let (status, body) = next_card(&app, deck.get_id()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], yesterday_card.get_id());
}

#[tokio::test]
async fn test_next_card_unreviewed_before_overdue() {
    let (app, pool) = create_test_app();
    let deck = create_deck(&app, "Spanish").await;
    let overdue = create_card(&app, deck.get_id(), "ayer", "yesterday").await;
    let fresh = create_card(&app, deck.get_id(), "nuevo", "new").await;
    let now = Utc::now();

    repo::create_review(
        &pool,
        &NewReview::new_with_fields(overdue.get_id(), 1, now - Duration::days(3), now - Duration::days(2)),
    )
    .unwrap();

    let (status, body) = next_card(&app, deck.get_id()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], fresh.get_id());

    // Once the fresh card is reviewed, the overdue one comes up
    let (status, _) = submit_review(&app, fresh.get_id(), 3).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = next_card(&app, deck.get_id()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], overdue.get_id());
}

#[tokio::test]
async fn test_deleting_deck_removes_reviews() {
    let (app, pool) = create_test_app();
    let deck = create_deck(&app, "Spanish").await;
    let card = create_card(&app, deck.get_id(), "hola", "hello").await;
    let (status, _) = submit_review(&app, card.get_id(), 4).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, "DELETE", &format!("/decks/{}", deck.get_id()), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert!(repo::get_reviews_for_card(&pool, card.get_id()).unwrap().is_empty());
}
