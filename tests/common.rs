#![allow(dead_code)]
/// Common test utilities for flashcards integration tests
///
/// This file contains shared functions for all integration tests: test
/// application setup and helpers that drive the API the way a client would.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use flashcards::{
    create_app,
    db::{init_pool, DbPool},
    models::{Card, Deck},
    run_migrations,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Creates a test application backed by its own in-memory SQLite database
///
/// Every pooled connection shares one named in-memory database, so data
/// written through the API is visible to the pool returned alongside it.
///
/// ### Returns
///
/// The application router and the pool it uses
pub fn create_test_app() -> (Router, Arc<DbPool>) {
    let database_url = format!("file:it_{}?mode=memory&cache=shared", uuid::Uuid::new_v4());
    let pool = Arc::new(init_pool(&database_url).expect("Failed to create pool"));

    {
        let mut conn = pool.get().expect("Failed to get connection");
        run_migrations(&mut conn).expect("Failed to run migrations");
    }

    (create_app(pool.clone()), pool)
}

/// Sends a request and returns the status with the body parsed as JSON
///
/// Empty bodies are returned as `Value::Null`.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().uri(uri).method(method);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send_request(app, request).await
}

/// Sends a raw JSON body, for malformed-request tests
pub async fn send_raw(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method(method)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    send_request(app, request).await
}

async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            panic!("Response is not JSON ({}): {}", e, String::from_utf8_lossy(&bytes))
        })
    };

    (status, value)
}

/// Creates a deck via the API, asserting 201
pub async fn create_deck(app: &Router, name: &str) -> Deck {
    let (status, body) = send(app, "POST", "/decks", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED, "Unexpected response: {}", body);
    serde_json::from_value(body).unwrap()
}

/// Creates a card in a deck via the API, asserting 201
pub async fn create_card(app: &Router, deck_id: i32, front: &str, back: &str) -> Card {
    let (status, body) = send(
        app,
        "POST",
        &format!("/decks/{}/cards", deck_id),
        Some(json!({ "front": front, "back": back })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Unexpected response: {}", body);
    serde_json::from_value(body).unwrap()
}

/// Fetches the next due card of a deck
pub async fn next_card(app: &Router, deck_id: i32) -> (StatusCode, Value) {
    send(app, "GET", &format!("/decks/{}/cards/next", deck_id), None).await
}

/// Asserts that a response is an error with the given status
pub fn assert_error(status: StatusCode, body: &Value, expected: StatusCode) {
    assert_eq!(status, expected, "Unexpected response: {}", body);
    assert!(body["error"].is_string(), "Expected an error body, got {}", body);
}
