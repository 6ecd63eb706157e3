use crate::db;
use crate::models::{Card, Deck, NewCard, NewDeck};
use crate::repo;
use chrono::{DateTime, Utc};
use proptest::prelude::*;
use std::sync::Arc;

/// Sets up a test database with migrations applied
///
/// This function:
/// 1. Creates an in-memory SQLite database
/// 2. Runs all migrations to set up the schema
///
/// Foreign keys are switched on by the pool for every connection.
///
/// ### Returns
///
/// An Arc-wrapped database connection pool connected to the in-memory database
pub fn setup_test_db() -> Arc<db::DbPool> {
    // Plain ":memory:" gives each connection its own separate database, so a
    // unique shared-cache URI keeps the pool on one database per test.
    let unique_id = uuid::Uuid::new_v4();
    let database_url = format!("file:test_{}?mode=memory&cache=shared", unique_id);
    let pool = db::init_pool(&database_url).expect("Failed to create pool");

    let mut conn = pool.get().expect("Failed to get connection");
    crate::run_migrations(&mut conn).expect("Failed to run migrations");
    drop(conn);

    Arc::new(pool)
}

/// Creates a deck through the repository
pub fn seed_deck(pool: &db::DbPool, name: &str) -> Deck {
    repo::create_deck(pool, &NewDeck::new(name.to_string())).expect("Failed to create deck")
}

/// Creates a card in `deck_id` through the repository
pub fn seed_card(pool: &db::DbPool, deck_id: i32, front: &str, back: &str) -> Card {
    repo::create_card(pool, &NewCard::new(deck_id, front.to_string(), back.to_string()))
        .expect("Failed to create card")
}

/// Generates an arbitrary DateTime<Utc> within 2020-01-01 to 2030-01-01
pub fn arb_datetime_utc() -> impl Strategy<Value = DateTime<Utc>> {
    (1_577_836_800i64..1_893_456_000i64)
        .prop_map(|ts| DateTime::from_timestamp(ts, 0).unwrap())
}

/// Generates a valid review quality in [1, 5]
pub fn arb_quality() -> impl Strategy<Value = i32> {
    1i32..=5
}

/// Generates a review quality outside [1, 5]
pub fn arb_invalid_quality() -> impl Strategy<Value = i32> {
    prop_oneof![
        i32::MIN..=0,
        6i32..=i32::MAX,
    ]
}

/// Generates strings made only of whitespace, including the empty string
pub fn arb_blank_string() -> impl Strategy<Value = String> {
    "[ \t\n\r]{0,8}"
}
