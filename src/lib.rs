/// Flashcards: a deck/card study service
///
/// This library provides the core functionality of the flashcards service:
/// data models, database access, the due-card scheduling rules, and the
/// web API that ties them together.
///
/// ### Modules
///
/// - `config`: Layered configuration (defaults, config file, env, CLI)
/// - `db`: Database connection pool management
/// - `models`: Decks, cards and reviews
/// - `repo`: Repository layer for database operations
/// - `scheduling`: Review intervals and next-due card selection
/// - `validation`: Checks run on incoming entities before they are persisted
/// - `schema`: Database schema definitions
///
/// ### Web API
///
/// The library exposes a RESTful API using Axum with the following endpoints:
///
/// - `POST /decks`, `GET /decks`: Create and list decks
/// - `GET /decks/{id}`, `PUT /decks/{id}`, `DELETE /decks/{id}`: Manage a deck
/// - `POST /decks/{id}/cards`, `GET /decks/{id}/cards`: Create and list a deck's cards
/// - `GET /decks/{id}/cards/next`: Get the next card due for study
/// - `GET /cards/{id}`, `PUT /cards/{id}`, `DELETE /cards/{id}`: Manage a card
/// - `POST /cards/{id}/reviews`, `GET /cards/{id}/reviews`: Record and list reviews

/// Configuration module
pub mod config;

/// Database connection module
pub mod db;

/// Data transfer objects for request bodies
pub mod dto;

/// API error type and its HTTP mapping
pub mod errors;

/// Web API handlers
pub mod handlers;

/// Data models module
pub mod models;

/// Repository module for database operations
pub mod repo;

/// Database schema module
pub mod schema;

/// Review scheduling and due-card selection
pub mod scheduling;

/// Entity validation
pub mod validation;

#[cfg(test)]
pub mod test_utils;

pub use errors::ApiError;

use anyhow::{anyhow, Result};
use axum::{
    routing::{get, post},
    Router,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use handlers::*;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Migrations compiled into the binary from the `migrations` directory
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Creates the application router with all routes
///
/// This function sets up the Axum router with all the API endpoints.
/// Every request is wrapped in its own tracing span by the trace layer, so
/// handler logs are attributed to the request that produced them.
///
/// ### Arguments
///
/// * `pool` - The database connection pool to be shared with all handlers
///
/// ### Returns
///
/// An Axum Router configured with all routes and the database pool as state
pub fn create_app(pool: Arc<db::DbPool>) -> Router {
    Router::new()
        // Routes for creating and listing decks
        .route("/decks", post(create_deck_handler).get(list_decks_handler))
        // Routes for a specific deck
        .route(
            "/decks/{id}",
            get(get_deck_handler)
                .put(update_deck_handler)
                .delete(delete_deck_handler),
        )
        // Routes for creating and listing the cards of a deck
        .route(
            "/decks/{id}/cards",
            post(create_card_handler).get(list_cards_by_deck_handler),
        )
        // Route for the next card due for study
        .route("/decks/{id}/cards/next", get(get_next_due_card_handler))
        // Routes for a specific card
        .route(
            "/cards/{id}",
            get(get_card_handler)
                .put(update_card_handler)
                .delete(delete_card_handler),
        )
        // Routes for recording and listing reviews of a card
        .route(
            "/cards/{id}/reviews",
            post(create_review_handler).get(list_reviews_by_card_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        // Add the database pool to the application state
        .with_state(pool)
}

/// Runs all pending embedded migrations
///
/// ### Arguments
///
/// * `conn` - A mutable reference to a SQLite connection
///
/// ### Returns
///
/// The versions of the migrations that were applied, oldest first
pub fn run_migrations(conn: &mut diesel::SqliteConnection) -> Result<Vec<String>> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!("failed to run migrations: {}", e))?;

    Ok(applied.iter().map(|version| version.to_string()).collect())
}

/// Reverts every applied migration, dropping all tables
///
/// ### Arguments
///
/// * `conn` - A mutable reference to a SQLite connection
///
/// ### Returns
///
/// The versions of the migrations that were reverted, newest first
pub fn revert_migrations(conn: &mut diesel::SqliteConnection) -> Result<Vec<String>> {
    let reverted = conn
        .revert_all_migrations(MIGRATIONS)
        .map_err(|e| anyhow!("failed to revert migrations: {}", e))?;

    Ok(reverted.iter().map(|version| version.to_string()).collect())
}
