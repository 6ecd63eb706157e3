use anyhow::{Context, Result};
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Number of pooled connections used when no size is configured
pub const DEFAULT_POOL_SIZE: u32 = 10;

/// Per-connection SQLite settings applied whenever the pool opens a connection
///
/// SQLite keeps `foreign_keys` off unless each connection turns it on, and the
/// cascading deletes of decks and cards depend on it.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionOptions {
    /// How long a connection waits on a locked database before failing
    pub busy_timeout_ms: u32,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self { busy_timeout_ms: 5_000 }
    }
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            self.busy_timeout_ms
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

static NEXT_MEMORY_DB: AtomicUsize = AtomicUsize::new(0);

/// Maps `:memory:` to a named shared-cache in-memory database
///
/// Every SQLite connection opened on `:memory:` gets its own empty database,
/// so a pool over it would hand out connections that cannot see each other's
/// tables. Each call yields a fresh name, so separate pools stay isolated.
fn resolve_database_url(database_url: &str) -> String {
    if database_url.trim() != ":memory:" {
        return database_url.to_string();
    }

    let resolved = format!(
        "file:flashcards_mem_{}_{}?mode=memory&cache=shared",
        std::process::id(),
        NEXT_MEMORY_DB.fetch_add(1, Ordering::Relaxed)
    );
    debug!("Using shared in-memory database {}", resolved);
    resolved
}

/// Creates a connection pool with the default size
pub fn init_pool(database_url: &str) -> Result<DbPool> {
    init_pool_with_size(database_url, DEFAULT_POOL_SIZE)
}

/// Creates a connection pool holding at most `max_size` connections
pub fn init_pool_with_size(database_url: &str, max_size: u32) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(resolve_database_url(database_url));
    Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(ConnectionOptions::default()))
        .build(manager)
        .with_context(|| format!("failed to create connection pool for {}", database_url))
}
