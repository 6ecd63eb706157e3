use anyhow::Context;
use clap::Parser;
use flashcards::config::{self, CliArgs};
use flashcards::{create_app, db, run_migrations};
use std::process;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the `--debug` default level. The returned
/// guard flushes the log file on drop and must live as long as the server.
fn init_tracing(args: &CliArgs) -> Option<WorkerGuard> {
    let default_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (json_layer, text_layer) = if args.log_json {
        (Some(fmt::layer().json()), None)
    } else {
        (None, Some(fmt::layer()))
    };

    let (file_layer, guard) = match &args.log_dir {
        Some(log_dir) => match std::fs::create_dir_all(log_dir) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::daily(log_dir, "flashcards.log");
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                let layer = fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!("Could not create log directory {:?}: {}", log_dir, e);
                (None, None)
            }
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .with(file_layer)
        .init();

    guard
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, finishing in-flight requests");
}

async fn run() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let args = CliArgs::parse();
    let _guard = init_tracing(&args);

    let config = config::get_config(&args);

    // Initialize the database pool
    let pool = db::init_pool_with_size(&config.database_url, config.pool_size)?;

    {
        let mut conn = pool.get().context("failed to get a database connection")?;
        let applied = run_migrations(&mut conn)?;
        if applied.is_empty() {
            info!("Database schema is up to date");
        } else {
            info!("Applied migrations: {}", applied.join(", "));
        }
    }

    let app = create_app(Arc::new(pool));

    let listener = TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr()))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
