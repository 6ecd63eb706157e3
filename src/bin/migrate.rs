use anyhow::Context;
use clap::{Parser, Subcommand};
use flashcards::config::{self, CliArgs};
use flashcards::{db, revert_migrations, run_migrations};
use std::process;

/// Applies or reverts the flashcards database schema
#[derive(Parser, Debug)]
#[clap(name = "flashcards-migrate", about = "Manage the flashcards database schema")]
struct Cli {
    /// Database URL; falls back to the server's configuration
    #[clap(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply all pending migrations
    Up,
    /// Revert all applied migrations, dropping every table
    Down,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::get_config(&CliArgs {
        database_url: cli.database_url,
        ..Default::default()
    });

    let pool = db::init_pool_with_size(&config.database_url, 1)?;
    let mut conn = pool.get().context("failed to get a database connection")?;

    match cli.command {
        Commands::Up => {
            let applied = run_migrations(&mut conn)?;
            if applied.is_empty() {
                println!("No pending migrations");
            }
            for version in &applied {
                println!("Applied {}", version);
            }
            println!("Migrations applied to {}", config.database_url);
        }
        Commands::Down => {
            let reverted = revert_migrations(&mut conn)?;
            for version in &reverted {
                println!("Reverted {}", version);
            }
            println!("Migrations reverted on {}", config.database_url);
        }
    }

    Ok(())
}

fn main() {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
