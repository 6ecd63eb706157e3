use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::db::DEFAULT_POOL_SIZE;

/// Name of the database file used when none is configured
pub const DEFAULT_DATABASE_FILE: &str = "flashcards.db";

/// Name of the optional config file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration for the flashcards server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// URL (file path or SQLite URI) for the database connection
    pub database_url: String,
    /// Address the HTTP server binds to
    pub host: String,
    /// Port the HTTP server listens on
    pub port: u16,
    /// Maximum number of pooled database connections
    pub pool_size: u32,
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub pool_size: Option<u32>,
}

/// Command line arguments for the server
///
/// Every option can also be given through its environment variable,
/// including from a `.env` file.
#[derive(Parser, Debug, Default)]
#[clap(name = "flashcards", about = "A flashcard study service")]
pub struct CliArgs {
    /// Database URL
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Address to bind the HTTP server to
    #[clap(long, env = "SERVER_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[clap(long, env = "SERVER_PORT")]
    pub port: Option<u16>,

    /// Maximum number of database connections
    #[clap(long, env = "DB_POOL_SIZE")]
    pub pool_size: Option<u32>,

    /// Directory for daily rolling log files
    #[clap(long, env = "FLASHCARDS_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Debug mode
    #[clap(long, env = "FLASHCARDS_DEBUG", default_value_t = false)]
    pub debug: bool,

    /// Emit logs as JSON lines
    #[clap(long, env = "FLASHCARDS_LOG_JSON", default_value_t = false)]
    pub log_json: bool,
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            host: update.host.unwrap_or(self.host),
            port: update.port.unwrap_or(self.port),
            pool_size: update.pool_size.unwrap_or(self.pool_size),
        }
    }

    /// Returns the `host:port` address the server listens on
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Returns the base (default) configuration
///
/// When a config directory is given the database file lives inside it,
/// otherwise in the working directory.
pub fn base_config(config_path: Option<PathBuf>) -> Config {
    let database_url = config_path.map_or(DEFAULT_DATABASE_FILE.to_string(), |path| {
        path.join(DEFAULT_DATABASE_FILE).to_string_lossy().to_string()
    });

    Config {
        database_url,
        host: "0.0.0.0".to_string(),
        port: 8080,
        pool_size: DEFAULT_POOL_SIZE,
    }
}

/// Loads configuration from a TOML file
///
/// A missing path or file yields an empty update.
pub fn config_from_file(config_file: Option<PathBuf>) -> Result<ConfigUpdate> {
    let Some(config_file) = config_file else {
        return Ok(ConfigUpdate::default());
    };

    if !config_file.exists() {
        info!("Config file not found at {:?}, using defaults", config_file);
        return Ok(ConfigUpdate::default());
    }

    let content = fs::read_to_string(&config_file)
        .with_context(|| format!("failed to read config file {:?}", config_file))?;
    let update = toml::from_str::<ConfigUpdate>(&content)
        .with_context(|| format!("failed to parse config file {:?}", config_file))?;

    info!("Loaded configuration from {:?}", config_file);

    Ok(update)
}

/// Loads configuration from command line arguments and environment variables
pub fn config_from_args(args: &CliArgs) -> ConfigUpdate {
    ConfigUpdate {
        database_url: args.database_url.clone(),
        host: args.host.clone(),
        port: args.port,
        pool_size: args.pool_size,
    }
}

/// Returns the XDG config directory for the service, if it exists
pub fn get_config_dir_path() -> Option<PathBuf> {
    let Some(proj_dirs) = ProjectDirs::from("com", "flashcards", "flashcards") else {
        warn!("Could not determine XDG config directory, skipping config file");
        return None;
    };

    let path = proj_dirs.config_dir().to_path_buf();
    if !path.exists() {
        info!("Config path not found at {:?}, using defaults", path);
        return None;
    }

    Some(path)
}

/// Gets the complete configuration by combining defaults with
/// values from config file, environment variables, and command line arguments
/// in order of increasing precedence
///
/// An unreadable or malformed config file is logged and skipped.
pub fn get_config(args: &CliArgs) -> Config {
    let config_dir = get_config_dir_path();
    let config_file = config_dir.as_ref().map(|dir| dir.join(CONFIG_FILE_NAME));

    let file_update = config_from_file(config_file).unwrap_or_else(|e| {
        warn!("Ignoring config file: {:#}", e);
        ConfigUpdate::default()
    });

    // Apply updates in order of increasing precedence
    let config = base_config(config_dir)
        .apply_update(file_update)
        .apply_update(config_from_args(args));

    info!(
        "Final configuration: database_url={}, listen_addr={}, pool_size={}",
        config.database_url,
        config.listen_addr(),
        config.pool_size
    );

    config
}
