//! CLI argument definitions using clap
//!
//! Commands:
//! - pessoas serve [--config <path>] [overrides]
//! - pessoas config [--config <path>] [overrides]
//!
//! Every override can also come from the environment, which is how the
//! service is usually configured in containers.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::config::{CacheBackendKind, StorageBackendKind};

/// pessoas - person registry with cursor pagination
#[derive(Parser, Debug)]
#[command(name = "pessoas")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServiceArgs),

    /// Print the resolved configuration as JSON and exit
    Config(ServiceArgs),
}

/// Config file location plus per-field overrides
#[derive(Args, Debug, Clone, Default)]
pub struct ServiceArgs {
    /// Path to a JSON configuration file
    #[arg(long, env = "PESSOAS_CONFIG")]
    pub config: Option<PathBuf>,

    /// HTTP port
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Storage backend
    #[arg(long, value_enum, env = "STORAGE_BACKEND")]
    pub storage: Option<StorageBackendKind>,

    /// Postgres connection string
    #[arg(long, env = "DSN")]
    pub dsn: Option<String>,

    /// SQLite database file
    #[arg(long, env = "SQLITE_PATH")]
    pub sqlite_path: Option<String>,

    /// Cache backend
    #[arg(long, value_enum, env = "CACHE_BACKEND")]
    pub cache: Option<CacheBackendKind>,

    /// Redis address (host:port)
    #[arg(long, env = "REDIS_ADDRESS")]
    pub redis_address: Option<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
