//! CLI module
//!
//! - serve: open storage and cache, then serve HTTP
//! - config: print the resolved configuration

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command, ServiceArgs};
pub use commands::{build_context, print_config, run, run_command, serve};
pub use config::{CacheBackendKind, CacheConfig, Config, StorageBackendKind, StorageConfig};
pub use errors::{CliError, CliErrorCode, CliResult};
