//! Service configuration
//!
//! Resolution order: built-in defaults, then the JSON file given with
//! `--config` (if any), then CLI flags / environment variables. The result
//! is validated before anything is opened.

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::http_server::HttpServerConfig;
use crate::storage::DEFAULT_MAX_CONNECTIONS;

use super::args::ServiceArgs;
use super::errors::{CliError, CliResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendKind {
    Postgres,
    Sqlite,
}

impl StorageBackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackendKind::Postgres => "postgres",
            StorageBackendKind::Sqlite => "sqlite",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    Redis,
    Memory,
}

impl CacheBackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheBackendKind::Redis => "redis",
            CacheBackendKind::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_backend")]
    pub backend: StorageBackendKind,

    /// Postgres connection string (required for postgres)
    #[serde(default)]
    pub dsn: Option<String>,

    /// Postgres pool size (default: 30)
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// SQLite database file (default: ./people.db)
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,
}

fn default_storage_backend() -> StorageBackendKind {
    StorageBackendKind::Postgres
}

fn default_max_connections() -> usize {
    DEFAULT_MAX_CONNECTIONS
}

fn default_sqlite_path() -> String {
    "./people.db".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            dsn: None,
            max_connections: default_max_connections(),
            sqlite_path: default_sqlite_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_backend")]
    pub backend: CacheBackendKind,

    /// Redis address (required for redis)
    #[serde(default)]
    pub redis_address: Option<String>,
}

fn default_cache_backend() -> CacheBackendKind {
    CacheBackendKind::Redis
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: default_cache_backend(),
            redis_address: None,
        }
    }
}

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
    }

    /// File (if any) plus overrides, validated.
    pub fn resolve(args: &ServiceArgs) -> CliResult<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_overrides(args);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, args: &ServiceArgs) {
        if let Some(port) = args.port {
            self.http.port = port;
        }
        if let Some(backend) = args.storage {
            self.storage.backend = backend;
        }
        if let Some(dsn) = &args.dsn {
            self.storage.dsn = Some(dsn.clone());
        }
        if let Some(path) = &args.sqlite_path {
            self.storage.sqlite_path = path.clone();
        }
        if let Some(backend) = args.cache {
            self.cache.backend = backend;
        }
        if let Some(address) = &args.redis_address {
            self.cache.redis_address = Some(address.clone());
        }
    }

    fn validate(&self) -> CliResult<()> {
        if self.http.request_timeout_ms == 0 {
            return Err(CliError::config_error("http.request_timeout_ms must be > 0"));
        }

        match self.storage.backend {
            StorageBackendKind::Postgres => {
                if is_blank(&self.storage.dsn) {
                    return Err(CliError::config_error(
                        "DSN must be set for the postgres storage backend",
                    ));
                }
                if self.storage.max_connections == 0 {
                    return Err(CliError::config_error("storage.max_connections must be > 0"));
                }
            }
            StorageBackendKind::Sqlite => {
                if self.storage.sqlite_path.trim().is_empty() {
                    return Err(CliError::config_error("storage.sqlite_path must not be empty"));
                }
            }
        }

        if self.cache.backend == CacheBackendKind::Redis && is_blank(&self.cache.redis_address) {
            return Err(CliError::config_error(
                "REDIS_ADDRESS must be set for the redis cache backend",
            ));
        }

        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or("").is_empty()
}
