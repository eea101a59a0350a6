//! CLI command implementations
//!
//! `serve` owns the lifecycle of the backend handles: it opens them before
//! the listener is bound and closes them after the last request finished.

use std::sync::Arc;

use crate::api::AppContext;
use crate::cache::{RecordCache, RedisCache};
use crate::http_server::{shutdown_signal, HttpServer};
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::storage::{PersonStore, PostgresStore, SqliteStore};

use super::args::{Command, ServiceArgs};
use super::config::{CacheBackendKind, CacheConfig, Config, StorageBackendKind, StorageConfig};
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve(args) => serve(&args),
        Command::Config(args) => print_config(&args),
    }
}

/// Print the resolved configuration
pub fn print_config(args: &ServiceArgs) -> CliResult<()> {
    let config = Config::resolve(args)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Open the backends and serve HTTP until a shutdown signal arrives
pub fn serve(args: &ServiceArgs) -> CliResult<()> {
    log_event(Event::BootStart);

    let config = Config::resolve(args)?;
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("cache", config.cache.backend.as_str()),
            ("storage", config.storage.backend.as_str()),
        ],
    );

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async move {
        let ctx = match build_context(&config).await {
            Ok(ctx) => ctx,
            Err(e) => {
                log_event_with_fields(Event::BootFailed, &[("error", e.message())]);
                return Err(e);
            }
        };
        let server = HttpServer::new(ctx.clone(), config.http.clone());

        let result = server
            .start(async {
                shutdown_signal().await;
                log_event(Event::ShutdownStart);
            })
            .await;

        ctx.close().await;
        log_event(Event::ShutdownComplete);

        result.map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Open store and cache as configured.
pub async fn build_context(config: &Config) -> CliResult<AppContext> {
    let store = open_store(&config.storage).await?;
    log_event_with_fields(Event::StoreOpened, &[("backend", store.backend_name())]);

    let cache = open_cache(&config.cache).await?;
    log_event_with_fields(Event::CacheOpened, &[("backend", cache.backend_name())]);

    Ok(AppContext::new(store, cache, config.http.request_timeout()))
}

async fn open_store(config: &StorageConfig) -> CliResult<Arc<dyn PersonStore>> {
    let store: Arc<dyn PersonStore> = match config.backend {
        StorageBackendKind::Postgres => {
            let dsn = config
                .dsn
                .as_deref()
                .ok_or_else(|| CliError::config_error("DSN is not set"))?;
            let store = PostgresStore::connect(dsn, config.max_connections)
                .await
                .map_err(|e| CliError::boot_failed(format!("Failed to open postgres: {}", e)))?;
            Arc::new(store)
        }
        StorageBackendKind::Sqlite => {
            let store = SqliteStore::open(&config.sqlite_path)
                .map_err(|e| CliError::boot_failed(format!("Failed to open sqlite: {}", e)))?;
            Arc::new(store)
        }
    };
    Ok(store)
}

async fn open_cache(config: &CacheConfig) -> CliResult<RecordCache> {
    match config.backend {
        CacheBackendKind::Redis => {
            let address = config
                .redis_address
                .as_deref()
                .ok_or_else(|| CliError::config_error("REDIS_ADDRESS is not set"))?;
            let cache = RedisCache::connect(address)
                .await
                .map_err(|e| CliError::boot_failed(format!("Failed to connect to redis: {}", e)))?;
            Ok(RecordCache::new(Arc::new(cache)))
        }
        CacheBackendKind::Memory => Ok(RecordCache::in_memory()),
    }
}
