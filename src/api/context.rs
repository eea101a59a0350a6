//! Request context
//!
//! Built once by the process entry point and cloned into every handler.
//! Cloning only bumps reference counts.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::RecordCache;
use crate::storage::PersonStore;

use super::{ApiError, ApiResult};

/// Default time budget for one request's backend calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(2000);

#[derive(Clone)]
pub struct AppContext {
    store: Arc<dyn PersonStore>,
    cache: RecordCache,
    request_timeout: Duration,
}

impl AppContext {
    pub fn new(store: Arc<dyn PersonStore>, cache: RecordCache, request_timeout: Duration) -> Self {
        Self {
            store,
            cache,
            request_timeout,
        }
    }

    pub fn store(&self) -> &dyn PersonStore {
        self.store.as_ref()
    }

    pub fn cache(&self) -> &RecordCache {
        &self.cache
    }

    /// Deadline for a request starting now.
    pub fn deadline(&self) -> Deadline {
        Deadline::after(self.request_timeout)
    }

    /// Release the storage backend. Called once at shutdown.
    pub async fn close(&self) {
        self.store.close().await;
    }
}

/// Point in time after which a request stops waiting on backends.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
        }
    }

    /// Await `call`, giving up with [`ApiError::DeadlineExceeded`] once the
    /// deadline passes. `backend` names what was being waited on.
    pub async fn run<T, E, F>(&self, backend: &'static str, call: F) -> ApiResult<T>
    where
        F: Future<Output = Result<T, E>>,
        ApiError: From<E>,
    {
        match tokio::time::timeout_at(self.at, call).await {
            Ok(result) => result.map_err(ApiError::from),
            Err(_) => Err(ApiError::DeadlineExceeded(backend)),
        }
    }
}
