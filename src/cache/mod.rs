//! # Record cache
//!
//! Non-authoritative copy of person records keyed by uuid, holding the exact
//! JSON body served by `GET /pessoas/:id`. Entries never expire.
//!
//! [`RecordCache`] owns serialisation; a [`CacheBackend`] only stores
//! strings. Backends:
//!
//! - [`MemoryCache`]: in-process map
//! - [`RedisCache`]: shared Redis instance

mod errors;
mod memory;
mod redis_backend;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::person::Person;

pub use errors::{CacheError, CacheResult};
pub use memory::MemoryCache;
pub use redis_backend::RedisCache;

/// String key-value store behind the record cache.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    fn backend_name(&self) -> &'static str;

    /// Store `value` under `key` with no expiration.
    async fn set(&self, key: &str, value: String) -> CacheResult<()>;

    /// `Ok(None)` on a miss; `Err` only when the backend itself failed.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;
}

/// Serialising front used by the request path.
#[derive(Clone)]
pub struct RecordCache {
    backend: Arc<dyn CacheBackend>,
}

impl RecordCache {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    /// Cache backed by an in-process map.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCache::new()))
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    /// Store the JSON form of `person` under its uuid.
    pub async fn put(&self, person: &Person) -> CacheResult<String> {
        let body = serde_json::to_string(person)?;
        self.backend
            .set(&person.uuid.to_string(), body.clone())
            .await?;
        Ok(body)
    }

    /// Cached JSON body for `uid`, if present.
    pub async fn get(&self, uid: &Uuid) -> CacheResult<Option<String>> {
        self.backend.get(&uid.to_string()).await
    }
}
