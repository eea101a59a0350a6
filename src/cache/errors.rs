//! Cache error types

use thiserror::Error;

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache lock poisoned")]
    Poisoned,
}

impl CacheError {
    /// Stable error code for logs
    pub fn code(&self) -> &'static str {
        match self {
            CacheError::Redis(_) => "CACHE_REDIS_ERROR",
            CacheError::Serialization(_) => "CACHE_SERIALIZATION_ERROR",
            CacheError::Poisoned => "CACHE_LOCK_POISONED",
        }
    }
}
