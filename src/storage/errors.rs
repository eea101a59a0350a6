//! Storage error types

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    /// No row for the requested uuid
    #[error("Person not found")]
    NotFound,

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Connection pool error: {0}")]
    Pool(String),

    /// A stored row could not be turned back into a person
    #[error("Invalid stored row: {0}")]
    Encoding(String),

    /// The blocking task running a SQLite call died
    #[error("Storage task failed: {0}")]
    Task(String),

    #[error("Storage connection lock poisoned")]
    Poisoned,

    /// The caller gave up before the call reached the connection
    #[error("Storage call abandoned by its caller")]
    Abandoned,
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound)
    }

    /// Stable error code for logs
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::NotFound => "STORAGE_NOT_FOUND",
            StorageError::Sqlite(_) => "STORAGE_SQLITE_ERROR",
            StorageError::Postgres(_) => "STORAGE_POSTGRES_ERROR",
            StorageError::Pool(_) => "STORAGE_POOL_ERROR",
            StorageError::Encoding(_) => "STORAGE_ENCODING_ERROR",
            StorageError::Task(_) => "STORAGE_TASK_FAILED",
            StorageError::Poisoned => "STORAGE_LOCK_POISONED",
            StorageError::Abandoned => "STORAGE_CALL_ABANDONED",
        }
    }
}

impl From<deadpool_postgres::PoolError> for StorageError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        StorageError::Pool(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Encoding(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinct() {
        assert!(StorageError::NotFound.is_not_found());
        assert!(!StorageError::Poisoned.is_not_found());
        assert_eq!(StorageError::NotFound.code(), "STORAGE_NOT_FOUND");
    }

    #[test]
    fn test_json_errors_are_encoding_errors() {
        let err = serde_json::from_str::<Vec<String>>("{").unwrap_err();
        let err = StorageError::from(err);
        assert_eq!(err.code(), "STORAGE_ENCODING_ERROR");
    }
}
