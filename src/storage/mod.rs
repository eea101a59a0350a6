//! # Storage
//!
//! Source of truth for person records.
//!
//! Two interchangeable backends implement [`PersonStore`]:
//!
//! - [`SqliteStore`]: embedded, one connection, calls run on the blocking pool
//! - [`PostgresStore`]: pooled `tokio-postgres` connections
//!
//! Both get every SQL string from [`statement`], so filtering, ordering and
//! case folding cannot drift apart between them.

mod errors;
mod postgres;
mod sqlite;
pub mod statement;

use async_trait::async_trait;
use uuid::Uuid;

use crate::pagination::ListQuery;
use crate::person::Person;

pub use errors::{StorageError, StorageResult};
pub use postgres::{PostgresStore, DEFAULT_MAX_CONNECTIONS};
pub use sqlite::SqliteStore;

/// Operations every storage backend provides.
#[async_trait]
pub trait PersonStore: Send + Sync {
    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;

    /// Insert `person`, stamping `created_at` from the backend clock.
    ///
    /// Returns the generated sequence id. The uuid is taken from `person`.
    async fn create(&self, person: &Person) -> StorageResult<i64>;

    /// Fetch by uuid, [`StorageError::NotFound`] when no row matches.
    async fn get_by_uid(&self, uid: &Uuid) -> StorageResult<Person>;

    /// Run a listing query. An empty result is not an error.
    async fn list(&self, query: &ListQuery) -> StorageResult<Vec<Person>>;

    /// Total number of stored persons.
    async fn count(&self) -> StorageResult<i64>;

    /// Release backend resources.
    async fn close(&self) {}
}
