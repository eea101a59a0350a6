//! SQLite storage backend
//!
//! One connection behind a mutex. rusqlite is blocking, so every call runs
//! on tokio's blocking pool and the request task only awaits the result.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::ToSqlOutput;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, ToSql};
use uuid::Uuid;

use crate::pagination::ListQuery;
use crate::person::{Person, BIRTHDATE_FORMAT};

use super::statement::{self, Dialect, SqlParam};
use super::{PersonStore, StorageError, StorageResult};

const DIALECT: Dialect = Dialect::Sqlite;

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a database file and bootstrap the schema.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::with_connection(conn)
    }

    /// Private in-memory database (for testing).
    pub fn in_memory() -> StorageResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch(statement::schema(DIALECT))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn run<T, F>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Connection) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let abandoned = Arc::new(AtomicBool::new(false));
        let _caller = AbandonOnDrop(Arc::clone(&abandoned));

        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StorageError::Poisoned)?;
            // The caller stopped waiting while this call sat on the lock
            if abandoned.load(Ordering::Acquire) {
                return Err(StorageError::Abandoned);
            }
            f(&guard)
        })
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
    }
}

/// Marks a queued blocking call as abandoned once its caller goes away.
struct AbandonOnDrop(Arc<AtomicBool>);

impl Drop for AbandonOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            SqlParam::Text(text) => text.to_sql(),
            SqlParam::Integer(value) => value.to_sql(),
        }
    }
}

/// Raw column values in [`statement::PERSON_COLUMNS`] order.
struct PersonRow {
    id: i64,
    uuid: String,
    name: String,
    nickname: String,
    birthdate: String,
    stack: String,
    created_at: i64,
}

impl PersonRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            uuid: row.get(1)?,
            name: row.get(2)?,
            nickname: row.get(3)?,
            birthdate: row.get(4)?,
            stack: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn into_person(self) -> StorageResult<Person> {
        let uuid = Uuid::parse_str(&self.uuid)
            .map_err(|e| StorageError::Encoding(format!("uuid {}: {}", self.uuid, e)))?;
        let birthdate = NaiveDate::parse_from_str(&self.birthdate, BIRTHDATE_FORMAT)
            .map_err(|e| StorageError::Encoding(format!("birthdate {}: {}", self.birthdate, e)))?;
        let created_at = DateTime::<Utc>::from_timestamp(self.created_at, 0)
            .ok_or_else(|| StorageError::Encoding(format!("created_at {}", self.created_at)))?;

        Ok(Person {
            seq_id: self.id,
            uuid,
            name: self.name,
            nickname: self.nickname,
            birthdate,
            stack: serde_json::from_str(&self.stack)?,
            created_at,
        })
    }
}

#[async_trait]
impl PersonStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn create(&self, person: &Person) -> StorageResult<i64> {
        let uuid = person.uuid.to_string();
        let name = person.name.clone();
        let nickname = person.nickname.clone();
        let birthdate = person.birthdate.format(BIRTHDATE_FORMAT).to_string();
        let stack = serde_json::to_string(&person.stack)?;

        self.run(move |conn| {
            let id = conn.query_row(
                &statement::insert(DIALECT),
                params![uuid, name, nickname, birthdate, stack],
                |row| row.get(0),
            )?;
            Ok(id)
        })
        .await
    }

    async fn get_by_uid(&self, uid: &Uuid) -> StorageResult<Person> {
        let uid = uid.to_string();
        self.run(move |conn| {
            conn.query_row(&statement::select_by_uuid(DIALECT), [uid], PersonRow::read)
                .optional()?
                .ok_or(StorageError::NotFound)?
                .into_person()
        })
        .await
    }

    async fn list(&self, query: &ListQuery) -> StorageResult<Vec<Person>> {
        let stmt = statement::list(DIALECT, query);
        self.run(move |conn| {
            let mut prepared = conn.prepare(&stmt.sql)?;
            let rows = prepared
                .query_map(params_from_iter(stmt.params.iter()), PersonRow::read)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows.into_iter().map(PersonRow::into_person).collect()
        })
        .await
    }

    async fn count(&self) -> StorageResult<i64> {
        self.run(|conn| Ok(conn.query_row(statement::count(), [], |row| row.get(0))?))
            .await
    }
}
