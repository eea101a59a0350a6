//! Postgres storage backend
//!
//! Pooled `tokio-postgres` connections. The pool size bounds how many
//! statements run concurrently; requests beyond it wait for a connection.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use deadpool_postgres::{Config, Pool, PoolConfig, Runtime};
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row};
use uuid::Uuid;

use crate::pagination::ListQuery;
use crate::person::Person;

use super::statement::{self, Dialect, SqlParam};
use super::{PersonStore, StorageError, StorageResult};

const DIALECT: Dialect = Dialect::Postgres;

/// Default upper bound on pooled connections.
pub const DEFAULT_MAX_CONNECTIONS: usize = 30;

pub struct PostgresStore {
    pool: Pool,
}

impl PostgresStore {
    /// Build the pool for `dsn` and bootstrap the schema.
    pub async fn connect(dsn: &str, max_connections: usize) -> StorageResult<Self> {
        let mut config = Config::new();
        config.url = Some(dsn.to_string());
        config.pool = Some(PoolConfig::new(max_connections));

        let pool = config
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| StorageError::Pool(e.to_string()))?;

        let client = pool.get().await?;
        client.batch_execute(statement::schema(DIALECT)).await?;

        Ok(Self { pool })
    }
}

fn bind(param: &SqlParam) -> &(dyn ToSql + Sync) {
    match param {
        SqlParam::Text(text) => text,
        SqlParam::Integer(value) => value,
    }
}

fn person_from_row(row: &Row) -> StorageResult<Person> {
    let created_at: i64 = row.try_get(6)?;
    let created_at = DateTime::<Utc>::from_timestamp(created_at, 0)
        .ok_or_else(|| StorageError::Encoding(format!("created_at {created_at}")))?;
    let birthdate: NaiveDate = row.try_get(4)?;

    Ok(Person {
        seq_id: row.try_get(0)?,
        uuid: row.try_get(1)?,
        name: row.try_get(2)?,
        nickname: row.try_get(3)?,
        birthdate,
        stack: row.try_get(5)?,
        created_at,
    })
}

#[async_trait]
impl PersonStore for PostgresStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn create(&self, person: &Person) -> StorageResult<i64> {
        let sql = statement::insert(DIALECT);
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                sql.as_str(),
                &[
                    &person.uuid,
                    &person.name,
                    &person.nickname,
                    &person.birthdate,
                    &person.stack,
                ],
            )
            .await?;
        Ok(row.try_get(0)?)
    }

    async fn get_by_uid(&self, uid: &Uuid) -> StorageResult<Person> {
        let sql = statement::select_by_uuid(DIALECT);
        let client = self.pool.get().await?;
        let row = client
            .query_opt(sql.as_str(), &[uid])
            .await?
            .ok_or(StorageError::NotFound)?;
        person_from_row(&row)
    }

    async fn list(&self, query: &ListQuery) -> StorageResult<Vec<Person>> {
        let stmt = statement::list(DIALECT, query);
        let params: Vec<&(dyn ToSql + Sync)> = stmt.params.iter().map(bind).collect();

        let client = self.pool.get().await?;
        let rows = client.query(stmt.sql.as_str(), &params).await?;
        rows.iter().map(person_from_row).collect()
    }

    async fn count(&self) -> StorageResult<i64> {
        let client = self.pool.get().await?;
        let row = client.query_one(statement::count(), &[]).await?;
        Ok(row.try_get(0)?)
    }

    async fn close(&self) {
        self.pool.close();
    }
}
