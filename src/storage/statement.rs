//! # Statement builder
//!
//! All SQL issued by the storage backends. A [`ListQuery`] is translated
//! here once; the dialect only decides placeholder syntax, the
//! case-insensitive match operator and how "now" is read from the backend
//! clock.

use crate::pagination::ListQuery;

/// Column order shared by every SELECT and by row decoding.
pub const PERSON_COLUMNS: &str = "id, uuid, name, nickname, birthdate, stack, created_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    /// Numbered placeholder for the `n`th (1-based) parameter.
    pub fn placeholder(&self, n: usize) -> String {
        match self {
            Dialect::Postgres => format!("${n}"),
            Dialect::Sqlite => format!("?{n}"),
        }
    }

    /// Case-insensitive pattern operator. SQLite's LIKE only folds ASCII.
    pub fn like_operator(&self) -> &'static str {
        match self {
            Dialect::Postgres => "ILIKE",
            Dialect::Sqlite => "LIKE",
        }
    }

    /// Current backend time as whole epoch seconds.
    pub fn now_epoch_secs(&self) -> &'static str {
        match self {
            Dialect::Postgres => "FLOOR(EXTRACT(EPOCH FROM now()))::BIGINT",
            Dialect::Sqlite => "CAST(strftime('%s', 'now') AS INTEGER)",
        }
    }
}

/// A bound value of a listing statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Integer(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl Statement {
    fn bind(&mut self, dialect: Dialect, param: SqlParam) -> String {
        self.params.push(param);
        dialect.placeholder(self.params.len())
    }
}

/// SELECT for one listing page.
pub fn list(dialect: Dialect, query: &ListQuery) -> Statement {
    let mut stmt = Statement {
        sql: format!("SELECT {PERSON_COLUMNS} FROM people"),
        params: Vec::new(),
    };
    let mut clauses = Vec::new();

    if let Some(term) = &query.search {
        let pattern = stmt.bind(dialect, SqlParam::Text(term.like_pattern()));
        let op = dialect.like_operator();
        clauses.push(format!(
            "(name {op} {pattern} ESCAPE '\\' OR nickname {op} {pattern} ESCAPE '\\')"
        ));
    }

    if let Some(after) = query.after {
        let id = stmt.bind(dialect, SqlParam::Integer(after.sequence_id));
        let created_at = stmt.bind(dialect, SqlParam::Integer(after.created_at));
        clauses.push(format!("(id > {id} AND created_at >= {created_at})"));
    }

    if !clauses.is_empty() {
        stmt.sql.push_str(" WHERE ");
        stmt.sql.push_str(&clauses.join(" AND "));
    }

    stmt.sql.push_str(&format!(" ORDER BY id ASC LIMIT {}", query.limit));
    stmt
}

/// INSERT binding uuid, name, nickname, birthdate, stack; returns the id.
pub fn insert(dialect: Dialect) -> String {
    let p: Vec<String> = (1..=5).map(|n| dialect.placeholder(n)).collect();
    format!(
        "INSERT INTO people (uuid, name, nickname, birthdate, stack, created_at) \
         VALUES ({}, {}, {}, {}, {}, {}) RETURNING id",
        p[0],
        p[1],
        p[2],
        p[3],
        p[4],
        dialect.now_epoch_secs()
    )
}

/// Point lookup binding the uuid.
pub fn select_by_uuid(dialect: Dialect) -> String {
    format!(
        "SELECT {PERSON_COLUMNS} FROM people WHERE uuid = {}",
        dialect.placeholder(1)
    )
}

pub fn count() -> &'static str {
    "SELECT COUNT(*) FROM people"
}

/// Idempotent table and index creation.
pub fn schema(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::Postgres => {
            "CREATE TABLE IF NOT EXISTS people (
                id BIGSERIAL PRIMARY KEY,
                uuid UUID NOT NULL UNIQUE,
                name VARCHAR(100) NOT NULL,
                nickname VARCHAR(32) NOT NULL,
                birthdate DATE NOT NULL,
                stack TEXT[] NOT NULL DEFAULT '{}',
                created_at BIGINT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_people_name ON people (name);
            CREATE INDEX IF NOT EXISTS idx_people_nickname ON people (nickname);
            CREATE INDEX IF NOT EXISTS idx_people_created_at ON people (created_at);"
        }
        Dialect::Sqlite => {
            "CREATE TABLE IF NOT EXISTS people (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                uuid TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                nickname TEXT NOT NULL,
                birthdate TEXT NOT NULL,
                stack TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_people_name ON people (name);
            CREATE INDEX IF NOT EXISTS idx_people_nickname ON people (nickname);
            CREATE INDEX IF NOT EXISTS idx_people_created_at ON people (created_at);"
        }
    }
}
