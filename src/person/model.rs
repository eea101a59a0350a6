//! # Person
//!
//! The stored record. `seq_id` and `created_at` are assigned by the storage
//! backend and only used for ordering and pagination; neither is part of the
//! JSON form.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Backend sequence id, 0 until persisted
    #[serde(skip)]
    pub seq_id: i64,

    pub uuid: Uuid,

    pub name: String,

    #[serde(rename = "apelido")]
    pub nickname: String,

    /// Serialised as `YYYY-MM-DD`
    #[serde(rename = "nascimento")]
    pub birthdate: NaiveDate,

    #[serde(default)]
    pub stack: Vec<String>,

    /// Backend clock at insert time, second precision
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

impl Person {
    /// A person that has not been persisted yet.
    pub fn new(
        uuid: Uuid,
        name: impl Into<String>,
        nickname: impl Into<String>,
        birthdate: NaiveDate,
        stack: Vec<String>,
    ) -> Self {
        Self {
            seq_id: 0,
            uuid,
            name: name.into(),
            nickname: nickname.into(),
            birthdate,
            stack,
            created_at: DateTime::<Utc>::default(),
        }
    }

    /// Epoch seconds of `created_at`.
    pub fn created_at_secs(&self) -> i64 {
        self.created_at.timestamp()
    }

    /// Path under which this person can be fetched.
    pub fn location(&self) -> String {
        format!("/pessoas/{}", self.uuid)
    }
}
