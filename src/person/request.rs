//! # New-person request
//!
//! Body of `POST /pessoas`. Accepts both the Portuguese field names used on
//! the wire (`nome`, `apelido`, `nascimento`) and their English aliases.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::Person;

/// Birth dates are calendar dates only.
pub const BIRTHDATE_FORMAT: &str = "%Y-%m-%d";

const MAX_NAME_LEN: usize = 100;
const MAX_NICKNAME_LEN: usize = 32;
const MAX_STACK_ENTRIES: usize = 5;
const MAX_STACK_ENTRY_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid birthdate")]
    InvalidBirthdate,

    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("stack must have at most {0} entries")]
    TooManyStackEntries(usize),

    #[error("stack entries must not be blank")]
    BlankStackEntry,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPersonRequest {
    #[serde(rename = "nome", alias = "name", default)]
    pub name: String,

    #[serde(rename = "apelido", alias = "nickname", default)]
    pub nickname: String,

    #[serde(rename = "nascimento", alias = "birthdate", default)]
    pub birthdate: String,

    #[serde(default)]
    pub stack: Option<Vec<String>>,
}

impl NewPersonRequest {
    /// Parse the birth date strictly as `YYYY-MM-DD`.
    pub fn parse_birthdate(&self) -> Result<NaiveDate, ValidationError> {
        NaiveDate::parse_from_str(&self.birthdate, BIRTHDATE_FORMAT)
            .map_err(|_| ValidationError::InvalidBirthdate)
    }

    /// Check field presence and lengths.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_text("nome", &self.name, MAX_NAME_LEN)?;
        check_text("apelido", &self.nickname, MAX_NICKNAME_LEN)?;

        if let Some(stack) = &self.stack {
            if stack.len() > MAX_STACK_ENTRIES {
                return Err(ValidationError::TooManyStackEntries(MAX_STACK_ENTRIES));
            }
            for entry in stack {
                if entry.trim().is_empty() {
                    return Err(ValidationError::BlankStackEntry);
                }
                if entry.chars().count() > MAX_STACK_ENTRY_LEN {
                    return Err(ValidationError::TooLong {
                        field: "stack",
                        max: MAX_STACK_ENTRY_LEN,
                    });
                }
            }
        }

        Ok(())
    }

    /// Validate and build the person to persist under `uuid`.
    pub fn into_person(self, uuid: Uuid) -> Result<Person, ValidationError> {
        let birthdate = self.parse_birthdate()?;
        self.validate()?;

        Ok(Person::new(
            uuid,
            self.name,
            self.nickname,
            birthdate,
            self.stack.unwrap_or_default(),
        ))
    }
}

fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}
