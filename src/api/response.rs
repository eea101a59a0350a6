//! Response bodies other than person records and pages.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `201 Created` for a new person
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub uuid: Uuid,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
