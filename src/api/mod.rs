//! # Request-path logic
//!
//! Everything between the HTTP routes and the storage/cache backends:
//!
//! - [`AppContext`]: the store and cache handles every handler receives
//! - [`Deadline`]: per-request bound applied to each backend call
//! - [`listing`]: builds one page of results with its navigation links
//! - [`ApiError`]: maps failures onto HTTP status codes

mod context;
mod errors;
pub mod listing;
mod response;

pub use context::{AppContext, Deadline, DEFAULT_REQUEST_TIMEOUT};
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use listing::{list_people, ListParams, PageLinks, PeoplePage};
pub use response::{CreatedResponse, HealthResponse};
