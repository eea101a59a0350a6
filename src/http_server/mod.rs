//! # HTTP Server Module
//!
//! Axum server exposing the person registry.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/pessoas` - Create and list persons
//! - `/pessoas/:id` - Fetch one person
//! - `/contagem-pessoas` - Total count

pub mod config;
pub mod observability_routes;
pub mod person_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use server::{shutdown_signal, HttpServer};
