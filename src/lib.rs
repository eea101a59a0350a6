//! pessoas - a person registry over HTTP
//!
//! Records are written to a relational store (Postgres or SQLite), mirrored
//! into a record cache (Redis or in-process) and listed through opaque
//! keyset cursors.

pub mod api;
pub mod cache;
pub mod cli;
pub mod http_server;
pub mod observability;
pub mod pagination;
pub mod person;
pub mod storage;
