//! maildesk library entrypoint.
//!
//! Modules:
//! - `app`: startup, configuration, process wiring
//! - `db`: migrations and SQLite helpers
//! - `models`: typed records used across layers
//! - `provider`: mail provider abstraction and HTTP backend
//! - `sync`: incremental ingestion engine
//! - `attach`: attachment persistence
//! - `tasks`: task lifecycle state machine
//! - `scheduler`: periodic sync timer
//! - `queries`: read-side listings for the request layer
//! - `util`: tracing setup

pub mod app;
pub mod attach;
pub mod db;
pub mod error;
pub mod models;
pub mod provider;
pub mod queries;
pub mod scheduler;
pub mod sync;
pub mod tasks;
pub mod util;
