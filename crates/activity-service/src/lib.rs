//! Activity Service Library
//!
//! Core functionality for the Mergington High School extracurricular
//! activity signup API:
//!
//! - Activity catalog listing and search
//! - Participant rosters per activity
//! - Student signup and removal with capacity enforcement
//!
//! # Architecture
//!
//! The service follows the Handler -> Service pattern. All state lives in
//! memory inside [`services::ActivityDirectory`]; there is no repository layer.
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> services/*.rs
//! ```
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - HTTP middleware (request metrics)
//! - `models` - Data models
//! - `observability` - Metrics definitions and logging setup
//! - `routes` - Axum router setup
//! - `services` - Activity directory

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod routes;
pub mod services;
