//! Observability for the Activity Service.
//!
//! Provides metrics definitions and the tracing subscriber setup.

pub mod logging;
pub mod metrics;
