//! # Activity Test Utilities
//!
//! Shared test utilities for the Activity Service.
//!
//! This crate provides:
//! - Server test harness (`TestActivityServer` for E2E tests)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use activity_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let server = TestActivityServer::spawn().await?;
//!     let client = reqwest::Client::new();
//!
//!     let response = client
//!         .get(format!("{}/activities", server.url()))
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod server_harness;

// Re-export commonly used items
pub use server_harness::*;
