//! Service layer for the Activity Service.
//!
//! # Components
//!
//! - `activity_directory` - In-memory catalog with signup and removal
//! - `seed` - Initial catalog loaded at startup

pub mod activity_directory;
pub mod seed;

pub use activity_directory::ActivityDirectory;
