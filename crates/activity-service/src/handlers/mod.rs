//! HTTP request handlers for the Activity Service.

pub mod activities;
pub mod health;
pub mod metrics;

pub use activities::{
    get_activity_participants, list_activities, root_redirect, signup_for_activity,
    unsign_from_activity,
};
pub use health::health_check;
pub use metrics::metrics_handler;
