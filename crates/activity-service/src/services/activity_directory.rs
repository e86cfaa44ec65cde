//! Activity Directory Service.
//!
//! Owns the in-memory activity catalog and implements listing, roster
//! lookup, signup and removal.
//!
//! # Concurrency
//!
//! The catalog sits behind a single `RwLock`. Reads share the lock; signup
//! and removal run their whole validate-check-mutate sequence under the
//! write guard, so two concurrent signups can never push an activity past
//! `max_participants`.

use crate::errors::ActivityError;
use crate::models::{Catalog, EnrollmentResponse, ParticipantsResponse};
use crate::observability::metrics::record_enrollment;
use crate::services::seed::seed_catalog;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::sync::RwLock;
use tracing::instrument;

/// Domain every participant email must belong to.
pub const SCHOOL_EMAIL_DOMAIN: &str = "mergington.edu";

#[allow(clippy::expect_used)] // Constant pattern.
static SCHOOL_EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@mergington\.edu$").expect("school email pattern is valid")
});

/// Trim and lowercase an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Whether `email` is a well-formed school address.
///
/// Expects an already normalized value.
pub fn is_school_email(email: &str) -> bool {
    SCHOOL_EMAIL_PATTERN.is_match(email)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate the shared request fields and return the normalized email.
fn validate_enrollment_input(
    activity_name: &str,
    email: Option<&str>,
) -> Result<String, ActivityError> {
    if is_blank(activity_name) {
        return Err(ActivityError::InvalidArgument(
            "Activity name is required".to_string(),
        ));
    }

    match email {
        Some(email) if !is_blank(email) => Ok(normalize_email(email)),
        _ => Err(ActivityError::InvalidArgument(
            "Email is required".to_string(),
        )),
    }
}

fn activity_not_found() -> ActivityError {
    ActivityError::NotFound("Activity not found".to_string())
}

fn outcome_label(result: &Result<EnrollmentResponse, ActivityError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(e) => e.kind(),
    }
}

/// In-memory activity catalog.
///
/// Constructed once at startup and shared with handlers through
/// `AppState`. Nothing else mutates the catalog.
#[derive(Debug)]
pub struct ActivityDirectory {
    activities: RwLock<Catalog>,
}

impl Default for ActivityDirectory {
    fn default() -> Self {
        Self::seeded()
    }
}

impl ActivityDirectory {
    /// Create a directory over the given catalog.
    pub fn new(activities: Catalog) -> Self {
        Self {
            activities: RwLock::new(activities),
        }
    }

    /// Create a directory holding the initial school catalog.
    pub fn seeded() -> Self {
        Self::new(seed_catalog())
    }

    /// List activities, optionally filtered by `search`.
    ///
    /// A non-empty `search` keeps activities whose name or description
    /// contains it, ignoring case. An empty result is valid. Catalog order
    /// is kept.
    #[instrument(skip(self))]
    pub async fn list(&self, search: Option<&str>) -> Catalog {
        let activities = self.activities.read().await;

        match search.filter(|s| !s.is_empty()) {
            Some(search) => {
                let needle = search.to_lowercase();
                activities
                    .iter()
                    .filter(|(name, activity)| {
                        name.to_lowercase().contains(&needle)
                            || activity.description.to_lowercase().contains(&needle)
                    })
                    .map(|(name, activity)| (name.to_string(), activity.clone()))
                    .collect()
            }
            None => activities.clone(),
        }
    }

    /// Roster of a single activity.
    ///
    /// # Errors
    ///
    /// - `ActivityError::NotFound` - Unknown activity
    #[instrument(skip(self))]
    pub async fn get_participants(
        &self,
        activity_name: &str,
    ) -> Result<ParticipantsResponse, ActivityError> {
        let activities = self.activities.read().await;
        let activity = activities
            .get(activity_name)
            .ok_or_else(activity_not_found)?;

        Ok(ParticipantsResponse {
            activity: activity_name.to_string(),
            participants: activity.participants.as_slice().to_vec(),
            count: activity.participant_count(),
            max_participants: activity.max_participants,
        })
    }

    /// Sign a student up for an activity.
    ///
    /// Checks run in this order: blank name or email, unknown activity,
    /// email pattern, duplicate signup, capacity.
    ///
    /// # Errors
    ///
    /// - `ActivityError::InvalidArgument` - Blank input, non-school email,
    ///   already signed up, or activity full
    /// - `ActivityError::NotFound` - Unknown activity
    #[instrument(skip(self, email))]
    pub async fn signup(
        &self,
        activity_name: &str,
        email: Option<&str>,
    ) -> Result<EnrollmentResponse, ActivityError> {
        let result = self.signup_inner(activity_name, email).await;
        record_enrollment("signup", outcome_label(&result));
        result
    }

    async fn signup_inner(
        &self,
        activity_name: &str,
        email: Option<&str>,
    ) -> Result<EnrollmentResponse, ActivityError> {
        let email = validate_enrollment_input(activity_name, email)?;

        let mut activities = self.activities.write().await;
        let activity = activities
            .get_mut(activity_name)
            .ok_or_else(activity_not_found)?;

        if !is_school_email(&email) {
            return Err(ActivityError::InvalidArgument(format!(
                "Invalid email. Must be a @{} email address",
                SCHOOL_EMAIL_DOMAIN
            )));
        }

        if activity.participants.contains(&email) {
            return Err(ActivityError::InvalidArgument(
                "Already signed up for this activity".to_string(),
            ));
        }

        if activity.is_full() {
            tracing::debug!(
                target: "activity.service.directory",
                activity = %activity_name,
                max_participants = activity.max_participants,
                "Signup rejected, activity is full"
            );
            return Err(ActivityError::InvalidArgument(
                "Activity is full".to_string(),
            ));
        }

        activity.participants.insert(email.clone());
        let spots_left = activity.spots_left();

        tracing::info!(
            target: "activity.service.directory",
            activity = %activity_name,
            spots_left,
            "Student signed up"
        );

        Ok(EnrollmentResponse {
            message: format!("Successfully signed up {} for {}", email, activity_name),
            spots_left,
        })
    }

    /// Remove a student from an activity.
    ///
    /// # Errors
    ///
    /// - `ActivityError::InvalidArgument` - Blank input or not signed up
    /// - `ActivityError::NotFound` - Unknown activity
    #[instrument(skip(self, email))]
    pub async fn unsign(
        &self,
        activity_name: &str,
        email: Option<&str>,
    ) -> Result<EnrollmentResponse, ActivityError> {
        let result = self.unsign_inner(activity_name, email).await;
        record_enrollment("unsign", outcome_label(&result));
        result
    }

    async fn unsign_inner(
        &self,
        activity_name: &str,
        email: Option<&str>,
    ) -> Result<EnrollmentResponse, ActivityError> {
        let email = validate_enrollment_input(activity_name, email)?;

        let mut activities = self.activities.write().await;
        let activity = activities
            .get_mut(activity_name)
            .ok_or_else(activity_not_found)?;

        if !activity.participants.remove(&email) {
            return Err(ActivityError::InvalidArgument(
                "Not signed up for this activity".to_string(),
            ));
        }

        let spots_left = activity.spots_left();

        tracing::info!(
            target: "activity.service.directory",
            activity = %activity_name,
            spots_left,
            "Student removed"
        );

        Ok(EnrollmentResponse {
            message: format!("Successfully removed {} from {}", email, activity_name),
            spots_left,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::models::{Activity, Roster};
    use std::sync::Arc;

    fn tiny_directory(max: u32, emails: &[&str]) -> ActivityDirectory {
        ActivityDirectory::new(Catalog::from_entries([(
            "Robotics",
            Activity {
                description: "Build robots".to_string(),
                schedule: "Saturdays".to_string(),
                max_participants: max,
                participants: Roster::from_emails(emails.iter().copied()),
            },
        )]))
    }

    async fn roster(directory: &ActivityDirectory, name: &str) -> Vec<String> {
        directory.get_participants(name).await.unwrap().participants
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("  MICHAEL@Mergington.EDU \n"),
            "michael@mergington.edu"
        );
    }

    #[test]
    fn test_is_school_email() {
        assert!(is_school_email("michael@mergington.edu"));
        assert!(is_school_email("first.last+club_1%x-y@mergington.edu"));
        assert!(!is_school_email("x@gmail.com"));
        assert!(!is_school_email("@mergington.edu"));
        assert!(!is_school_email("a b@mergington.edu"));
        assert!(!is_school_email("a@mergington.edu.evil.com"));
        assert!(!is_school_email("a@mergingtonxedu"));
    }

    #[tokio::test]
    async fn test_list_without_search_returns_everything() {
        let directory = ActivityDirectory::seeded();
        assert_eq!(directory.list(None).await.len(), 3);
        assert_eq!(directory.list(Some("")).await.len(), 3);
    }

    #[tokio::test]
    async fn test_list_search_matches_description_case_insensitively() {
        let directory = ActivityDirectory::seeded();

        let result = directory.list(Some("CHESS")).await;
        assert_eq!(result.names(), ["Chess Club"]);

        let result = directory.list(Some("learn")).await;
        assert_eq!(
            result.names(),
            ["Chess Club", "Programming Class"]
        );
    }

    #[tokio::test]
    async fn test_list_keeps_seed_order() {
        let directory = ActivityDirectory::seeded();
        assert_eq!(
            directory.list(None).await.names(),
            ["Chess Club", "Programming Class", "Gym Class"]
        );

        let result = directory.list(Some("s")).await;
        assert_eq!(
            result.names(),
            ["Chess Club", "Programming Class", "Gym Class"]
        );
    }

    #[tokio::test]
    async fn test_list_search_matches_name() {
        let directory = ActivityDirectory::seeded();
        let result = directory.list(Some("gym")).await;
        assert_eq!(result.names(), ["Gym Class"]);
    }

    #[tokio::test]
    async fn test_list_search_with_no_match_is_empty() {
        let directory = ActivityDirectory::seeded();
        assert!(directory.list(Some("underwater basket")).await.is_empty());
    }

    #[tokio::test]
    async fn test_get_participants() {
        let directory = ActivityDirectory::seeded();
        let response = directory.get_participants("Chess Club").await.unwrap();

        assert_eq!(response.activity, "Chess Club");
        assert_eq!(
            response.participants,
            ["michael@mergington.edu", "daniel@mergington.edu"]
        );
        assert_eq!(response.count, 2);
        assert_eq!(response.max_participants, 12);
    }

    #[tokio::test]
    async fn test_get_participants_unknown_activity() {
        let directory = ActivityDirectory::seeded();
        let result = directory.get_participants("Knitting").await;
        assert_eq!(
            result,
            Err(ActivityError::NotFound("Activity not found".to_string()))
        );
    }

    #[tokio::test]
    async fn test_signup_normalizes_and_appends() {
        let directory = ActivityDirectory::seeded();
        let response = directory
            .signup("Chess Club", Some("  NewStudent@Mergington.edu "))
            .await
            .unwrap();

        assert_eq!(
            response.message,
            "Successfully signed up newstudent@mergington.edu for Chess Club"
        );
        assert_eq!(response.spots_left, 9);
        assert_eq!(
            roster(&directory, "Chess Club").await.last().map(String::as_str),
            Some("newstudent@mergington.edu")
        );
    }

    #[tokio::test]
    async fn test_signup_rejects_blank_inputs() {
        let directory = ActivityDirectory::seeded();

        let result = directory.signup("   ", Some("a@mergington.edu")).await;
        assert_eq!(
            result,
            Err(ActivityError::InvalidArgument(
                "Activity name is required".to_string()
            ))
        );

        for email in [None, Some(""), Some("  \t")] {
            let result = directory.signup("Chess Club", email).await;
            assert_eq!(
                result,
                Err(ActivityError::InvalidArgument("Email is required".to_string()))
            );
        }
    }

    #[tokio::test]
    async fn test_signup_unknown_activity_before_email_check() {
        let directory = ActivityDirectory::seeded();
        let result = directory.signup("Knitting", Some("x@gmail.com")).await;
        assert!(matches!(result, Err(ActivityError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_signup_rejects_foreign_domain() {
        let directory = ActivityDirectory::seeded();
        for name in ["Chess Club", "Programming Class", "Gym Class"] {
            let result = directory.signup(name, Some("x@gmail.com")).await;
            assert_eq!(
                result,
                Err(ActivityError::InvalidArgument(
                    "Invalid email. Must be a @mergington.edu email address".to_string()
                ))
            );
        }
    }

    #[tokio::test]
    async fn test_signup_detects_duplicate_after_normalization() {
        let directory = ActivityDirectory::seeded();
        let result = directory
            .signup("Chess Club", Some("MICHAEL@MERGINGTON.EDU"))
            .await;
        assert_eq!(
            result,
            Err(ActivityError::InvalidArgument(
                "Already signed up for this activity".to_string()
            ))
        );
        assert_eq!(roster(&directory, "Chess Club").await.len(), 2);
    }

    #[tokio::test]
    async fn test_signup_rejects_full_activity() {
        let directory = tiny_directory(2, &["a@mergington.edu", "b@mergington.edu"]);
        let result = directory.signup("Robotics", Some("c@mergington.edu")).await;

        assert_eq!(
            result,
            Err(ActivityError::InvalidArgument("Activity is full".to_string()))
        );
        assert_eq!(roster(&directory, "Robotics").await.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_reported_before_full() {
        let directory = tiny_directory(1, &["a@mergington.edu"]);
        let result = directory.signup("Robotics", Some("a@mergington.edu")).await;
        assert_eq!(
            result,
            Err(ActivityError::InvalidArgument(
                "Already signed up for this activity".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_signup_then_unsign_restores_roster() {
        let directory = ActivityDirectory::seeded();
        let before = roster(&directory, "Gym Class").await;

        directory
            .signup("Gym Class", Some("liam@mergington.edu"))
            .await
            .unwrap();
        let response = directory
            .unsign("Gym Class", Some("LIAM@mergington.edu"))
            .await
            .unwrap();

        assert_eq!(
            response.message,
            "Successfully removed liam@mergington.edu from Gym Class"
        );
        assert_eq!(response.spots_left, 28);
        assert_eq!(roster(&directory, "Gym Class").await, before);
    }

    #[tokio::test]
    async fn test_unsign_keeps_order_of_remaining() {
        let directory = tiny_directory(
            5,
            &["a@mergington.edu", "b@mergington.edu", "c@mergington.edu"],
        );
        directory
            .unsign("Robotics", Some("a@mergington.edu"))
            .await
            .unwrap();
        assert_eq!(
            roster(&directory, "Robotics").await,
            ["b@mergington.edu", "c@mergington.edu"]
        );
    }

    #[tokio::test]
    async fn test_unsign_not_signed_up() {
        let directory = ActivityDirectory::seeded();
        let before = roster(&directory, "Chess Club").await;

        let result = directory
            .unsign("Chess Club", Some("nobody@mergington.edu"))
            .await;
        assert_eq!(
            result,
            Err(ActivityError::InvalidArgument(
                "Not signed up for this activity".to_string()
            ))
        );
        assert_eq!(roster(&directory, "Chess Club").await, before);
    }

    #[tokio::test]
    async fn test_unsign_validation_order() {
        let directory = ActivityDirectory::seeded();

        let result = directory.unsign("Chess Club", None).await;
        assert_eq!(
            result,
            Err(ActivityError::InvalidArgument("Email is required".to_string()))
        );

        let result = directory
            .unsign("Knitting", Some("michael@mergington.edu"))
            .await;
        assert!(matches!(result, Err(ActivityError::NotFound(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_signups_never_exceed_capacity() {
        let directory = Arc::new(tiny_directory(5, &[]));

        let mut handles = Vec::new();
        for i in 0..50 {
            let directory = Arc::clone(&directory);
            handles.push(tokio::spawn(async move {
                let email = format!("student{}@mergington.edu", i);
                directory.signup("Robotics", Some(email.as_str())).await
            }));
        }

        let mut accepted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                accepted += 1;
            }
        }

        assert_eq!(accepted, 5);
        let response = directory.get_participants("Robotics").await.unwrap();
        assert_eq!(response.count, 5);
        assert!(response.count <= response.max_participants);
    }
}
