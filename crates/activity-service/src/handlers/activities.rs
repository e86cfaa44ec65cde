//! Activity handlers.
//!
//! - `GET /` - Redirect to the static front-end
//! - `GET /activities` - List activities, optional `search`
//! - `GET /activities/{name}/participants` - Roster of one activity
//! - `POST /activities/{name}/signup?email=` - Sign a student up
//! - `DELETE /activities/{name}/signup?email=` - Remove a signup

use crate::errors::ActivityError;
use crate::models::{
    Catalog, EnrollmentQuery, EnrollmentResponse, ParticipantsResponse, SearchQuery,
};
use crate::routes::AppState;
use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Json,
};
use std::sync::Arc;
use tracing::instrument;

/// Decoded query string pairs, kept in order.
///
/// Extracted as a list so a repeated key resolves to its last value instead
/// of rejecting the request.
type QueryPairs = Query<Vec<(String, String)>>;

/// Path of the front-end entry page.
pub const INDEX_PAGE: &str = "/static/index.html";

/// Handler for GET /
pub async fn root_redirect() -> Redirect {
    Redirect::temporary(INDEX_PAGE)
}

/// Handler for GET /activities
///
/// Returns an object keyed by activity name, in catalog order. With
/// `search`, only activities whose name or description contains it
/// (case-insensitive) are returned.
#[instrument(skip_all, name = "activity.handlers.list")]
pub async fn list_activities(
    State(state): State<Arc<AppState>>,
    Query(pairs): QueryPairs,
) -> Json<Catalog> {
    let query = SearchQuery::from_pairs(&pairs);
    Json(state.directory.list(query.search.as_deref()).await)
}

/// Handler for GET /activities/{name}/participants
///
/// # Response
///
/// - 200 OK: `{activity, participants, count, max_participants}`
/// - 404 Not Found: Unknown activity
#[instrument(skip(state), name = "activity.handlers.participants")]
pub async fn get_activity_participants(
    State(state): State<Arc<AppState>>,
    Path(activity_name): Path<String>,
) -> Result<Json<ParticipantsResponse>, ActivityError> {
    state
        .directory
        .get_participants(&activity_name)
        .await
        .map(Json)
}

/// Handler for POST /activities/{name}/signup
///
/// # Response
///
/// - 200 OK: `{message, spots_left}`
/// - 400 Bad Request: Missing or invalid email, already signed up, activity full
/// - 404 Not Found: Unknown activity
#[instrument(skip(state, pairs), name = "activity.handlers.signup")]
pub async fn signup_for_activity(
    State(state): State<Arc<AppState>>,
    Path(activity_name): Path<String>,
    Query(pairs): QueryPairs,
) -> Result<Json<EnrollmentResponse>, ActivityError> {
    let query = EnrollmentQuery::from_pairs(&pairs);
    state
        .directory
        .signup(&activity_name, query.email.as_deref())
        .await
        .map(Json)
}

/// Handler for DELETE /activities/{name}/signup
///
/// # Response
///
/// - 200 OK: `{message, spots_left}`
/// - 400 Bad Request: Missing email, not signed up
/// - 404 Not Found: Unknown activity
#[instrument(skip(state, pairs), name = "activity.handlers.unsign")]
pub async fn unsign_from_activity(
    State(state): State<Arc<AppState>>,
    Path(activity_name): Path<String>,
    Query(pairs): QueryPairs,
) -> Result<Json<EnrollmentResponse>, ActivityError> {
    let query = EnrollmentQuery::from_pairs(&pairs);
    state
        .directory
        .unsign(&activity_name, query.email.as_deref())
        .await
        .map(Json)
}
