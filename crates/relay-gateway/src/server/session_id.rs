//! Session identifier issuing
//!
//! Hands out short random tokens a publisher can use as its session id. The
//! relay does not remember issued tokens; any non-empty id is accepted.

use axum::Json;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use serde::Serialize;

/// Length of issued session identifiers
const SESSION_ID_LEN: usize = 10;

/// Body of `GET /session`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdResponse {
    pub session_id: String,
}

/// Generate a random alphanumeric session identifier
#[must_use]
pub fn generate_session_id() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LEN)
        .map(char::from)
        .collect()
}

/// Issue a fresh session identifier
///
/// GET /session
pub async fn issue_session_id() -> Json<SessionIdResponse> {
    Json(SessionIdResponse {
        session_id: generate_session_id(),
    })
}
