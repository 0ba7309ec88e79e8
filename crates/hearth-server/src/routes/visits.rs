//! Session demo endpoint: counts visits per session.

use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};

use crate::session_layer::CurrentSession;
use crate::state::AppState;

/// Attribute holding the visit counter.
pub const VISITS_KEY: &str = "visits";

/// Response for `GET /session`.
#[derive(Debug, Serialize, Deserialize)]
pub struct VisitsResponse {
    /// Visits by this session, including the current one.
    pub visits: u64,
}

/// Increment and return the session's visit counter.
pub async fn visits_handler(CurrentSession(session): CurrentSession) -> Json<VisitsResponse> {
    let visits = {
        let mut session = session.write();
        let visits = session
            .get(VISITS_KEY)
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0)
            + 1;
        session.set(VISITS_KEY, visits.to_string());
        visits
    };
    Json(VisitsResponse { visits })
}

/// Routes that require a session. Mount behind the session middleware.
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/session", get(visits_handler))
}
