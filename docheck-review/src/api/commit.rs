//! Write-back trigger API

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::session::SessionError;
use crate::writer::{commit_reviewed, CommitOutcome};
use crate::AppState;

/// POST /api/commit
///
/// Runs the reconciliation write-back over the current working copy:
/// merge-update of checked rows into the source table, then append of the
/// same rows to the history table. Explicit reviewer action only; the
/// working copy is retained afterwards, so a second trigger re-runs the
/// same write-back (and appends again).
pub async fn post_commit(
    State(state): State<AppState>,
) -> Result<Json<CommitOutcome>, CommitError> {
    // Snapshot under the lock, write back outside it
    let snapshot = {
        let session = state.session.lock().await;
        session.snapshot()?
    };

    let outcome = commit_reviewed(&state.db, &snapshot)
        .await
        .map_err(|e| CommitError::DatabaseError(e.to_string()))?;

    Ok(Json(outcome))
}

/// Commit API errors
#[derive(Debug)]
pub enum CommitError {
    NoActiveSession,
    DatabaseError(String),
}

impl From<SessionError> for CommitError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotReviewing | SessionError::UnknownRow(_) => {
                CommitError::NoActiveSession
            }
        }
    }
}

impl IntoResponse for CommitError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            CommitError::NoActiveSession => (
                StatusCode::CONFLICT,
                "No active review session; nothing to commit".to_string(),
            ),
            CommitError::DatabaseError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {}", msg))
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
