//! History (audit) table API

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use docheck_common::db::{fetch_history, ExtractedRecord};

use crate::AppState;

/// History table response, newest entries first
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub total_rows: usize,
    pub rows: Vec<ExtractedRecord>,
}

/// GET /api/history
///
/// Returns the append-only audit table of finalized review decisions.
/// Duplicate `file_name` entries are expected after repeated commits.
pub async fn get_history(
    State(state): State<AppState>,
) -> Result<Json<HistoryResponse>, HistoryError> {
    let rows = fetch_history(&state.db)
        .await
        .map_err(|e| HistoryError::DatabaseError(e.to_string()))?;

    Ok(Json(HistoryResponse {
        total_rows: rows.len(),
        rows,
    }))
}

/// History API errors
#[derive(Debug)]
pub enum HistoryError {
    DatabaseError(String),
}

impl IntoResponse for HistoryError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            HistoryError::DatabaseError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {}", msg))
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
