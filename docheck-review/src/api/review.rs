//! Review grid API: threshold filtering and working-copy edits

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use docheck_common::db::{fetch_source_ordered, ExtractedRecord};
use docheck_common::filter::{partition, ReviewThresholds, DEFAULT_THRESHOLD};

use crate::session::SessionError;
use crate::AppState;

/// Query parameters carrying the per-field score thresholds
#[derive(Debug, Deserialize)]
pub struct ThresholdQuery {
    /// Application number cutoff
    #[serde(default = "default_threshold")]
    pub application_number: f64,

    /// Invention title cutoff
    #[serde(default = "default_threshold")]
    pub invention_title: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// Needs-review grid response
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub thresholds: ReviewThresholds,
    pub total_rows: usize,
    pub passes_count: usize,
    pub rows: Vec<ExtractedRecord>,
}

/// Passes subset response
#[derive(Debug, Serialize)]
pub struct PassesResponse {
    pub thresholds: ReviewThresholds,
    pub total_rows: usize,
    pub rows: Vec<ExtractedRecord>,
}

/// Edited rows payload for the working copy
#[derive(Debug, Deserialize)]
pub struct EditPayload {
    pub rows: Vec<ExtractedRecord>,
}

/// Edit acknowledgement
#[derive(Debug, Serialize)]
pub struct EditResponse {
    pub updated: usize,
}

/// GET /api/review
///
/// Enters (or re-serves) the review phase. Storage is queried and
/// re-partitioned only when no working copy exists or the thresholds
/// changed; otherwise the cached working copy, edits included, is returned.
pub async fn get_review(
    State(state): State<AppState>,
    Query(query): Query<ThresholdQuery>,
) -> Result<Json<ReviewResponse>, ReviewError> {
    let thresholds = ReviewThresholds {
        application_number: query.application_number,
        invention_title: query.invention_title,
    };
    thresholds
        .validate()
        .map_err(|e| ReviewError::InvalidThreshold(e.to_string()))?;

    let mut session = state.session.lock().await;

    if session.needs_refresh(&thresholds) {
        let records = fetch_source_ordered(&state.db)
            .await
            .map_err(|e| ReviewError::DatabaseError(e.to_string()))?;
        let split = partition(&records, &thresholds);
        info!(
            "Review refresh: {} rows to check, {} pass (of {} total)",
            split.needs_review.len(),
            split.passes.len(),
            records.len()
        );
        session.enter_review(thresholds, split);
    }

    Ok(Json(ReviewResponse {
        thresholds: session.thresholds(),
        total_rows: session.working_rows().len(),
        passes_count: session.passes_rows().len(),
        rows: session.working_rows().to_vec(),
    }))
}

/// GET /api/passes
///
/// Read-only view of the rows that cleared both thresholds in the current
/// session. Conflict when no session is active.
pub async fn get_passes(
    State(state): State<AppState>,
) -> Result<Json<PassesResponse>, ReviewError> {
    let session = state.session.lock().await;
    if !session.is_reviewing() {
        return Err(ReviewError::NoActiveSession);
    }

    Ok(Json(PassesResponse {
        thresholds: session.thresholds(),
        total_rows: session.passes_rows().len(),
        rows: session.passes_rows().to_vec(),
    }))
}

/// PUT /api/review/rows
///
/// Applies edited rows to the in-memory working copy, keyed by
/// `file_name`. Persisted storage is never touched here.
pub async fn put_review_rows(
    State(state): State<AppState>,
    Json(payload): Json<EditPayload>,
) -> Result<Json<EditResponse>, ReviewError> {
    let mut session = state.session.lock().await;
    let updated = session.apply_edits(payload.rows)?;
    Ok(Json(EditResponse { updated }))
}

/// Review API errors
#[derive(Debug)]
pub enum ReviewError {
    InvalidThreshold(String),
    NoActiveSession,
    UnknownRow(String),
    DatabaseError(String),
}

impl From<SessionError> for ReviewError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotReviewing => ReviewError::NoActiveSession,
            SessionError::UnknownRow(name) => ReviewError::UnknownRow(name),
        }
    }
}

impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ReviewError::InvalidThreshold(msg) => (StatusCode::BAD_REQUEST, msg),
            ReviewError::NoActiveSession => (
                StatusCode::CONFLICT,
                "No active review session; set thresholds first".to_string(),
            ),
            ReviewError::UnknownRow(name) => (
                StatusCode::BAD_REQUEST,
                format!("Row is not part of the review grid: {}", name),
            ),
            ReviewError::DatabaseError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {}", msg))
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
