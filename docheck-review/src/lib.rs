//! docheck-review library - Extraction Check module
//!
//! Single-page web service for verifying data extracted from documents by
//! the upstream model pipeline: threshold-filtered review grid plus the
//! merge-and-append write-back of reviewer corrections.

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;

pub mod api;
pub mod session;
pub mod writer;

use session::ReviewSession;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (read-write; the write-back needs it)
    pub db: SqlitePool,
    /// The single interactive review session
    pub session: Arc<Mutex<ReviewSession>>,
}

impl AppState {
    /// Create new application state with an empty session
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            session: Arc::new(Mutex::new(ReviewSession::new())),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post, put};
    use tower_http::trace::TraceLayer;

    Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/api/review", get(api::get_review))
        .route("/api/review/rows", put(api::put_review_rows))
        .route("/api/passes", get(api::get_passes))
        .route("/api/commit", post(api::post_commit))
        .route("/api/history", get(api::get_history))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
