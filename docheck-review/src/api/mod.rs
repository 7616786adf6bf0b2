//! HTTP API handlers for docheck-review

pub mod commit;
pub mod health;
pub mod history;
pub mod review;
pub mod ui;

pub use commit::post_commit;
pub use health::health_routes;
pub use history::get_history;
pub use review::{get_passes, get_review, put_review_rows};
pub use ui::{serve_app_js, serve_index};
