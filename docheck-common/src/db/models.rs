//! Row models for the extraction tables

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One extracted document header, as stored in `extracted_headers` and
/// appended to `extracted_headers_checked`.
///
/// `file_name` uniquely identifies a record in the source table. The two
/// `*_score` columns are model confidence values in [0.0, 1.0]. `checked`
/// starts false and is set true only by reviewer action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExtractedRecord {
    pub file_name: String,
    pub inserted_dttm: DateTime<Utc>,
    pub application_number: String,
    pub application_number_score: f64,
    pub invention_title: String,
    pub invention_title_score: f64,
    pub checked: bool,
}
