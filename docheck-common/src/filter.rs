//! Confidence-threshold filtering of extracted records
//!
//! Splits the ordered source rows into the subset a reviewer must look at
//! and the subset that cleared both thresholds. Pure; no storage access.

use crate::db::models::ExtractedRecord;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default cutoff applied to both scored fields
pub const DEFAULT_THRESHOLD: f64 = 0.9;

/// Per-field confidence cutoffs, each in [0.0, 1.0].
///
/// Supplied per review session; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewThresholds {
    pub application_number: f64,
    pub invention_title: f64,
}

impl Default for ReviewThresholds {
    fn default() -> Self {
        Self {
            application_number: DEFAULT_THRESHOLD,
            invention_title: DEFAULT_THRESHOLD,
        }
    }
}

impl ReviewThresholds {
    /// Validate both cutoffs into [0.0, 1.0]
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("application_number", self.application_number),
            ("invention_title", self.invention_title),
        ] {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(Error::InvalidInput(format!(
                    "Threshold {} out of range [0.0, 1.0]: {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Result of partitioning the source rows against a threshold pair.
///
/// Input order (ascending `inserted_dttm`) is preserved in both subsets.
#[derive(Debug, Clone, Default)]
pub struct Partitioned {
    /// Rows a reviewer must look at
    pub needs_review: Vec<ExtractedRecord>,
    /// Rows that cleared both thresholds
    pub passes: Vec<ExtractedRecord>,
}

/// A record needs review when either score is at or below its cutoff and
/// the record has not already been checked.
pub fn needs_review(record: &ExtractedRecord, thresholds: &ReviewThresholds) -> bool {
    (record.application_number_score <= thresholds.application_number
        || record.invention_title_score <= thresholds.invention_title)
        && !record.checked
}

/// A record passes when both scores are strictly above their cutoffs.
///
/// Deliberately no `checked` guard: a checked record that still scores low
/// falls into neither subset. That gap is the established behavior.
pub fn passes(record: &ExtractedRecord, thresholds: &ReviewThresholds) -> bool {
    record.application_number_score > thresholds.application_number
        && record.invention_title_score > thresholds.invention_title
}

/// Partition records into needs-review and passes subsets
pub fn partition(records: &[ExtractedRecord], thresholds: &ReviewThresholds) -> Partitioned {
    let mut result = Partitioned::default();
    for record in records {
        if needs_review(record, thresholds) {
            result.needs_review.push(record.clone());
        } else if passes(record, thresholds) {
            result.passes.push(record.clone());
        }
        // Checked rows with a low score match neither predicate and are
        // dropped here by construction.
    }
    result
}
