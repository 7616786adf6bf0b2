//! Review session state machine
//!
//! Replaces rerun-everything reactivity with two explicit phases:
//! `Configure` (no working copy yet) and `Review` (working copy populated).
//! Storage is re-read only when the thresholds change or no working copy
//! exists; edits touch the in-memory working copy and nothing else.

use docheck_common::db::ExtractedRecord;
use docheck_common::filter::{Partitioned, ReviewThresholds};

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewPhase {
    /// No working copy; thresholds not yet applied
    Configure,
    /// Working copy populated; grid edits and commits are legal
    Review,
}

/// Errors raised by session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Edit or commit attempted before the review phase was entered
    #[error("No active review session")]
    NotReviewing,
    /// Edited row key not present in the working copy
    #[error("Unknown row: {0}")]
    UnknownRow(String),
}

/// The single interactive review session.
///
/// Holds the editable working copy (the needs-review subset) and a
/// read-only snapshot of the rows that passed both thresholds.
#[derive(Debug)]
pub struct ReviewSession {
    phase: ReviewPhase,
    thresholds: ReviewThresholds,
    working: Vec<ExtractedRecord>,
    passes: Vec<ExtractedRecord>,
}

impl ReviewSession {
    /// New session in the configure phase
    pub fn new() -> Self {
        Self {
            phase: ReviewPhase::Configure,
            thresholds: ReviewThresholds::default(),
            working: Vec::new(),
            passes: Vec::new(),
        }
    }

    /// Whether serving these thresholds requires a fresh storage read.
    ///
    /// True when no working copy exists yet or the thresholds changed;
    /// false means the cached working copy (with any edits) is served.
    pub fn needs_refresh(&self, thresholds: &ReviewThresholds) -> bool {
        self.phase != ReviewPhase::Review || self.thresholds != *thresholds
    }

    /// Enter the review phase with a freshly partitioned record set.
    ///
    /// Discards any previous working copy, including unpersisted edits:
    /// reviewer progress is not saved until checked rows are committed.
    pub fn enter_review(&mut self, thresholds: ReviewThresholds, split: Partitioned) {
        self.phase = ReviewPhase::Review;
        self.thresholds = thresholds;
        self.working = split.needs_review;
        self.passes = split.passes;
    }

    pub fn is_reviewing(&self) -> bool {
        self.phase == ReviewPhase::Review
    }

    pub fn thresholds(&self) -> ReviewThresholds {
        self.thresholds
    }

    /// The editable working copy, in source insertion order
    pub fn working_rows(&self) -> &[ExtractedRecord] {
        &self.working
    }

    /// Rows that cleared both thresholds (read-only)
    pub fn passes_rows(&self) -> &[ExtractedRecord] {
        &self.passes
    }

    /// Apply edited rows to the working copy, keyed by `file_name`.
    ///
    /// The row identity set is 1:1 with the populated grid: a key that is
    /// not in the working copy is rejected. Returns the number of rows
    /// replaced.
    pub fn apply_edits(
        &mut self,
        edits: Vec<ExtractedRecord>,
    ) -> Result<usize, SessionError> {
        if self.phase != ReviewPhase::Review {
            return Err(SessionError::NotReviewing);
        }

        // Validate all keys before mutating anything
        for edit in &edits {
            if !self.working.iter().any(|r| r.file_name == edit.file_name) {
                return Err(SessionError::UnknownRow(edit.file_name.clone()));
            }
        }

        let mut updated = 0;
        for edit in edits {
            if let Some(row) = self
                .working
                .iter_mut()
                .find(|r| r.file_name == edit.file_name)
            {
                *row = edit;
                updated += 1;
            }
        }
        Ok(updated)
    }

    /// Snapshot of the working copy for the write-back trigger
    pub fn snapshot(&self) -> Result<Vec<ExtractedRecord>, SessionError> {
        if self.phase != ReviewPhase::Review {
            return Err(SessionError::NotReviewing);
        }
        Ok(self.working.clone())
    }
}

impl Default for ReviewSession {
    fn default() -> Self {
        Self::new()
    }
}
