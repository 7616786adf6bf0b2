//! Reconciliation write-back
//!
//! Takes the edited working-copy snapshot, selects the rows the reviewer
//! flagged as checked, merges the checked flag into the source table and
//! appends the finalized rows to the history table — in that order, both
//! over the same in-memory sub-sequence. History therefore reflects the
//! just-edited values, not a re-read of the merged source state.

use docheck_common::db::{append_history, mark_checked, ExtractedRecord};
use docheck_common::Result;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Counts reported by one write-back run
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct CommitOutcome {
    /// Source rows updated by the merge
    pub merged: u64,
    /// Checked rows whose `file_name` matched no source row (silent skip)
    pub skipped: u64,
    /// Rows appended to the history table
    pub appended: u64,
}

/// Run the write-back over an edited snapshot.
///
/// Only rows with `checked == true` participate; an empty selection is a
/// no-op that still succeeds. The merge is match-only (no insert fallback)
/// and the append performs no deduplication, so re-running the same
/// selection appends a second history entry per row. A storage failure
/// aborts the remaining steps; merges already applied are not rolled back.
pub async fn commit_reviewed(
    pool: &SqlitePool,
    snapshot: &[ExtractedRecord],
) -> Result<CommitOutcome> {
    let selected: Vec<&ExtractedRecord> = snapshot.iter().filter(|r| r.checked).collect();
    let mut outcome = CommitOutcome::default();

    // Merge-update before append
    for row in &selected {
        let affected = mark_checked(pool, &row.file_name).await?;
        if affected == 0 {
            debug!("No source row matched file_name '{}', skipping merge", row.file_name);
            outcome.skipped += 1;
        } else {
            outcome.merged += affected;
        }
    }

    // Append the same sub-sequence, edited values included
    for row in &selected {
        append_history(pool, row).await?;
        outcome.appended += 1;
    }

    info!(
        "Write-back complete: {} merged, {} skipped, {} appended",
        outcome.merged, outcome.skipped, outcome.appended
    );

    Ok(outcome)
}
