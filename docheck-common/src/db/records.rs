//! Row-level operations on the extraction tables
//!
//! All queries bind values; no user input is interpolated into SQL.

use crate::db::models::ExtractedRecord;
use crate::Result;
use sqlx::SqlitePool;

/// Read the full source table in insertion order (ascending `inserted_dttm`)
pub async fn fetch_source_ordered(pool: &SqlitePool) -> Result<Vec<ExtractedRecord>> {
    let records = sqlx::query_as::<_, ExtractedRecord>(
        "SELECT file_name, inserted_dttm, application_number, application_number_score,
                invention_title, invention_title_score, checked
         FROM extracted_headers
         ORDER BY inserted_dttm ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Read the history table newest-first
pub async fn fetch_history(pool: &SqlitePool) -> Result<Vec<ExtractedRecord>> {
    let records = sqlx::query_as::<_, ExtractedRecord>(
        "SELECT file_name, inserted_dttm, application_number, application_number_score,
                invention_title, invention_title_score, checked
         FROM extracted_headers_checked
         ORDER BY inserted_dttm DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Insert a record into the source table.
///
/// Used by tests and external seeding; the ingestion pipeline proper lives
/// outside this repository. Fails on duplicate `file_name`.
pub async fn insert_record(pool: &SqlitePool, record: &ExtractedRecord) -> Result<()> {
    sqlx::query(
        "INSERT INTO extracted_headers
            (file_name, inserted_dttm, application_number, application_number_score,
             invention_title, invention_title_score, checked)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&record.file_name)
    .bind(record.inserted_dttm)
    .bind(&record.application_number)
    .bind(record.application_number_score)
    .bind(&record.invention_title)
    .bind(record.invention_title_score)
    .bind(record.checked)
    .execute(pool)
    .await?;

    Ok(())
}

/// Merge-update: set `checked` on the source row with this `file_name`.
///
/// Match-only; returns the number of rows affected. Zero means no source
/// row matched, which callers treat as a silent skip.
pub async fn mark_checked(pool: &SqlitePool, file_name: &str) -> Result<u64> {
    let result = sqlx::query("UPDATE extracted_headers SET checked = 1 WHERE file_name = ?")
        .bind(file_name)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Append one finalized row to the history table.
///
/// No deduplication: appending the same `file_name` twice yields two rows.
pub async fn append_history(pool: &SqlitePool, record: &ExtractedRecord) -> Result<()> {
    sqlx::query(
        "INSERT INTO extracted_headers_checked
            (file_name, inserted_dttm, application_number, application_number_score,
             invention_title, invention_title_score, checked)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&record.file_name)
    .bind(record.inserted_dttm)
    .bind(&record.application_number)
    .bind(record.application_number_score)
    .bind(&record.invention_title)
    .bind(record.invention_title_score)
    .bind(record.checked)
    .execute(pool)
    .await?;

    Ok(())
}
