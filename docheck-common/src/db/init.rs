//! Database initialization
//!
//! Creates the SQLite database on first run and brings up the extraction
//! tables. Schema creation is idempotent so every service start can call it.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL mode allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    // Set busy timeout
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create the extraction tables (idempotent, safe to call multiple times)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_extracted_headers_table(pool).await?;
    create_extracted_headers_checked_table(pool).await?;
    Ok(())
}

/// Create the source table holding one row per processed document.
///
/// `file_name` is the natural key; per-field confidence scores are
/// constrained to [0.0, 1.0]; `checked` starts false and is only set true
/// by reviewer action.
async fn create_extracted_headers_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS extracted_headers (
            file_name TEXT PRIMARY KEY,
            inserted_dttm TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            application_number TEXT NOT NULL,
            application_number_score REAL NOT NULL,
            invention_title TEXT NOT NULL,
            invention_title_score REAL NOT NULL,
            checked INTEGER NOT NULL DEFAULT 0,
            CHECK (application_number_score >= 0.0 AND application_number_score <= 1.0),
            CHECK (invention_title_score >= 0.0 AND invention_title_score <= 1.0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create index for insertion-order reads
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_extracted_headers_inserted ON extracted_headers(inserted_dttm)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the append-only history table.
///
/// Identical column set to the source table but deliberately no primary
/// key: repeated commits append duplicate `file_name` entries.
async fn create_extracted_headers_checked_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS extracted_headers_checked (
            file_name TEXT NOT NULL,
            inserted_dttm TIMESTAMP NOT NULL,
            application_number TEXT NOT NULL,
            application_number_score REAL NOT NULL,
            invention_title TEXT NOT NULL,
            invention_title_score REAL NOT NULL,
            checked INTEGER NOT NULL,
            CHECK (application_number_score >= 0.0 AND application_number_score <= 1.0),
            CHECK (invention_title_score >= 0.0 AND invention_title_score <= 1.0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_headers_checked_inserted ON extracted_headers_checked(inserted_dttm)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
