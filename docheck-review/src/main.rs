//! docheck-review - Document extraction check service
//!
//! Serves a single-page form for verifying the data extracted from
//! documents by the upstream model pipeline, and persists reviewer
//! corrections back to the extraction tables.

use anyhow::Result;
use clap::Parser;
use docheck_common::config::{prepare_root_folder, resolve_root_folder};
use docheck_common::db::init_database;
use docheck_review::{build_router, AppState};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "docheck-review", version, about = "Document extraction check service")]
struct Args {
    /// Root folder holding the docheck database (overrides DOCHECK_ROOT and config file)
    #[arg(long)]
    root_folder: Option<String>,

    /// Port to listen on
    #[arg(long, default_value_t = 5730)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting Document Extraction Check (docheck-review) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), "DOCHECK_ROOT")?;
    let db_path = prepare_root_folder(&root_folder)?;
    info!("Database path: {}", db_path.display());

    // A storage failure here is fatal; the session cannot start without it
    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState::new(pool);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("docheck-review listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
