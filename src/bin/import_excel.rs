// Offline spreadsheet importer: drop-and-recreate the lego table from an
// Excel file. Destructive; intended for one-time bootstrap only.

use anyhow::Result;
use brickstash::importer;
use brickstash::store::Db;
use brickstash::util::env as env_util;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "import_excel",
    version,
    about = "Bootstrap the lego inventory table from a spreadsheet (destructive)"
)]
struct Cli {
    /// Path to the .xlsx file
    path: PathBuf,
    /// Optional override for the database URL
    #[arg(long)]
    db_url: Option<String>,
    /// Parse and report the derived schema without touching the database
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .init();

    env_util::init_env();
    let cli = Cli::parse();

    let sheet = importer::read_sheet(&cli.path)?;
    info!(columns = ?sheet.columns, rows = sheet.rows.len(), "parsed spreadsheet");

    if cli.dry_run {
        info!("dry run; leaving the database untouched");
        return Ok(());
    }

    let database_url = match cli.db_url {
        Some(url) => url,
        None => env_util::db_url()?,
    };
    info!(db = %env_util::redact_dsn(&database_url), "connecting to database");
    let db = Db::connect(&database_url, 4).await?;

    importer::recreate_table(&db, &sheet.columns).await?;
    let inserted = importer::insert_rows(&db, &sheet).await?;
    info!(inserted, "import complete");

    // One-shot mode: the pool closes with the batch.
    db.close().await;
    Ok(())
}
