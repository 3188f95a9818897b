// HTTP API server binary for brickstash

use anyhow::Result;
use brickstash::api::ApiServer;
use brickstash::images::ImageProvider;
use brickstash::store::Db;
use brickstash::util::env as env_util;

#[actix_web::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .init();

    tracing::info!("Initializing brickstash API server");

    // Load dotenv/env once (safe to call multiple times)
    env_util::init_env();

    // Load configuration from environment
    let server = ApiServer::from_env()?;

    // Initialize database connection
    let database_url = env_util::db_url()?;
    let max_connections: u32 = env_util::env_parse("DB_MAX_CONNS", 10u32);
    tracing::info!(db = %env_util::redact_dsn(&database_url), "connecting to database");
    let db = Db::connect(&database_url, max_connections).await?;

    tracing::info!("Database connected successfully");

    let images = ImageProvider::from_env()?;

    // Start HTTP server
    server.run(db, images).await?;

    Ok(())
}
