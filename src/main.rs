use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use agencia::app::{build_router, AppState};
use agencia::config::{AppConfig, StorageBackend};
use agencia::db::repository::{
    ensure_indexes, MongoFlightRepository, MongoPassengerRepository, MongoReservationRepository,
};

#[derive(Parser, Debug)]
#[command(name = "agencia", about = "Travel agency flights, passengers and reservations")]
struct Args {
    /// Path to a TOML config file (defaults to ./agencia.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage");
            Ok(AppState::in_memory()?)
        }
        StorageBackend::Mongo => {
            let client = mongodb::Client::with_uri_str(&config.storage.mongodb_uri)
                .await
                .context("Failed to connect to MongoDB")?;
            let db = client.database(&config.storage.database);
            ensure_indexes(&db).await?;
            tracing::info!(
                "Connected to MongoDB at {} (database {})",
                config.storage.mongodb_uri,
                config.storage.database
            );

            Ok(AppState::new(
                Arc::new(MongoFlightRepository::new(&db)),
                Arc::new(MongoPassengerRepository::new(&db)),
                Arc::new(MongoReservationRepository::new(&db)),
            )?)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref())?;

    // RUST_LOG wins over the configured filter
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .init();

    tracing::info!("Starting agencia server...");

    let state = build_state(&config).await?;

    if config.demo_mode {
        agencia::demo_seeder::seed_demo_data(&state).await?;
    }

    let app = build_router(state);

    let addr = config.server.bind_address();
    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
