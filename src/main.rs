//! watchsync - Plex watchlist to Radarr profile sync
//!
//! Watches a Plex account watchlist and keeps the matching Radarr movies on
//! a configured quality profile, once or on a fixed interval, with a
//! liveness endpoint for orchestration platforms.

mod api;
mod cli;
mod config;
mod jobs;
mod services;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::CliOptions;
use crate::config::Config;
use crate::services::sync::UPDATE_DELAY;
use crate::services::{PlexClient, RadarrClient, SyncService, resolve_target_profile};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "watchsync=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!("Starting watchsync");

    let options = CliOptions::from_args();
    let config_path = options
        .config_path
        .clone()
        .or_else(|| std::env::var("CONFIG_PATH").ok())
        .unwrap_or_else(|| "config.yaml".to_string());

    let mut config = Config::load(&config_path)?;
    if let Some(minutes) = options.interval_override {
        config.sync_interval_minutes = minutes;
    }
    if let Some(port) = options.port_override {
        config.port = port;
    }
    tracing::info!("Configuration loaded");

    let plex = Arc::new(PlexClient::new(
        config.plex_url.clone(),
        config.plex_token.clone(),
    ));
    let radarr = Arc::new(RadarrClient::new(
        config.radarr_url.clone(),
        config.radarr_api_key.clone(),
    ));

    // Fail fast: an ambiguous or missing target profile must never reach a
    // reconciliation pass
    let target_profile_id = resolve_target_profile(radarr.as_ref(), &config.target_profile).await?;

    let sync = Arc::new(SyncService::new(plex, radarr, target_profile_id, UPDATE_DELAY));

    if options.run_once {
        let report = sync.run_once().await?;
        tracing::info!(
            updated = report.updated,
            unmatched = report.unmatched,
            already_correct = report.already_correct,
            "Single run complete"
        );
        return Ok(());
    }

    let interval = Duration::from_secs(config.sync_interval_minutes * 60);
    let _sync_loop = jobs::spawn_sync_loop(sync, interval);
    tracing::info!(minutes = config.sync_interval_minutes, "Sync loop started");

    let app = api::health::router().layer(TraceLayer::new_for_http());
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Liveness endpoint listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
