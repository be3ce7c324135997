// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava-Dedup API Server
//!
//! Hides zero-distance indoor rides that duplicate a virtual ride, every
//! few minutes and whenever `GET /` is hit.

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use strava_dedup::{
    config::Config,
    services::{
        spawn_cleanup_timer, CleanupService, StravaClient, StravaService, SystemClock,
        TokenManager, TokenState,
    },
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        port = config.port,
        cron_enabled = config.cron_enabled,
        "Starting Strava-Dedup"
    );

    // Strava client doubles as the token refresher
    let client = StravaClient::new(
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
    )
    .context("Failed to build HTTP client")?;

    let tokens = Arc::new(TokenManager::new(
        TokenState::seed(config.strava_refresh_token.clone()),
        Arc::new(client.clone()),
        Arc::new(SystemClock),
    ));

    let strava_service = StravaService::new(client, tokens);
    let cleanup = CleanupService::new(strava_service, config.activities_per_page);

    if config.cron_enabled {
        let period = Duration::from_secs(config.cleanup_interval_secs);
        spawn_cleanup_timer(cleanup.clone(), period);
        tracing::info!(period_secs = period.as_secs(), "Cleanup timer started");
    }

    // Build shared state
    let state = Arc::new(AppState { cleanup });

    // Build router
    let app = strava_dedup::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("strava_dedup=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
