// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

use crate::error::Result;
use crate::models::CleanupResult;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Successful cleanup response.
#[derive(Serialize)]
pub struct CleanupResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: CleanupResult,
}

/// Run cleanup synchronously and report what was hidden.
async fn run_cleanup(State(state): State<Arc<AppState>>) -> Result<Json<CleanupResponse>> {
    tracing::info!("Cleanup triggered over HTTP");
    let result = state.cleanup.run().await?;

    Ok(Json(CleanupResponse {
        success: true,
        result,
    }))
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(run_cleanup))
        .route("/health", get(health_check))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
