// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
///
/// None of these are recovered inside a cleanup run; they abort the run and
/// surface at the trigger boundary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Token refresh failed, or a request was still rejected with 401
    /// after one refresh-and-resend.
    #[error("Strava authentication failed: {0}")]
    Auth(String),

    /// A single request was answered with 401. Retried by `StravaService`.
    #[error("Strava rejected the access token")]
    Unauthorized,

    #[error("Strava API error: {0}")]
    StravaApi(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl AppError {
    pub const STRAVA_RATE_LIMIT: &'static str = "Rate limit exceeded";

    /// Returns true if this error means the credentials are no good.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, AppError::Auth(_) | AppError::Unauthorized)
    }

    /// Map a transport-level reqwest failure.
    pub(crate) fn from_transport(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Network(format!("{} timed out: {}", context, err))
        } else {
            AppError::Network(format!("{} failed: {}", context, err))
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Auth(msg) => tracing::error!(error = %msg, "Cleanup failed: auth"),
            AppError::Unauthorized => tracing::error!("Cleanup failed: unauthorized"),
            AppError::StravaApi(msg) => tracing::error!(error = %msg, "Cleanup failed: upstream"),
            AppError::Network(msg) => tracing::error!(error = %msg, "Cleanup failed: network"),
        }

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
