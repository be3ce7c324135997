// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for listing and updating activities.
//!
//! Handles:
//! - Activity listing (single page)
//! - Activity updates (hide from home feed)
//! - Token refresh, proactive and on 401
//! - Rate limit detection

use crate::error::AppError;
use crate::models::{ActivitySummary, ActivityUpdate};
use crate::services::token::{TokenManager, TokenRefresher};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const STRAVA_API_BASE: &str = "https://www.strava.com/api/v3";
const STRAVA_TOKEN_URL: &str = "https://www.strava.com/oauth/token";

/// Per-call network timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How many times a request is resent after a 401 and a token refresh.
pub const UNAUTHORIZED_RETRY_BUDGET: u32 = 1;

/// Strava API client.
///
/// Stateless with respect to tokens: every call takes the access token to
/// use. See [`StravaService`] for the authenticated wrapper.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            base_url: STRAVA_API_BASE.to_string(),
            token_url: STRAVA_TOKEN_URL.to_string(),
            client_id,
            client_secret,
        })
    }

    /// Point the client at a different API host (e.g. a local mock server).
    pub fn with_base_urls(
        mut self,
        api_base: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        self.base_url = api_base.into();
        self.token_url = token_url.into();
        self
    }

    /// List the authenticated athlete's activities, newest first.
    pub async fn list_activities(
        &self,
        access_token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<ActivitySummary>, AppError> {
        let url = format!("{}/athlete/activities", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("page", page.to_string()), ("per_page", per_page.to_string())])
            .send()
            .await
            .map_err(|e| AppError::from_transport("GET /athlete/activities", e))?;

        self.check_response_json(response).await
    }

    /// Apply a partial update to an activity.
    pub async fn update_activity(
        &self,
        access_token: &str,
        activity_id: u64,
        update: &ActivityUpdate,
    ) -> Result<(), AppError> {
        let url = format!("{}/activities/{}", self.base_url, activity_id);

        let response = self
            .http
            .put(&url)
            .bearer_auth(access_token)
            .json(update)
            .send()
            .await
            .map_err(|e| AppError::from_transport("PUT /activities", e))?;

        self.check_response(response).await
    }

    /// Exchange a refresh token for a new token triple.
    ///
    /// Strava rotates the refresh token: the one passed in is invalid once
    /// this succeeds.
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenRefreshResponse, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::from_transport("Token refresh request", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Auth(format!(
                "Token refresh failed with HTTP {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("Failed to parse token response: {}", e)))
    }

    /// Check response status and return error if not successful.
    async fn check_response(&self, response: reqwest::Response) -> Result<(), AppError> {
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::status_error(response).await)
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
    }

    async fn status_error(response: reqwest::Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match status {
            // Token may be expired or revoked; StravaService decides whether to retry
            StatusCode::UNAUTHORIZED => AppError::Unauthorized,
            StatusCode::TOO_MANY_REQUESTS => {
                tracing::warn!("Strava rate limit hit (429)");
                AppError::StravaApi(AppError::STRAVA_RATE_LIMIT.to_string())
            }
            _ => AppError::StravaApi(format!("HTTP {}: {}", status, body)),
        }
    }
}

#[async_trait]
impl TokenRefresher for StravaClient {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenRefreshResponse, AppError> {
        self.refresh_token(refresh_token).await
    }
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds
    pub expires_at: i64,
}

// ─────────────────────────────────────────────────────────────────────────────
// StravaService - authenticated calls on top of StravaClient
// ─────────────────────────────────────────────────────────────────────────────

/// High-level Strava service: every call is made with a valid token.
///
/// Cheap to clone; clones share one [`TokenManager`].
#[derive(Clone)]
pub struct StravaService {
    client: StravaClient,
    tokens: Arc<TokenManager>,
}

impl StravaService {
    pub fn new(client: StravaClient, tokens: Arc<TokenManager>) -> Self {
        Self { client, tokens }
    }

    /// List one page of activities.
    pub async fn list_activities(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<ActivitySummary>, AppError> {
        let client = &self.client;
        self.with_auth(move |token| async move {
            client.list_activities(&token, page, per_page).await
        })
        .await
    }

    /// Hide an activity from the home feed.
    pub async fn hide_activity(&self, activity_id: u64) -> Result<(), AppError> {
        let client = &self.client;
        let update = &ActivityUpdate::hide_from_home();
        self.with_auth(move |token| async move {
            client.update_activity(&token, activity_id, update).await
        })
        .await
    }

    /// Run `op` with a valid access token, resending once after a 401.
    async fn with_auth<T, F, Fut>(&self, op: F) -> Result<T, AppError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        self.with_auth_budget(op, UNAUTHORIZED_RETRY_BUDGET).await
    }

    /// Run `op` with a valid access token.
    ///
    /// Each 401 spends one unit of `retries_left` on a forced refresh and a
    /// resend. A 401 with nothing left is final.
    pub async fn with_auth_budget<T, F, Fut>(
        &self,
        op: F,
        mut retries_left: u32,
    ) -> Result<T, AppError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let mut token = self.tokens.access_token().await?;

        loop {
            match op(token.clone()).await {
                Err(AppError::Unauthorized) if retries_left > 0 => {
                    retries_left -= 1;
                    tracing::warn!(
                        retries_left,
                        "Strava returned 401, refreshing token and retrying"
                    );
                    token = self.tokens.refresh_rejected(&token).await?;
                }
                Err(AppError::Unauthorized) => {
                    return Err(AppError::Auth(
                        "Strava rejected the access token (401)".to_string(),
                    ));
                }
                result => return result,
            }
        }
    }
}
