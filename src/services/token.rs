// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth token lifecycle.
//!
//! The access token is refreshed lazily: proactively when a request is about
//! to be sent with a token inside the expiry margin, and reactively when
//! Strava rejects a request with 401. Strava rotates the refresh token on
//! every refresh, so two overlapping refreshes would invalidate each other.
//! All refreshes therefore run while holding the state lock.

use crate::error::AppError;
use crate::services::strava::TokenRefreshResponse;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Margin before token expiration when we proactively refresh (5 minutes).
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Current credentials. Replaced wholesale on every successful refresh.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenState {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds
    pub expires_at: i64,
}

impl TokenState {
    /// Initial state from a configured refresh token.
    ///
    /// There is no access token yet and `expires_at` is 0, so the first
    /// request always refreshes.
    pub fn seed(refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: String::new(),
            refresh_token: refresh_token.into(),
            expires_at: 0,
        }
    }
}

impl From<TokenRefreshResponse> for TokenState {
    fn from(resp: TokenRefreshResponse) -> Self {
        Self {
            access_token: resp.access_token,
            refresh_token: resp.refresh_token,
            expires_at: resp.expires_at,
        }
    }
}

// Keep secrets out of logs.
impl std::fmt::Debug for TokenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenState")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// True if the token expires within the refresh margin.
pub fn is_expired(state: &TokenState, now: i64) -> bool {
    state.expires_at - now < TOKEN_REFRESH_MARGIN_SECS
}

/// Exchanges a refresh token for a new token triple.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenRefreshResponse, AppError>;
}

/// Source of the current time in unix seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Owns the token state and hands out valid access tokens.
pub struct TokenManager {
    state: Mutex<TokenState>,
    refresher: Arc<dyn TokenRefresher>,
    clock: Arc<dyn Clock>,
}

impl TokenManager {
    pub fn new(
        initial: TokenState,
        refresher: Arc<dyn TokenRefresher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state: Mutex::new(initial),
            refresher,
            clock,
        }
    }

    /// Return an access token that is outside the expiry margin,
    /// refreshing first if needed.
    ///
    /// Callers waiting on an in-flight refresh re-check after acquiring the
    /// lock and reuse its result.
    pub async fn access_token(&self) -> Result<String, AppError> {
        let mut state = self.state.lock().await;

        if !is_expired(&state, self.clock.now()) {
            return Ok(state.access_token.clone());
        }

        tracing::info!(
            expires_at = state.expires_at,
            "Access token expired or expiring soon, refreshing"
        );
        self.refresh_locked(&mut state).await
    }

    /// Refresh after Strava rejected `rejected_token` with 401.
    ///
    /// The expiry check is ignored: a 401 means the token is bad regardless
    /// of what `expires_at` says. If another call already replaced the
    /// rejected token while we waited for the lock, the newer token is
    /// returned without rotating again.
    pub async fn refresh_rejected(&self, rejected_token: &str) -> Result<String, AppError> {
        let mut state = self.state.lock().await;

        if state.access_token != rejected_token && !state.access_token.is_empty() {
            tracing::debug!("Token already replaced by a concurrent refresh");
            return Ok(state.access_token.clone());
        }

        tracing::info!("Access token rejected with 401, refreshing");
        self.refresh_locked(&mut state).await
    }

    /// Expiry timestamp of the current token (unix seconds).
    pub async fn expires_at(&self) -> i64 {
        self.state.lock().await.expires_at
    }

    async fn refresh_locked(&self, state: &mut TokenState) -> Result<String, AppError> {
        let new_state: TokenState = match self.refresher.refresh(&state.refresh_token).await {
            Ok(resp) => resp.into(),
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed");
                return Err(match e {
                    AppError::StravaApi(msg) => AppError::Auth(msg),
                    other => other,
                });
            }
        };

        *state = new_state;
        tracing::info!(expires_at = state.expires_at, "Token refreshed");
        Ok(state.access_token.clone())
    }
}
