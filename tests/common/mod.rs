// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use mockito::{Matcher, Mock, ServerGuard};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use strava_dedup::config::Config;
use strava_dedup::error::AppError;
use strava_dedup::routes::create_router;
use strava_dedup::services::strava::TokenRefreshResponse;
use strava_dedup::services::{
    CleanupService, Clock, StravaClient, StravaService, SystemClock, TokenManager, TokenRefresher,
    TokenState,
};
use strava_dedup::AppState;

/// Seed refresh token every mock server setup starts from.
#[allow(dead_code)]
pub const SEED_REFRESH_TOKEN: &str = "seed-refresh";

/// Fixed start time used by activity fixtures.
#[allow(dead_code)]
pub const T0: &str = "2026-02-14T17:00:00Z";

// ─── Fakes ───────────────────────────────────────────────────

/// Manually advanced clock.
#[allow(dead_code)]
pub struct FakeClock(AtomicI64);

#[allow(dead_code)]
impl FakeClock {
    pub fn new(now: i64) -> Arc<Self> {
        Arc::new(Self(AtomicI64::new(now)))
    }

    pub fn advance(&self, secs: i64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Refresher that hands out `access-N` / `refresh-N` and records which
/// refresh tokens it was given.
#[allow(dead_code)]
pub struct FakeRefresher {
    clock: Arc<dyn Clock>,
    lifetime_secs: i64,
    delay: Duration,
    fail: AtomicBool,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeRefresher {
    pub fn new(clock: Arc<dyn Clock>, lifetime_secs: i64) -> Arc<Self> {
        Self::with_delay(clock, lifetime_secs, Duration::ZERO)
    }

    pub fn with_delay(clock: Arc<dyn Clock>, lifetime_secs: i64, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            clock,
            lifetime_secs,
            delay,
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of successful refreshes.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_refresh_tokens(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenRefresher for FakeRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenRefreshResponse, AppError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.seen.lock().unwrap().push(refresh_token.to_string());

        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Auth("invalid_grant".to_string()));
        }

        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(TokenRefreshResponse {
            access_token: format!("access-{}", n),
            refresh_token: format!("refresh-{}", n),
            expires_at: self.clock.now() + self.lifetime_secs,
        })
    }
}

// ─── Mock Strava server ──────────────────────────────────────

/// Token endpoint body handing out `access` / `refresh`, valid for 6 hours.
#[allow(dead_code)]
pub fn token_body(access: &str, refresh: &str) -> String {
    serde_json::json!({
        "token_type": "Bearer",
        "access_token": access,
        "refresh_token": refresh,
        "expires_at": chrono::Utc::now().timestamp() + 6 * 3600,
        "expires_in": 6 * 3600,
    })
    .to_string()
}

/// Expect exactly one refresh exchanging `from_refresh` for `access`/`refresh`.
#[allow(dead_code)]
pub async fn mock_refresh(
    server: &mut ServerGuard,
    from_refresh: &str,
    access: &str,
    refresh: &str,
) -> Mock {
    server
        .mock("POST", "/oauth/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("client_id".into(), "test_client_id".into()),
            Matcher::UrlEncoded("client_secret".into(), "test_secret".into()),
            Matcher::UrlEncoded("refresh_token".into(), from_refresh.into()),
            Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(token_body(access, refresh))
        .expect(1)
        .create_async()
        .await
}

/// Expect exactly one activity listing with `access` returning `activities`.
#[allow(dead_code)]
pub async fn mock_listing(
    server: &mut ServerGuard,
    access: &str,
    activities: serde_json::Value,
) -> Mock {
    mock_listing_status(server, access, 200, activities).await
}

/// Expect exactly one activity listing with `access`, answered with `status`.
#[allow(dead_code)]
pub async fn mock_listing_status(
    server: &mut ServerGuard,
    access: &str,
    status: usize,
    body: serde_json::Value,
) -> Mock {
    server
        .mock("GET", "/api/v3/athlete/activities")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("per_page".into(), "5".into()),
        ]))
        .match_header("authorization", format!("Bearer {}", access).as_str())
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(1)
        .create_async()
        .await
}

/// Expect exactly one hide update for `activity_id`, answered with `status`.
#[allow(dead_code)]
pub async fn mock_hide(
    server: &mut ServerGuard,
    access: &str,
    activity_id: u64,
    status: usize,
) -> Mock {
    server
        .mock("PUT", format!("/api/v3/activities/{}", activity_id).as_str())
        .match_header("authorization", format!("Bearer {}", access).as_str())
        .match_body(Matcher::Json(serde_json::json!({ "hide_from_home": true })))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(format!(r#"{{"id": {}}}"#, activity_id))
        .expect(1)
        .create_async()
        .await
}

/// One activity as it appears in the Strava listing.
#[allow(dead_code)]
pub fn activity_json(
    id: u64,
    activity_type: &str,
    distance: f64,
    offset_secs: i64,
    private: bool,
) -> serde_json::Value {
    let start = chrono::DateTime::parse_from_rfc3339(T0).unwrap()
        + chrono::Duration::seconds(offset_secs);
    serde_json::json!({
        "id": id,
        "name": format!("Activity {}", id),
        "type": activity_type,
        "sport_type": activity_type,
        "distance": distance,
        "start_date": start.to_rfc3339(),
        "private": private,
        "manual": false,
        "external_id": null,
    })
}

/// Strava service pointed at the mock server, seeded with `SEED_REFRESH_TOKEN`.
#[allow(dead_code)]
pub fn strava_service(server: &ServerGuard) -> StravaService {
    let config = Config::default();
    let client = StravaClient::new(config.strava_client_id, config.strava_client_secret)
        .expect("HTTP client")
        .with_base_urls(
            format!("{}/api/v3", server.url()),
            format!("{}/oauth/token", server.url()),
        );

    let tokens = Arc::new(TokenManager::new(
        TokenState::seed(SEED_REFRESH_TOKEN),
        Arc::new(client.clone()),
        Arc::new(SystemClock),
    ));

    StravaService::new(client, tokens)
}

/// Cleanup service with the default page size.
#[allow(dead_code)]
pub fn cleanup_service(server: &ServerGuard) -> CleanupService {
    CleanupService::new(strava_service(server), Config::default().activities_per_page)
}

/// Create a test app backed by the mock server.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(server: &ServerGuard) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        cleanup: cleanup_service(server),
    });

    (create_router(state.clone()), state)
}
