// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Everything is read and validated once at startup. A missing credential
//! or a malformed optional value aborts startup.

use std::env;

/// Default listening port.
const DEFAULT_PORT: u16 = 3000;

/// Default cleanup timer period (15 minutes).
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 15 * 60;

/// Default number of activities fetched per cleanup run (single page).
const DEFAULT_ACTIVITIES_PER_PAGE: u32 = 5;

/// Strava rejects `per_page` values above this.
const MAX_ACTIVITIES_PER_PAGE: u32 = 200;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava OAuth client ID
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Seed refresh token; rotated in memory after the first refresh
    pub strava_refresh_token: String,
    /// Server port
    pub port: u16,
    /// Whether the periodic cleanup timer runs
    pub cron_enabled: bool,
    /// Period between timer-driven cleanup runs
    pub cleanup_interval_secs: u64,
    /// Page size for the single activity listing page
    pub activities_per_page: u32,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            strava_refresh_token: "test_refresh_token".to_string(),
            port: DEFAULT_PORT,
            cron_enabled: false,
            cleanup_interval_secs: DEFAULT_CLEANUP_INTERVAL_SECS,
            activities_per_page: DEFAULT_ACTIVITIES_PER_PAGE,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let activities_per_page = parse_or("ACTIVITIES_PER_PAGE", DEFAULT_ACTIVITIES_PER_PAGE)?;
        if activities_per_page == 0 || activities_per_page > MAX_ACTIVITIES_PER_PAGE {
            return Err(ConfigError::Invalid {
                var: "ACTIVITIES_PER_PAGE",
                reason: format!("must be between 1 and {}", MAX_ACTIVITIES_PER_PAGE),
            });
        }

        let cleanup_interval_secs =
            parse_or("CLEANUP_INTERVAL_SECS", DEFAULT_CLEANUP_INTERVAL_SECS)?;
        if cleanup_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "CLEANUP_INTERVAL_SECS",
                reason: "must be positive".to_string(),
            });
        }

        Ok(Self {
            strava_client_id: required("STRAVA_CLIENT_ID")?,
            strava_client_secret: required("STRAVA_CLIENT_SECRET")?,
            strava_refresh_token: required("STRAVA_REFRESH_TOKEN")?,
            port: parse_or("PORT", DEFAULT_PORT)?,
            cron_enabled: match optional("CLEANUP_CRON_ENABLED") {
                Some(raw) => parse_flag(&raw).ok_or_else(|| ConfigError::Invalid {
                    var: "CLEANUP_CRON_ENABLED",
                    reason: format!("expected a boolean, got {:?}", raw),
                })?,
                None => true,
            },
            cleanup_interval_secs,
            activities_per_page,
        })
    }
}

/// Read a variable, treating unset and blank the same.
fn optional(var: &'static str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    optional(var).ok_or(ConfigError::Missing(var))
}

fn parse_or<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match optional(var) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}
