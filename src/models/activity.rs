// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava activity models as returned and accepted by the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary activity from the `/athlete/activities` listing.
///
/// A snapshot of upstream state; it is never modified locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Strava activity ID
    pub id: u64,
    /// Activity name/title
    pub name: String,
    /// Legacy activity type (Ride, VirtualRide, Run, ...)
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Finer-grained sport type, when present
    #[serde(default)]
    pub sport_type: Option<String>,
    /// Distance in meters
    pub distance: f64,
    /// Start time (UTC)
    pub start_date: DateTime<Utc>,
    /// Only visible to the owner
    pub private: bool,
    /// Entered by hand rather than recorded by a device
    #[serde(default)]
    pub manual: bool,
    /// Upload identifier from the recording app
    #[serde(default)]
    pub external_id: Option<String>,
    /// Already hidden from the home feed
    #[serde(default)]
    pub hide_from_home: bool,
}

/// Partial update body for `PUT /activities/{id}`.
///
/// Strava has no delete endpoint for third-party apps, so duplicates are
/// hidden instead.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivityUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_from_home: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ActivityUpdate {
    /// Update that removes an activity from the home feed.
    pub fn hide_from_home() -> Self {
        Self {
            hide_from_home: Some(true),
            ..Self::default()
        }
    }
}
