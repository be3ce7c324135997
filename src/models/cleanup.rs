// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Cleanup run results.

use super::ActivitySummary;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Minimal projection of an activity for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRef {
    pub id: u64,
    pub name: String,
    pub start_date: DateTime<Utc>,
}

impl From<&ActivitySummary> for ActivityRef {
    fn from(activity: &ActivitySummary) -> Self {
        Self {
            id: activity.id,
            name: activity.name.clone(),
            start_date: activity.start_date,
        }
    }
}

/// An indoor ride paired with the virtual ride it duplicates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityMatch {
    pub indoor_activity: ActivityRef,
    pub virtual_ride: ActivityRef,
}

/// Outcome of one cleanup run.
///
/// `hidden[i]` is always `matches[i].indoor_activity.id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanupResult {
    pub hidden: Vec<u64>,
    pub matches: Vec<ActivityMatch>,
}
