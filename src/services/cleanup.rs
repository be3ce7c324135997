// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cleanup run: fetch, match, hide.
//!
//! Not transactional. The first failing call aborts the run; activities
//! hidden earlier in the same run stay hidden.

use crate::error::Result;
use crate::models::CleanupResult;
use crate::services::dedup::find_duplicates;
use crate::services::StravaService;

/// Runs duplicate cleanup against the Strava account.
#[derive(Clone)]
pub struct CleanupService {
    strava: StravaService,
    per_page: u32,
}

impl CleanupService {
    pub fn new(strava: StravaService, per_page: u32) -> Self {
        Self { strava, per_page }
    }

    /// Hide every indoor ride that duplicates a virtual ride.
    pub async fn run(&self) -> Result<CleanupResult> {
        let activities = self.strava.list_activities(1, self.per_page).await?;
        let matches = find_duplicates(&activities);

        tracing::info!(
            fetched = activities.len(),
            matched = matches.len(),
            "Fetched activities"
        );

        let mut result = CleanupResult::default();
        for pair in matches {
            let indoor_id = pair.indoor_activity.id;
            self.strava.hide_activity(indoor_id).await?;

            tracing::info!(
                indoor_id,
                indoor_name = %pair.indoor_activity.name,
                virtual_id = pair.virtual_ride.id,
                virtual_name = %pair.virtual_ride.name,
                "Hid duplicate indoor ride"
            );

            result.hidden.push(indoor_id);
            result.matches.push(pair);
        }

        Ok(result)
    }
}
