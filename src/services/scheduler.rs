// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Periodic cleanup timer.

use crate::services::CleanupService;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Run cleanup every `period`, starting one period from now.
///
/// Outcomes are only logged. A failed run does not stop the timer.
pub fn spawn_cleanup_timer(cleanup: CleanupService, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            tracing::debug!("Timer cleanup run starting");

            match cleanup.run().await {
                Ok(result) if !result.hidden.is_empty() => {
                    tracing::info!(
                        hidden = result.hidden.len(),
                        ids = ?result.hidden,
                        "Hidden duplicate activities"
                    );
                }
                Ok(_) => tracing::debug!("No duplicate activities found"),
                Err(e) => tracing::error!(error = %e, "Cleanup failed"),
            }
        }
    })
}
