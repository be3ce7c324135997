// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod cleanup;
pub mod dedup;
pub mod scheduler;
pub mod strava;
pub mod token;

pub use cleanup::CleanupService;
pub use scheduler::spawn_cleanup_timer;
pub use strava::{StravaClient, StravaService};
pub use token::{Clock, SystemClock, TokenManager, TokenRefresher, TokenState};
