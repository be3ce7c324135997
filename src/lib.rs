// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava-Dedup: hide indoor rides that duplicate a virtual ride
//!
//! A trainer workout recorded both as a zero-distance "Ride" and as a
//! "VirtualRide" from the training app is cleaned up by hiding the indoor
//! copy from the home feed. Runs on a timer and on demand over HTTP.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use services::CleanupService;

/// Shared application state.
pub struct AppState {
    pub cleanup: CleanupService,
}
