// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod cleanup;

pub use activity::{ActivitySummary, ActivityUpdate};
pub use cleanup::{ActivityMatch, ActivityRef, CleanupResult};
