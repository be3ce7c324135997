// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Indoor ride / virtual ride duplicate detection.
//!
//! A trainer session often shows up twice: once as a zero-distance "Ride"
//! logged by hand or by a head unit, and once as a "VirtualRide" uploaded
//! by the training app. The only correlation signal is start time.

use crate::models::{ActivityMatch, ActivitySummary};
use chrono::TimeDelta;

const BIKE_RIDE_ACTIVITY_TYPE: &str = "Ride";
const VIRTUAL_RIDE_ACTIVITY_TYPE: &str = "VirtualRide";

/// Maximum start time difference for two activities to be the same workout.
pub const MATCH_WINDOW_SECS: i64 = 60 * 60;

/// A "Ride" with no recorded distance.
pub fn is_indoor_candidate(activity: &ActivitySummary) -> bool {
    activity.activity_type == BIKE_RIDE_ACTIVITY_TYPE && activity.distance == 0.0
}

/// Still shown on the public feed.
pub fn is_visible(activity: &ActivitySummary) -> bool {
    !activity.private && !activity.hide_from_home
}

pub fn is_virtual_ride(activity: &ActivitySummary) -> bool {
    activity.activity_type == VIRTUAL_RIDE_ACTIVITY_TYPE
}

/// Start times at most one hour apart (inclusive).
pub fn within_one_hour(a: &ActivitySummary, b: &ActivitySummary) -> bool {
    (a.start_date - b.start_date).abs() <= TimeDelta::seconds(MATCH_WINDOW_SECS)
}

/// Pair each visible indoor candidate with the first virtual ride that
/// started within the match window.
///
/// Results follow the input order of the indoor candidates. A virtual ride
/// is not consumed by a match and can pair with several indoor candidates.
pub fn find_duplicates(activities: &[ActivitySummary]) -> Vec<ActivityMatch> {
    let virtual_rides: Vec<&ActivitySummary> =
        activities.iter().filter(|a| is_virtual_ride(a)).collect();

    activities
        .iter()
        .filter(|a| is_indoor_candidate(a) && is_visible(a))
        .filter_map(|indoor| {
            virtual_rides
                .iter()
                .find(|vr| within_one_hour(indoor, vr))
                .map(|vr| ActivityMatch {
                    indoor_activity: indoor.into(),
                    virtual_ride: (*vr).into(),
                })
        })
        .collect()
}
