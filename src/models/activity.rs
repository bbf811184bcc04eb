// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava activity records as returned by the list endpoint.

/// A single activity from `/athlete/activities`.
///
/// Strava does not guarantee field presence or types, so records are kept as
/// raw JSON objects and read through the helpers in [`crate::display`].
pub type ActivityRecord = serde_json::Map<String, serde_json::Value>;
