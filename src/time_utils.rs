// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format a Unix timestamp (seconds) as RFC3339, if representable.
pub fn format_unix_rfc3339(secs: i64) -> Option<String> {
    DateTime::from_timestamp(secs, 0).map(format_utc_rfc3339)
}

/// Calendar date (`YYYY-MM-DD`) of an RFC3339 timestamp, in its own offset.
pub fn rfc3339_to_date(value: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}

/// Calendar date (`YYYY-MM-DD`) of a Unix timestamp, in UTC.
pub fn unix_to_date(secs: i64) -> Option<String> {
    DateTime::from_timestamp(secs, 0).map(|date| date.format("%Y-%m-%d").to_string())
}
