// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Formatting of activity summaries for the terminal.
//!
//! Activity records come from an already-successful API response but carry
//! optional, loosely-typed fields. These helpers never fail: missing or
//! mis-typed fields fall back to placeholder values.

use serde_json::Value;

use crate::models::ActivityRecord;
use crate::time_utils::{rfc3339_to_date, unix_to_date};

/// Placeholder for a missing string field.
pub const UNKNOWN: &str = "Unknown";

/// Placeholder for a missing or unusable start date.
pub const UNKNOWN_DATE: &str = "Unknown date";

/// Header printed before the activity list.
pub const ACTIVITIES_HEADER: &str = "Your recent activities:";

/// Read `key` as a string; non-string values are rendered as JSON text.
pub fn string_field(record: &ActivityRecord, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Some(other) => other.to_string(),
        None => UNKNOWN.to_string(),
    }
}

/// `start_date_local` as `YYYY-MM-DD`.
///
/// Strings are parsed as RFC3339 (shown verbatim if that fails); numbers are
/// treated as Unix timestamps.
pub fn format_start_date(record: &ActivityRecord) -> String {
    match record.get("start_date_local") {
        Some(Value::String(s)) => rfc3339_to_date(s).unwrap_or_else(|| s.clone()),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(unix_to_date)
            .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
        _ => UNKNOWN_DATE.to_string(),
    }
}

/// Distance in kilometres; `distance` is reported by Strava in metres.
pub fn distance_km(record: &ActivityRecord) -> f64 {
    record
        .get("distance")
        .and_then(Value::as_f64)
        .map(|meters| meters / 1000.0)
        .unwrap_or(0.0)
}

/// One numbered summary line, `position` starting at 1.
pub fn format_activity_line(position: usize, record: &ActivityRecord) -> String {
    format!(
        "{}. {} ({}) - {:.2} km",
        position,
        string_field(record, "name"),
        format_start_date(record),
        distance_km(record)
    )
}

/// Header plus one line per activity.
pub fn format_activities(records: &[ActivityRecord]) -> Vec<String> {
    std::iter::once(ACTIVITIES_HEADER.to_string())
        .chain(
            records
                .iter()
                .enumerate()
                .map(|(i, record)| format_activity_line(i + 1, record)),
        )
        .collect()
}
