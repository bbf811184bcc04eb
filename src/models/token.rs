// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! OAuth token issued by Strava.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Token returned by the Strava token endpoint and stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Short-lived bearer credential for API calls
    pub access_token: String,
    /// Credential used to obtain a new access token
    pub refresh_token: String,
    /// Absolute expiry (Unix timestamp, seconds)
    pub expires_at: i64,
    /// Lifetime in seconds as issued
    pub expires_in: i64,
    /// Usually "Bearer"
    pub token_type: String,
    /// Athlete profile; only present on the authorization-code exchange
    #[serde(default, deserialize_with = "null_as_empty")]
    pub athlete: Map<String, Value>,
}

impl Token {
    /// Whether the token expired strictly before `now` (Unix seconds).
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at < now
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}
