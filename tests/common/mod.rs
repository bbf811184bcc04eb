// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use reqwest::Url;
use serde_json::{json, Map, Value};
use std::path::Path;
use std::time::Duration;
use strava_activities::models::Token;
use strava_activities::services::{StravaClient, StravaService, TokenStore};
use wiremock::MockServer;

pub const CLIENT_ID: &str = "test_client_id";
pub const CLIENT_SECRET: &str = "test_secret";

/// Token with the given expiry and a small athlete profile.
#[allow(dead_code)]
pub fn sample_token(access_token: &str, expires_at: i64) -> Token {
    let mut athlete = Map::new();
    athlete.insert("id".to_string(), json!(1234567));
    athlete.insert("firstname".to_string(), json!("Ada"));

    Token {
        access_token: access_token.to_string(),
        refresh_token: format!("{}-refresh", access_token),
        expires_at,
        expires_in: 21600,
        token_type: "Bearer".to_string(),
        athlete,
    }
}

/// Token endpoint response body.
#[allow(dead_code)]
pub fn token_json(access_token: &str, refresh_token: &str, expires_at: i64) -> Value {
    json!({
        "token_type": "Bearer",
        "access_token": access_token,
        "refresh_token": refresh_token,
        "expires_at": expires_at,
        "expires_in": 21600,
        "athlete": { "id": 1234567, "firstname": "Ada" }
    })
}

/// Client pointed at the mock server's `/oauth` and `/api/v3` prefixes.
#[allow(dead_code)]
pub fn mock_client(server: &MockServer) -> StravaClient {
    StravaClient::new(CLIENT_ID.to_string(), CLIENT_SECRET.to_string()).with_base_urls(
        format!("{}/oauth", server.uri()),
        format!("{}/api/v3", server.uri()),
    )
}

/// Service using the mock server, a token file at `token_path`, and a
/// redirect target on `port`.
#[allow(dead_code)]
pub fn mock_service(server: &MockServer, token_path: &Path, port: u16) -> StravaService {
    let redirect = Url::parse(&format!("http://127.0.0.1:{}/callback", port)).unwrap();
    StravaService::new(mock_client(server), TokenStore::new(token_path), redirect)
}

/// Pick a currently unused local port.
#[allow(dead_code)]
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// GET `url`, retrying while the listener is still starting.
#[allow(dead_code)]
pub async fn get_with_retry(url: &str) -> reqwest::Response {
    for _ in 0..100 {
        match reqwest::get(url).await {
            Ok(response) => return response,
            Err(e) if e.is_connect() => tokio::time::sleep(Duration::from_millis(50)).await,
            Err(e) => panic!("callback request failed: {}", e),
        }
    }
    panic!("callback listener never came up at {}", url);
}

#[allow(dead_code)]
pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}
