// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tests for the Strava HTTP client against a mock server.

mod common;

use common::{mock_client, token_json};
use serde_json::json;
use strava_activities::error::AppError;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_exchange_code_sends_exact_form() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string(
            "client_id=test_client_id&client_secret=test_secret\
             &code=auth-code-123&grant_type=authorization_code",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json("acc", "ref", 1_900_000_000)))
        .expect(1)
        .mount(&server)
        .await;

    let token = mock_client(&server).exchange_code("auth-code-123").await.unwrap();

    assert_eq!(token.access_token, "acc");
    assert_eq!(token.refresh_token, "ref");
    assert_eq!(token.expires_at, 1_900_000_000);
    assert_eq!(token.expires_in, 21600);
    assert_eq!(token.token_type, "Bearer");
    assert_eq!(token.athlete["firstname"], "Ada");
}

#[tokio::test]
async fn test_refresh_token_sends_exact_form() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string(
            "client_id=test_client_id&client_secret=test_secret\
             &refresh_token=old-refresh&grant_type=refresh_token",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "access_token": "new-access",
            "refresh_token": "new-refresh",
            "expires_at": 1_900_000_000,
            "expires_in": 21600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = mock_client(&server).refresh_token("old-refresh").await.unwrap();

    assert_eq!(token.access_token, "new-access");
    assert_eq!(token.refresh_token, "new-refresh");
    assert!(token.athlete.is_empty());
}

#[tokio::test]
async fn test_token_error_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"{"message":"Bad Request","errors":[{"code":"invalid"}]}"#),
        )
        .mount(&server)
        .await;

    let err = mock_client(&server).exchange_code("bad").await.unwrap_err();

    match err {
        AppError::StravaApi { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("Bad Request"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_200_success_status_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(201).set_body_json(token_json("a", "r", 1)))
        .mount(&server)
        .await;

    let err = mock_client(&server).refresh_token("r").await.unwrap_err();
    assert!(matches!(err, AppError::StravaApi { status: 201, .. }));
}

#[tokio::test]
async fn test_malformed_token_response_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = mock_client(&server).exchange_code("code").await.unwrap_err();
    assert!(matches!(err, AppError::Decode(_)));
}

#[tokio::test]
async fn test_list_activities_sends_bearer_and_per_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .and(header("authorization", "Bearer acc"))
        .and(query_param("per_page", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "Morning Run", "distance": 5012.3, "start_date_local": "2024-05-01T07:00:00Z" },
            { "id": 2, "type": "Ride" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let activities = mock_client(&server).list_activities("acc", 5).await.unwrap();

    assert_eq!(activities.len(), 2);
    assert_eq!(activities[0]["name"], "Morning Run");
    assert!(activities[1].get("name").is_none());
}

#[tokio::test]
async fn test_list_activities_unauthorized_is_plain_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .respond_with(ResponseTemplate::new(401).set_body_string(
            r#"{"message":"Authorization Error"}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let err = mock_client(&server).list_activities("stale", 10).await.unwrap_err();

    match err {
        AppError::StravaApi { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Authorization Error"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_provider_is_transport_error() {
    let port = common::free_port();
    let client = strava_activities::services::StravaClient::new(
        common::CLIENT_ID.to_string(),
        common::CLIENT_SECRET.to_string(),
    )
    .with_base_urls(
        format!("http://127.0.0.1:{}/oauth", port),
        format!("http://127.0.0.1:{}/api/v3", port),
    );

    let err = client.exchange_code("code").await.unwrap_err();
    assert!(matches!(err, AppError::Transport(_)));
}
