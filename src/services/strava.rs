// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client and token lifecycle.
//!
//! Handles:
//! - Authorization-code exchange via a local callback listener
//! - Token persistence and refresh when expired
//! - Listing recent activities

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::config::{Config, Credentials, DEFAULT_API_URL, DEFAULT_OAUTH_URL};
use crate::error::{AppError, Result};
use crate::models::{ActivityRecord, Token};
use crate::routes::{self, CallbackState};
use crate::services::callback_server::{authorization_url, bind_addresses, CallbackServer};
use crate::services::TokenStore;
use crate::time_utils::format_unix_rfc3339;

/// Strava API client.
#[derive(Debug, Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    oauth_base_url: String,
    api_base_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            oauth_base_url: DEFAULT_OAUTH_URL.to_string(),
            api_base_url: DEFAULT_API_URL.to_string(),
            client_id,
            client_secret,
        }
    }

    /// Point the client at different endpoints (e.g. a mock server).
    pub fn with_base_urls(
        mut self,
        oauth_base_url: impl Into<String>,
        api_base_url: impl Into<String>,
    ) -> Self {
        self.oauth_base_url = oauth_base_url.into();
        self.api_base_url = api_base_url.into();
        self
    }

    pub fn oauth_base_url(&self) -> &str {
        &self.oauth_base_url
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Exchange an authorization code for a token.
    pub async fn exchange_code(&self, code: &str) -> Result<Token> {
        self.token_request("code", code, "authorization_code").await
    }

    /// Refresh an expired access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Token> {
        self.token_request("refresh_token", refresh_token, "refresh_token")
            .await
    }

    /// List the athlete's most recent activities.
    pub async fn list_activities(
        &self,
        access_token: &str,
        per_page: u32,
    ) -> Result<Vec<ActivityRecord>> {
        let url = format!("{}/athlete/activities", self.api_base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("per_page", per_page.to_string())])
            .send()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        check_response_json(response).await
    }

    /// POST the four-field form shared by both grant types.
    async fn token_request(&self, field: &str, value: &str, grant_type: &str) -> Result<Token> {
        let url = format!("{}/token", self.oauth_base_url);

        let response = self
            .http
            .post(&url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                (field, value),
                ("grant_type", grant_type),
            ])
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Token request failed: {}", e)))?;

        check_response_json(response).await
    }
}

/// Require HTTP 200 and decode the JSON body.
async fn check_response_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AppError::Transport(format!("Failed to read response body: {}", e)))?;

    if status != StatusCode::OK {
        return Err(AppError::StravaApi {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| AppError::Decode(e.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// StravaService - token lifecycle and API calls
// ─────────────────────────────────────────────────────────────────────────────

/// High-level Strava service that owns the current token.
///
/// The token is loaded (or obtained) once by [`StravaService::initialize`];
/// afterwards calls are strictly sequential, so no locking is needed.
#[derive(Debug)]
pub struct StravaService {
    client: StravaClient,
    store: TokenStore,
    redirect_uri: Url,
    token: Option<Token>,
}

impl StravaService {
    pub fn new(client: StravaClient, store: TokenStore, redirect_uri: Url) -> Self {
        Self {
            client,
            store,
            redirect_uri,
            token: None,
        }
    }

    /// Build the service from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        let Credentials {
            client_id,
            client_secret,
            redirect_uri,
        } = config.credentials.clone();

        let client = StravaClient::new(client_id, client_secret)
            .with_base_urls(&config.oauth_base_url, &config.api_base_url);

        Self::new(client, TokenStore::new(&config.token_path), redirect_uri)
    }

    /// The current token, once initialized.
    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    // ─── Token Management ────────────────────────────────────────────────────

    /// Load, refresh, or obtain a token.
    ///
    /// 1. A stored token that has not expired is used as-is
    /// 2. An expired stored token is refreshed; failure is fatal
    /// 3. Without a readable stored token, the authorization flow runs
    pub async fn initialize(&mut self) -> Result<&Token> {
        let now = chrono::Utc::now().timestamp();

        let token = match self.store.load() {
            Ok(stored) if stored.is_expired_at(now) => {
                tracing::info!(
                    expires_at = %format_unix_rfc3339(stored.expires_at).unwrap_or_default(),
                    "Access token expired, refreshing"
                );
                self.refresh(stored).await?
            }
            Ok(stored) => {
                tracing::info!(
                    expires_at = %format_unix_rfc3339(stored.expires_at).unwrap_or_default(),
                    "Using stored token"
                );
                stored
            }
            Err(e) => {
                tracing::info!(error = %e, "No valid token found, starting OAuth flow");
                self.authorize().await?
            }
        };

        Ok(&*self.token.insert(token))
    }

    /// Refresh `stale` and persist the result.
    async fn refresh(&self, stale: Token) -> Result<Token> {
        let mut fresh = self
            .client
            .refresh_token(&stale.refresh_token)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to refresh token"))?;

        // The refresh grant does not return the athlete profile.
        if fresh.athlete.is_empty() {
            fresh.athlete = stale.athlete;
        }

        self.store.save(&fresh)?;
        tracing::info!("Token refreshed and stored");
        Ok(fresh)
    }

    /// Run the authorization-code flow and wait for the redirect.
    async fn authorize(&self) -> Result<Token> {
        let (state, outcome_rx) = CallbackState::new(self.client.clone(), self.store.clone());
        let router = routes::create_router(self.redirect_uri.path(), state);
        let server = CallbackServer::bind(&bind_addresses(&self.redirect_uri)?, router).await?;

        let auth_url = authorization_url(
            self.client.oauth_base_url(),
            self.client.client_id(),
            &self.redirect_uri,
        );
        tracing::info!(client_id = %self.client.client_id(), "Starting OAuth flow");
        println!(
            "Open this URL in your browser to authorize the application:\n{}",
            auth_url
        );

        let outcome = outcome_rx.await;
        server.shutdown().await;

        outcome.map_err(|_| {
            AppError::Authorization("callback listener closed without a result".to_string())
        })?
    }

    // ─── API Wrappers ────────────────────────────────────────────────────────

    /// Fetch up to `limit` recent activities with the current token.
    pub async fn fetch_recent_activities(&self, limit: u32) -> Result<Vec<ActivityRecord>> {
        let token = self.token.as_ref().ok_or(AppError::NoToken)?;
        self.client
            .list_activities(&token.access_token, limit)
            .await
    }
}
