// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava OAuth redirect handler.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};

use crate::error::{AppError, Result};
use crate::models::Token;
use crate::services::{StravaClient, TokenStore};

/// Result handed from the callback handler to the waiting initializer.
pub type CallbackOutcome = Result<Token>;

pub const SUCCESS_MESSAGE: &str = "Authentication successful! You can close this window.";
pub const ALREADY_HANDLED_MESSAGE: &str = "Authorization already handled. You can close this window.";

/// Shared state for the callback route.
pub struct CallbackState {
    client: StravaClient,
    store: TokenStore,
    /// Taken by the first request; later requests find `None`.
    outcome_tx: Mutex<Option<oneshot::Sender<CallbackOutcome>>>,
}

impl CallbackState {
    /// Create the state and the receiving half of the rendezvous.
    pub fn new(
        client: StravaClient,
        store: TokenStore,
    ) -> (Arc<Self>, oneshot::Receiver<CallbackOutcome>) {
        let (tx, rx) = oneshot::channel();
        let state = Arc::new(Self {
            client,
            store,
            outcome_tx: Mutex::new(Some(tx)),
        });
        (state, rx)
    }
}

pub fn routes(path: &str) -> Router<Arc<CallbackState>> {
    Router::new().route(path, get(oauth_callback))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth redirect: exchange the code, persist the token, report the outcome.
///
/// The exchange runs on its own task that owns the rendezvous sender, so a
/// browser that disconnects mid-request cannot cancel it.
async fn oauth_callback(
    State(state): State<Arc<CallbackState>>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let Some(outcome_tx) = state.outcome_tx.lock().await.take() else {
        tracing::warn!("Ignoring repeated OAuth callback");
        return (StatusCode::CONFLICT, ALREADY_HANDLED_MESSAGE).into_response();
    };

    let task = tokio::spawn(async move {
        let outcome = complete_authorization(&state, params).await;
        let response = match &outcome {
            Ok(_) => (StatusCode::OK, SUCCESS_MESSAGE).into_response(),
            Err(e) => e.into_response(),
        };

        if outcome_tx.send(outcome).is_err() {
            tracing::warn!("Initializer stopped waiting before the callback completed");
        }
        response
    });

    task.await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Callback task failed");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}

async fn complete_authorization(state: &CallbackState, params: CallbackParams) -> Result<Token> {
    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        let error = params
            .error
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| "missing authorization code".to_string());
        tracing::warn!(error = %error, "OAuth error from Strava");
        return Err(AppError::AuthorizationDenied(error));
    };

    tracing::info!("Exchanging authorization code for tokens");

    let token = state
        .client
        .exchange_code(&code)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Strava token exchange failed"))?;

    state
        .store
        .save(&token)
        .inspect_err(|e| tracing::error!(error = %e, "Failed to persist token"))?;

    tracing::info!(expires_at = token.expires_at, "OAuth successful, token stored");
    Ok(token)
}
