// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::config::ConfigError;

/// Application error type shared by the client, the token store and the
/// OAuth callback listener.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No valid token")]
    NoToken,

    #[error("Strava request failed: {0}")]
    Transport(String),

    #[error("Strava API error (HTTP {status}): {body}")]
    StravaApi { status: u16, body: String },

    #[error("Failed to parse JSON: {0}")]
    Decode(String),

    #[error("Token store error: {0}")]
    TokenStore(String),

    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status reported to the browser when this error ends a callback.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthorizationDenied(_) => StatusCode::BAD_REQUEST,
            AppError::Transport(_) | AppError::StravaApi { .. } | AppError::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Config(_)
            | AppError::NoToken
            | AppError::TokenStore(_)
            | AppError::Authorization(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Plaintext error page for the browser that hit the OAuth callback.
impl IntoResponse for &AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Callback failed");
        }
        (status, format!("Error: {}", self)).into_response()
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
