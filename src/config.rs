// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local use.

use reqwest::Url;
use std::env;
use std::path::PathBuf;

const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/callback";
const DEFAULT_TOKEN_PATH: &str = "strava_token.json";
pub const DEFAULT_OAUTH_URL: &str = "https://www.strava.com/oauth";
pub const DEFAULT_API_URL: &str = "https://www.strava.com/api/v3";
const DEFAULT_ACTIVITY_LIMIT: u32 = 10;

/// Strava OAuth application credentials, fixed for the process lifetime.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Strava OAuth client ID
    pub client_id: String,
    /// Strava OAuth client secret
    pub client_secret: String,
    /// Redirect target registered with Strava; the callback listener binds
    /// to its port and serves its path.
    pub redirect_uri: Url,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    /// Location of the persisted token document
    pub token_path: PathBuf,
    /// Base URL for `/authorize` and `/token`
    pub oauth_base_url: String,
    /// Base URL for the REST API
    pub api_base_url: String,
    /// Number of activities to fetch
    pub activity_limit: u32,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            credentials: Credentials {
                client_id: "test_client_id".to_string(),
                client_secret: "test_secret".to_string(),
                redirect_uri: Url::parse(DEFAULT_REDIRECT_URI)
                    .expect("default redirect URI is valid"),
            },
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            oauth_base_url: DEFAULT_OAUTH_URL.to_string(),
            api_base_url: DEFAULT_API_URL.to_string(),
            activity_limit: DEFAULT_ACTIVITY_LIMIT,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let redirect_uri = env::var("STRAVA_REDIRECT_URI")
            .unwrap_or_else(|_| DEFAULT_REDIRECT_URI.to_string());

        let activity_limit = match env::var("STRAVA_ACTIVITY_LIMIT") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or_else(|| ConfigError::Invalid("STRAVA_ACTIVITY_LIMIT", raw.clone()))?,
            Err(_) => DEFAULT_ACTIVITY_LIMIT,
        };

        Ok(Self {
            credentials: Credentials {
                client_id: required("STRAVA_CLIENT_ID")?,
                client_secret: required("STRAVA_CLIENT_SECRET")?,
                redirect_uri: parse_redirect_uri(&redirect_uri)?,
            },
            token_path: env::var("STRAVA_TOKEN_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_TOKEN_PATH)),
            oauth_base_url: env::var("STRAVA_OAUTH_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_OAUTH_URL.to_string()),
            api_base_url: env::var("STRAVA_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            activity_limit,
        })
    }
}

/// Read a required, non-empty environment variable.
fn required(name: &'static str) -> Result<String, ConfigError> {
    let value = env::var(name).map_err(|_| ConfigError::Missing(name))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Invalid(name, String::new()));
    }
    Ok(value.to_string())
}

/// Validate the redirect target: the listener needs a port and a path.
pub fn parse_redirect_uri(raw: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::Invalid("STRAVA_REDIRECT_URI", raw.to_string());

    let url = Url::parse(raw).map_err(|_| invalid())?;
    if url.scheme() != "http" || url.host_str().is_none() || url.port_or_known_default().is_none()
    {
        return Err(invalid());
    }
    if url.path().is_empty() || url.path() == "/" {
        return Err(invalid());
    }
    Ok(url)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_redirect_uri_accepts_localhost_callback() {
        let url = parse_redirect_uri("http://localhost:8080/callback").unwrap();
        assert_eq!(url.port_or_known_default(), Some(8080));
        assert_eq!(url.path(), "/callback");
    }

    #[test]
    fn test_parse_redirect_uri_defaults_port_80() {
        let url = parse_redirect_uri("http://127.0.0.1/cb").unwrap();
        assert_eq!(url.port_or_known_default(), Some(80));
    }

    #[test]
    fn test_parse_redirect_uri_rejects_bad_values() {
        assert!(parse_redirect_uri("not a url").is_err());
        assert!(parse_redirect_uri("https://localhost:8080/callback").is_err());
        assert!(parse_redirect_uri("http://localhost:8080/").is_err());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.activity_limit, 10);
        assert_eq!(config.token_path, PathBuf::from("strava_token.json"));
        assert_eq!(config.credentials.redirect_uri.path(), "/callback");
    }
}
