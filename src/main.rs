// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava-Activities CLI
//!
//! Authorizes against Strava (or reuses the stored token) and prints the
//! athlete's most recent activities.

use strava_activities::{config::Config, display, services::StravaService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Fatal error");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        token_path = %config.token_path.display(),
        redirect_uri = %config.credentials.redirect_uri,
        "Starting Strava-Activities"
    );

    let mut strava = StravaService::from_config(&config);
    strava.initialize().await?;

    let activities = strava
        .fetch_recent_activities(config.activity_limit)
        .await?;
    tracing::info!(count = activities.len(), "Activities fetched");

    for line in display::format_activities(&activities) {
        println!("{}", line);
    }
    Ok(())
}

/// Initialize logging on stderr; `LOG_FORMAT=json` selects structured JSON.
fn init_logging() {
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .with_current_span(true)
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("strava_activities=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(json_layer)
        .with(text_layer)
        .init();
}
