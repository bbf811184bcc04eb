// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Short-lived local HTTP listener that receives the OAuth redirect.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use axum::Router;
use reqwest::Url;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{AppError, Result};

/// Scopes requested from Strava.
pub const OAUTH_SCOPES: &str = "read,activity:read_all";

/// Build the URL the user opens to grant access.
pub fn authorization_url(oauth_base_url: &str, client_id: &str, redirect_uri: &Url) -> String {
    format!(
        "{}/authorize?\
         client_id={}&\
         redirect_uri={}&\
         response_type=code&\
         scope={}",
        oauth_base_url,
        client_id,
        urlencoding::encode(redirect_uri.as_str()),
        OAUTH_SCOPES
    )
}

/// Addresses to listen on for a redirect target.
///
/// `localhost` binds both loopback families, since browsers may resolve it
/// to either. IP literals bind exactly that address; any other host name
/// binds every IPv4 interface.
pub fn bind_addresses(redirect_uri: &Url) -> Result<Vec<SocketAddr>> {
    let port = redirect_uri.port_or_known_default().ok_or_else(|| {
        AppError::Authorization(format!("redirect URI {} has no port", redirect_uri))
    })?;

    let host = redirect_uri.host_str().unwrap_or_default();
    let ips = match host.trim_start_matches('[').trim_end_matches(']').parse::<IpAddr>() {
        Ok(ip) => vec![ip],
        Err(_) if host.eq_ignore_ascii_case("localhost") => vec![
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V6(Ipv6Addr::LOCALHOST),
        ],
        Err(_) => vec![IpAddr::V4(Ipv4Addr::UNSPECIFIED)],
    };

    Ok(ips.into_iter().map(|ip| SocketAddr::new(ip, port)).collect())
}

/// Running callback listener.
///
/// Dropping the guard signals graceful shutdown, so the listener cannot
/// outlive the authorization attempt on any path.
pub struct CallbackServer {
    local_addrs: Vec<SocketAddr>,
    shutdown_tx: Option<watch::Sender<bool>>,
    handles: Vec<JoinHandle<()>>,
}

impl CallbackServer {
    /// Bind `addrs` and serve `router` on background tasks.
    ///
    /// The first address must bind; later ones are skipped with a warning
    /// (e.g. `::1` on a host without IPv6).
    pub async fn bind(addrs: &[SocketAddr], router: Router) -> Result<Self> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut server = Self {
            local_addrs: Vec::with_capacity(addrs.len()),
            shutdown_tx: Some(shutdown_tx),
            handles: Vec::with_capacity(addrs.len()),
        };

        for (i, addr) in addrs.iter().enumerate() {
            let listener = match TcpListener::bind(*addr).await {
                Ok(listener) => listener,
                Err(e) if i > 0 => {
                    tracing::warn!(address = %addr, error = %e, "Skipping callback address");
                    continue;
                }
                Err(e) => {
                    return Err(AppError::Authorization(format!(
                        "failed to bind callback listener on {}: {}",
                        addr, e
                    )))
                }
            };
            let local_addr = listener.local_addr().map_err(|e| {
                AppError::Authorization(format!("callback listener has no address: {}", e))
            })?;

            let mut shutdown_rx = shutdown_rx.clone();
            let router = router.clone();
            server.handles.push(tokio::spawn(async move {
                let result = axum::serve(listener, router)
                    .with_graceful_shutdown(async move {
                        let _ = shutdown_rx.wait_for(|stop| *stop).await;
                    })
                    .await;
                if let Err(e) = result {
                    tracing::error!(error = %e, "Callback listener error");
                }
            }));

            tracing::info!(address = %local_addr, "Callback listener started");
            server.local_addrs.push(local_addr);
        }

        if server.local_addrs.is_empty() {
            return Err(AppError::Authorization(
                "no callback address to listen on".to_string(),
            ));
        }
        Ok(server)
    }

    pub fn local_addrs(&self) -> &[SocketAddr] {
        &self.local_addrs
    }

    /// Stop accepting connections and wait for in-flight responses.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(true);
        }
        for handle in self.handles.drain(..) {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Callback listener task failed");
            }
        }
        tracing::info!(addresses = ?self.local_addrs, "Callback listener stopped");
    }
}

impl Drop for CallbackServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(true);
            tracing::debug!(addresses = ?self.local_addrs, "Callback listener dropped");
        }
    }
}
