// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod callback_server;
pub mod strava;
pub mod token_store;

pub use callback_server::{authorization_url, bind_addresses, CallbackServer};
pub use strava::{StravaClient, StravaService};
pub use token_store::TokenStore;
