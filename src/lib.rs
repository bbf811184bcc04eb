// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava-Activities: a small personal client for the Strava API.
//!
//! This crate performs the OAuth2 authorization-code flow against Strava,
//! keeps the resulting token in a local JSON file, refreshes it when it
//! expires, and lists the athlete's recent activities.

pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
