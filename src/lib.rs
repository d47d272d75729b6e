// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Vitals Tracker: daily health metrics with a local mirror
//!
//! This crate provides the backend API for recording steps, running, water,
//! sleep, gym and food entries. Every write goes to the remote store and to
//! a per-installation mirror document.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod mirror;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::ActivityTracker;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub tracker: ActivityTracker,
}
