// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Marathon registration API
//!
//! This crate provides the backend for a marathon-registration web app:
//! marathon listings, applicant registrations, and cookie-based sessions.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Database;
use services::TokenService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Self {
        let tokens = TokenService::new(&config.jwt_signing_key);
        Self { config, db, tokens }
    }
}
