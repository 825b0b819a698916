// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod marathons;
pub mod registrations;
pub mod session;

use crate::middleware::auth::require_auth;
use crate::AppState;
use axum::http::{header, HeaderValue, Method};
use axum::{extract::State, middleware, routing::get, Json, Router};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};

/// Plain-text liveness message served at `/`.
pub const LIVENESS_MESSAGE: &str = "Marathon System is running";

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// `mongodb` or `memory`.
    pub store: &'static str,
    pub ownership_enforced: bool,
}

/// `?email=` on the per-user listings.
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let config = &state.config;
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        store: if config.uses_in_memory_store() {
            "memory"
        } else {
            "mongodb"
        },
        ownership_enforced: config.enforce_ownership,
    })
}

/// Parse a path id as an ObjectId.
pub(crate) fn parse_object_id(raw: &str) -> Result<ObjectId> {
    ObjectId::parse_str(raw)
        .map_err(|_| AppError::BadRequest(format!("Invalid id '{}': expected 24 hex characters", raw)))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _request_parts: &axum::http::request::Parts| {
                allowed.iter().any(|allowed| allowed == origin)
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    // Public routes (no auth required)
    let mut public_routes = Router::new()
        .route("/", get(liveness))
        .route("/health", get(health))
        .merge(session::routes())
        .merge(marathons::routes())
        .merge(registrations::routes());

    // Protected routes (auth required)
    let mut protected_routes = marathons::own_routes().merge(registrations::own_routes());

    // Marathon writes and the full registration listing are open unless
    // ownership is enforced.
    let owner_routes = marathons::write_routes().merge(registrations::listing_routes());
    if state.config.enforce_ownership {
        tracing::info!("Ownership enforcement enabled");
        protected_routes = protected_routes.merge(owner_routes);
    } else {
        public_routes = public_routes.merge(owner_routes);
    }

    let protected_routes = protected_routes
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
