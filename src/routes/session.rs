// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie routes: sign in (`/jwt`) and sign out (`/logout`).

use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::{
    cookie::{Cookie, CookieJar, SameSite},
    WithRejection,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::middleware::auth::SESSION_COOKIE;
use crate::services::SESSION_TTL_SECS;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/jwt", post(issue_session))
        .route("/logout", post(logout))
}

/// Identity the web client posts after it has signed the user in.
/// Extra fields are accepted and ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct IdentityRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Session cookie with the attributes for the current runtime mode.
///
/// Production is served cross-site from the web app's origin, so the cookie
/// has to be `Secure; SameSite=None`. Local development stays `Strict`.
fn session_cookie(config: &Config, value: String, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .http_only(true)
        .secure(config.production)
        .same_site(if config.production {
            SameSite::None
        } else {
            SameSite::Strict
        })
        .path("/")
        .max_age(max_age)
        .build()
}

/// Issue a session token for the posted identity and set it as a cookie.
async fn issue_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Json(identity), _): WithRejection<Json<IdentityRequest>, AppError>,
) -> Result<(CookieJar, Json<SuccessResponse>)> {
    identity
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let token = state.tokens.issue(&identity.email)?;
    tracing::info!(email = %identity.email, "Session issued");

    let cookie = session_cookie(
        &state.config,
        token,
        time::Duration::seconds(SESSION_TTL_SECS),
    );

    Ok((jar.add(cookie), Json(SuccessResponse { success: true })))
}

/// Clear the session cookie. Always succeeds, signed in or not.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse>) {
    let cookie = session_cookie(&state.config, String::new(), time::Duration::ZERO);
    (jar.add(cookie), Json(SuccessResponse { success: true }))
}
