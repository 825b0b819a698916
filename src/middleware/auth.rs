// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT cookie authentication middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::convert::Infallible;
use std::sync::Arc;

/// Name of the httpOnly cookie holding the session token.
pub const SESSION_COOKIE: &str = "token";

/// Authenticated user, attached to the request by [`require_auth`].
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub email: String,
}

impl Session {
    /// Reject unless `requested` names this session's user.
    ///
    /// A missing email counts as a mismatch.
    pub fn require_email(&self, requested: Option<&str>) -> Result<(), AppError> {
        match requested {
            Some(email) if email == self.email => Ok(()),
            _ => {
                tracing::warn!(
                    session = %self.email,
                    requested = requested.unwrap_or(""),
                    "Cross-user access rejected"
                );
                Err(AppError::Forbidden)
            }
        }
    }
}

/// Session if the route sits behind [`require_auth`], `None` otherwise.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Session>().cloned()))
    }
}

/// Middleware that requires a valid session cookie.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let claims = state.tokens.verify(token)?;

    request.extensions_mut().insert(Session {
        email: claims.email,
    });

    Ok(next.run(request).await)
}
