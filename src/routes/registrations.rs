// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration (marathon application) routes.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use mongodb::bson::doc;
use serde_json::Value;
use std::sync::Arc;

use super::EmailQuery;
use crate::db::InsertAck;
use crate::error::{AppError, Result};
use crate::middleware::auth::{MaybeSession, Session};
use crate::models::{record_from_json, records_to_json};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/registrations", post(create_registration))
}

/// Full listing. Mounted behind auth only when ownership is enforced.
pub fn listing_routes() -> Router<Arc<AppState>> {
    Router::new().route("/registrations", get(list_registrations))
}

pub fn own_routes() -> Router<Arc<AppState>> {
    Router::new().route("/myApply", get(my_applications))
}

async fn create_registration(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(body), _): WithRejection<Json<Value>, AppError>,
) -> Result<Json<InsertAck>> {
    let record = record_from_json(body)?;
    let ack = state.db.registrations.insert_one(record).await?;
    tracing::info!(id = %ack.inserted_id, "Registration created");

    Ok(Json(ack))
}

/// Every registration, or only the caller's when behind auth.
async fn list_registrations(
    State(state): State<Arc<AppState>>,
    MaybeSession(session): MaybeSession,
) -> Result<Json<Vec<Value>>> {
    let filter = match session {
        Some(session) => doc! { "userEmail": session.email },
        None => doc! {},
    };

    let records = state.db.registrations.find(filter, None).await?;
    Ok(Json(records_to_json(records)))
}

/// The signed-in user's registrations, each with its marathon attached.
async fn my_applications(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Value>>> {
    session.require_email(query.email.as_deref())?;

    let records = state
        .db
        .registrations
        .find(doc! { "userEmail": session.email.as_str() }, None)
        .await?;
    let records = state.db.with_marathon_details(records).await?;

    Ok(Json(records_to_json(records)))
}
