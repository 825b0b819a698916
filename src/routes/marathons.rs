// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Marathon routes.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use mongodb::bson::{doc, oid::ObjectId, Document};
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

use super::{parse_object_id, EmailQuery};
use crate::db::{DeleteAck, InsertAck, UpdateAck};
use crate::error::{AppError, Result};
use crate::middleware::auth::{MaybeSession, Session};
use crate::models::{record_from_json, record_to_json, records_to_json, MarathonUpdate};
use crate::AppState;

/// Most marathons `GET /marathons` returns.
pub const MARATHON_LIST_LIMIT: i64 = 6;

/// Read-only marathon routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/marathons", get(list_marathons))
        .route("/marathons/{id}", get(get_marathon))
}

/// Create/update/delete. Mounted behind auth only when ownership is enforced.
pub fn write_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/marathons", post(create_marathon))
        .route("/marathons/{id}", put(update_marathon).delete(delete_marathon))
}

/// Routes scoped to the signed-in user (always behind auth).
pub fn own_routes() -> Router<Arc<AppState>> {
    Router::new().route("/myMarathons", get(my_marathons))
}

/// Filter on `_id`, narrowed to the owner's email when there is a session.
fn owned_by(id: ObjectId, session: Option<&Session>) -> Document {
    let mut filter = doc! { "_id": id };
    if let Some(session) = session {
        filter.insert("email", session.email.clone());
    }
    filter
}

async fn list_marathons(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Value>>> {
    let records = state
        .db
        .marathons
        .find(doc! {}, Some(MARATHON_LIST_LIMIT))
        .await?;

    Ok(Json(records_to_json(records)))
}

async fn create_marathon(
    State(state): State<Arc<AppState>>,
    MaybeSession(session): MaybeSession,
    WithRejection(Json(body), _): WithRejection<Json<Value>, AppError>,
) -> Result<Json<InsertAck>> {
    let mut record = record_from_json(body)?;
    if let Some(session) = session {
        record.insert("email", session.email);
    }

    let ack = state.db.marathons.insert_one(record).await?;
    tracing::info!(id = %ack.inserted_id, "Marathon created");

    Ok(Json(ack))
}

/// Returns `null` rather than 404 when the id is unknown.
async fn get_marathon(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Option<Value>>> {
    let id = parse_object_id(&id)?;
    let record = state.db.marathons.find_one(doc! { "_id": id }).await?;

    Ok(Json(record.map(record_to_json)))
}

async fn update_marathon(
    State(state): State<Arc<AppState>>,
    MaybeSession(session): MaybeSession,
    Path(id): Path<String>,
    WithRejection(Json(update), _): WithRejection<Json<MarathonUpdate>, AppError>,
) -> Result<Json<UpdateAck>> {
    let id = parse_object_id(&id)?;
    update
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    // Upsert only when writes are open; an owner-scoped upsert could collide
    // with someone else's record under the same id.
    let upsert = session.is_none();
    let ack = state
        .db
        .marathons
        .update_one(owned_by(id, session.as_ref()), update.into_patch()?, upsert)
        .await?;

    tracing::info!(
        id = %id,
        matched = ack.matched_count,
        upserted = ack.upserted_count,
        "Marathon updated"
    );

    Ok(Json(ack))
}

async fn delete_marathon(
    State(state): State<Arc<AppState>>,
    MaybeSession(session): MaybeSession,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>> {
    let id = parse_object_id(&id)?;
    let ack = state
        .db
        .marathons
        .delete_one(owned_by(id, session.as_ref()))
        .await?;

    tracing::info!(id = %id, deleted = ack.deleted_count, "Marathon delete");

    Ok(Json(ack))
}

/// Marathons created by the signed-in user, each with the marathon its
/// `marathonId` points at.
async fn my_marathons(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Value>>> {
    session.require_email(query.email.as_deref())?;

    let records = state
        .db
        .marathons
        .find(doc! { "email": session.email.as_str() }, None)
        .await?;
    let records = state.db.with_marathon_details(records).await?;

    Ok(Json(records_to_json(records)))
}
