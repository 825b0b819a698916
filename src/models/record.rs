// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Conversion between JSON request/response bodies and stored documents.
//!
//! Marathons and registrations are schemaless: whatever object the client
//! posts is stored as-is. Going out, ObjectIds are rendered as hex strings
//! and other BSON types as relaxed extended JSON.

use mongodb::bson::{Bson, Document};
use serde_json::Value;

use crate::error::AppError;

/// Convert a JSON request body into a document. Only objects are accepted.
pub fn record_from_json(value: Value) -> Result<Document, AppError> {
    if !value.is_object() {
        return Err(AppError::BadRequest(
            "Request body must be a JSON object".to_string(),
        ));
    }

    mongodb::bson::to_document(&value)
        .map_err(|e| AppError::BadRequest(format!("Unsupported request body: {}", e)))
}

/// Convert a stored document into its JSON representation.
pub fn record_to_json(record: Document) -> Value {
    bson_to_json(Bson::Document(record))
}

pub fn records_to_json(records: Vec<Document>) -> Vec<Value> {
    records.into_iter().map(record_to_json).collect()
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::Document(doc) => Value::Object(
            doc.into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}
