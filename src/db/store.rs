// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Collection-level store abstraction and write acknowledgments.

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::AppError;

/// A single document collection.
///
/// Filters are equality documents (`{field: value, ...}`); patches are the
/// field map of a `$set` update.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    async fn find(&self, filter: Document, limit: Option<i64>) -> Result<Vec<Document>, AppError>;
    async fn find_one(&self, filter: Document) -> Result<Option<Document>, AppError>;
    async fn insert_one(&self, record: Document) -> Result<InsertAck, AppError>;
    async fn update_one(
        &self,
        filter: Document,
        patch: Document,
        upsert: bool,
    ) -> Result<UpdateAck, AppError>;
    async fn delete_one(&self, filter: Document) -> Result<DeleteAck, AppError>;
}

/// Acknowledgment of an insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: String,
}

/// Acknowledgment of an update (with or without upsert).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UpdateAck {
    pub acknowledged: bool,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub matched_count: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub modified_count: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

/// Acknowledgment of a delete.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteAck {
    pub acknowledged: bool,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub deleted_count: u64,
}

impl InsertAck {
    pub fn new(inserted_id: &Bson) -> Self {
        Self {
            acknowledged: true,
            inserted_id: id_to_string(inserted_id),
        }
    }
}

impl UpdateAck {
    pub fn new(matched_count: u64, modified_count: u64, upserted_id: Option<&Bson>) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_count: u64::from(upserted_id.is_some()),
            upserted_id: upserted_id.map(id_to_string),
        }
    }
}

impl DeleteAck {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

/// Render a document id the way the web client sees it: ObjectIds as hex.
pub fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_insert_ack_serializes_hex_id() {
        let oid = ObjectId::new();
        let ack = InsertAck::new(&Bson::ObjectId(oid));
        let json = serde_json::to_value(&ack).unwrap();

        assert_eq!(json["acknowledged"], true);
        assert_eq!(json["insertedId"], oid.to_hex());
    }

    #[test]
    fn test_update_ack_counts_upsert() {
        let oid = ObjectId::new();
        let upserted = UpdateAck::new(0, 0, Some(&Bson::ObjectId(oid)));
        assert_eq!(upserted.upserted_count, 1);
        assert_eq!(upserted.upserted_id, Some(oid.to_hex()));

        let matched = UpdateAck::new(1, 1, None);
        let json = serde_json::to_value(&matched).unwrap();
        assert_eq!(json["matchedCount"], 1);
        assert_eq!(json["upsertedCount"], 0);
        assert!(json["upsertedId"].is_null());
    }

    #[test]
    fn test_delete_ack_shape() {
        let json = serde_json::to_value(DeleteAck::new(0)).unwrap();
        assert_eq!(json, serde_json::json!({"acknowledged": true, "deletedCount": 0}));
    }
}
