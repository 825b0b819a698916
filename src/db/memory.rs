// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process collection with MongoDB-compatible filter, upsert and ack
//! semantics. Used by the test suite and for running without a database.

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use tokio::sync::RwLock;

use crate::db::store::{DeleteAck, DocumentCollection, InsertAck, UpdateAck};
use crate::error::AppError;

/// Documents kept in insertion (natural) order.
#[derive(Default)]
pub struct MemoryCollection {
    records: RwLock<Vec<Document>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(record: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| record.get(key) == Some(expected))
}

/// Prepend a fresh `_id` unless the record already carries one.
fn with_id(record: Document) -> (Bson, Document) {
    if let Some(id) = record.get("_id") {
        return (id.clone(), record);
    }

    let id = Bson::ObjectId(ObjectId::new());
    let mut stored = Document::new();
    stored.insert("_id", id.clone());
    for (key, value) in record {
        stored.insert(key, value);
    }
    (id, stored)
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn find(&self, filter: Document, limit: Option<i64>) -> Result<Vec<Document>, AppError> {
        let records = self.records.read().await;
        let matching = records.iter().filter(|r| matches(r, &filter)).cloned();

        // Mirrors MongoDB: a limit of zero means no limit.
        Ok(match limit {
            Some(n) if n != 0 => matching.take(n.unsigned_abs() as usize).collect(),
            _ => matching.collect(),
        })
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, AppError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| matches(r, &filter)).cloned())
    }

    async fn insert_one(&self, record: Document) -> Result<InsertAck, AppError> {
        let (id, stored) = with_id(record);
        let mut records = self.records.write().await;

        if records.iter().any(|r| r.get("_id") == Some(&id)) {
            return Err(AppError::Database(format!(
                "E11000 duplicate key error: _id {}",
                id
            )));
        }

        records.push(stored);
        Ok(InsertAck::new(&id))
    }

    async fn update_one(
        &self,
        filter: Document,
        patch: Document,
        upsert: bool,
    ) -> Result<UpdateAck, AppError> {
        let mut records = self.records.write().await;

        if let Some(record) = records.iter_mut().find(|r| matches(r, &filter)) {
            let changed = patch
                .iter()
                .any(|(key, value)| record.get(key) != Some(value));
            for (key, value) in patch {
                record.insert(key, value);
            }
            return Ok(UpdateAck::new(1, u64::from(changed), None));
        }

        if !upsert {
            return Ok(UpdateAck::new(0, 0, None));
        }

        // The upserted document is seeded from the equality filter, then patched.
        let mut seeded = filter;
        for (key, value) in patch {
            seeded.insert(key, value);
        }
        let (id, stored) = with_id(seeded);
        records.push(stored);
        Ok(UpdateAck::new(0, 0, Some(&id)))
    }

    async fn delete_one(&self, filter: Document) -> Result<DeleteAck, AppError> {
        let mut records = self.records.write().await;

        match records.iter().position(|r| matches(r, &filter)) {
            Some(index) => {
                records.remove(index);
                Ok(DeleteAck::new(1))
            }
            None => Ok(DeleteAck::new(0)),
        }
    }
}
