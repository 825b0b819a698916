// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (MongoDB, with an in-process fallback).

pub mod memory;
pub mod mongo;
pub mod store;

pub use memory::MemoryCollection;
pub use mongo::MongoCollection;
pub use store::{DeleteAck, DocumentCollection, InsertAck, UpdateAck};

use crate::config::Config;
use crate::error::AppError;
use futures_util::{stream, StreamExt, TryStreamExt};
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use std::sync::Arc;

const MAX_CONCURRENT_DB_OPS: usize = 16;

/// Collection names as constants.
pub mod collections {
    pub const MARATHONS: &str = "marathons";
    pub const REGISTRATIONS: &str = "registrations";
}

/// Field on a record that references a marathon by id.
pub const MARATHON_REF: &str = "marathonId";
/// Key under which the referenced marathon is attached at read time.
pub const MARATHON_DETAILS: &str = "marathon";

/// Store handle shared by all requests.
#[derive(Clone)]
pub struct Database {
    pub marathons: Arc<dyn DocumentCollection>,
    pub registrations: Arc<dyn DocumentCollection>,
    client: Option<mongodb::Client>,
}

impl Database {
    /// Open the store named by the configuration.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        if config.uses_in_memory_store() {
            tracing::warn!("Using in-memory store; data will not survive a restart");
            return Ok(Self::in_memory());
        }

        let (client, db) = mongo::connect(&config.mongodb_uri, &config.mongodb_database).await?;

        Ok(Self {
            marathons: Arc::new(MongoCollection::new(&db, collections::MARATHONS)),
            registrations: Arc::new(MongoCollection::new(&db, collections::REGISTRATIONS)),
            client: Some(client),
        })
    }

    /// Create an empty in-process store.
    pub fn in_memory() -> Self {
        Self {
            marathons: Arc::new(MemoryCollection::new()),
            registrations: Arc::new(MemoryCollection::new()),
            client: None,
        }
    }

    /// Close the underlying client, waiting for in-flight operations.
    pub async fn shutdown(self) {
        if let Some(client) = self.client {
            client.shutdown().await;
            tracing::info!("MongoDB client closed");
        }
    }

    /// Attach the marathon referenced by each record's `marathonId`.
    ///
    /// Lookups run concurrently but results keep their original order. A
    /// missing or unparsable reference yields `marathon: null`.
    pub async fn with_marathon_details(
        &self,
        records: Vec<Document>,
    ) -> Result<Vec<Document>, AppError> {
        stream::iter(records)
            .map(|record| self.attach_marathon(record))
            .buffered(MAX_CONCURRENT_DB_OPS)
            .try_collect()
            .await
    }

    async fn attach_marathon(&self, mut record: Document) -> Result<Document, AppError> {
        let details = match marathon_ref(&record) {
            Some(id) => self
                .marathons
                .find_one(doc! { "_id": id })
                .await?
                .map(Bson::Document)
                .unwrap_or(Bson::Null),
            None => Bson::Null,
        };

        record.insert(MARATHON_DETAILS, details);
        Ok(record)
    }
}

/// The marathon id referenced by a record, if it holds a usable one.
fn marathon_ref(record: &Document) -> Option<ObjectId> {
    match record.get(MARATHON_REF)? {
        Bson::ObjectId(oid) => Some(*oid),
        Bson::String(s) => ObjectId::parse_str(s).ok(),
        _ => None,
    }
}
