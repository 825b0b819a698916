// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! MongoDB-backed collections.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, FindOptions, UpdateOptions};
use mongodb::{Client, Collection, Database};

use crate::db::store::{DeleteAck, DocumentCollection, InsertAck, UpdateAck};
use crate::error::AppError;

const APP_NAME: &str = "marathon-api";

/// Connect to the deployment at `uri` and return the client and database.
///
/// The deployment is pinged once so a bad connection string fails at startup.
pub async fn connect(uri: &str, database: &str) -> Result<(Client, Database), AppError> {
    let mut options = ClientOptions::parse(uri)
        .await
        .map_err(|e| AppError::Database(format!("Failed to parse MongoDB URI: {}", e)))?;
    options.app_name = Some(APP_NAME.to_string());

    let client = Client::with_options(options)
        .map_err(|e| AppError::Database(format!("Failed to create MongoDB client: {}", e)))?;
    let db = client.database(database);

    db.run_command(doc! { "ping": 1 }, None)
        .await
        .map_err(|e| AppError::Database(format!("Failed to reach MongoDB: {}", e)))?;

    tracing::info!(database, "Connected to MongoDB");

    Ok((client, db))
}

/// A [`DocumentCollection`] over a MongoDB collection of raw documents.
pub struct MongoCollection {
    inner: Collection<Document>,
}

impl MongoCollection {
    pub fn new(db: &Database, name: &str) -> Self {
        Self {
            inner: db.collection::<Document>(name),
        }
    }
}

#[async_trait]
impl DocumentCollection for MongoCollection {
    async fn find(&self, filter: Document, limit: Option<i64>) -> Result<Vec<Document>, AppError> {
        let options = FindOptions::builder().limit(limit).build();
        let cursor = self.inner.find(filter, options).await?;
        let records: Vec<Document> = cursor.try_collect().await?;
        Ok(records)
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, AppError> {
        Ok(self.inner.find_one(filter, None).await?)
    }

    async fn insert_one(&self, record: Document) -> Result<InsertAck, AppError> {
        let result = self.inner.insert_one(record, None).await?;
        Ok(InsertAck::new(&result.inserted_id))
    }

    async fn update_one(
        &self,
        filter: Document,
        patch: Document,
        upsert: bool,
    ) -> Result<UpdateAck, AppError> {
        let options = UpdateOptions::builder().upsert(upsert).build();
        let result = self
            .inner
            .update_one(filter, doc! { "$set": patch }, options)
            .await?;
        Ok(UpdateAck::new(
            result.matched_count,
            result.modified_count,
            result.upserted_id.as_ref(),
        ))
    }

    async fn delete_one(&self, filter: Document) -> Result<DeleteAck, AppError> {
        let result = self.inner.delete_one(filter, None).await?;
        Ok(DeleteAck::new(result.deleted_count))
    }
}
