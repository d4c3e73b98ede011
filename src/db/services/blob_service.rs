use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::OnConflict, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema, Set,
};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::db::entities::{blob, legacy_kv, prelude::*};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    #[error("Stored data is not valid: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Opaque get/put access to the JSON blobs, plus read access to the legacy
/// key-value store. Implementations hold no request state.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Returns `None` when the key has never been written.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    /// Creates or overwrites the blob under `key`.
    async fn put(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError>;

    /// Raw text stored under `key` in the legacy store.
    async fn get_legacy(&self, key: &str) -> Result<Option<String>, StoreError>;
}

/// Creates the `blobs` and `legacy_kv` tables when they are missing.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut blobs = schema.create_table_from_entity(Blob);
    blobs.if_not_exists();
    db.execute(backend.build(&blobs)).await?;

    let mut legacy = schema.create_table_from_entity(LegacyKv);
    legacy.if_not_exists();
    db.execute(backend.build(&legacy)).await?;

    Ok(())
}

/// Blob store backed by a SeaORM connection (PostgreSQL or SQLite).
#[derive(Clone)]
pub struct SeaOrmBlobStore {
    db: DatabaseConnection,
}

impl SeaOrmBlobStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl BlobStore for SeaOrmBlobStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let row = blob::Entity::find_by_id(key.to_owned()).one(&self.db).await?;
        Ok(row.map(|model| model.value))
    }

    async fn put(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError> {
        let active_blob = blob::ActiveModel {
            key: Set(key.to_owned()),
            value: Set(value.clone()),
            updated_at: Set(Utc::now()),
        };
        blob::Entity::insert(active_blob)
            .on_conflict(
                OnConflict::column(blob::Column::Key)
                    .update_columns([blob::Column::Value, blob::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn get_legacy(&self, key: &str) -> Result<Option<String>, StoreError> {
        let row = legacy_kv::Entity::find_by_id(key.to_owned())
            .one(&self.db)
            .await?;
        Ok(row.map(|model| model.value))
    }
}

/// Process-local store used when no database is configured. Contents are lost
/// on restart.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, serde_json::Value>>,
    legacy: RwLock<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the legacy store, e.g. with a previous deployment's export.
    pub async fn insert_legacy(&self, key: &str, raw: impl Into<String>) {
        self.legacy.write().await.insert(key.to_owned(), raw.into());
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError> {
        self.blobs
            .write()
            .await
            .insert(key.to_owned(), value.clone());
        Ok(())
    }

    async fn get_legacy(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.legacy.read().await.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ActiveModelTrait, ConnectOptions, Database};
    use serde_json::json;

    async fn sqlite_store() -> SeaOrmBlobStore {
        let mut opt = ConnectOptions::new("sqlite::memory:".to_owned());
        opt.max_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        ensure_schema(&db).await.unwrap();
        SeaOrmBlobStore::new(db)
    }

    #[tokio::test]
    async fn test_sqlite_get_missing_key_is_none() {
        let store = sqlite_store().await;
        assert!(store.get("tiles").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sqlite_put_then_overwrite() {
        let store = sqlite_store().await;
        store.put("tiles", &json!([{"id": "1"}])).await.unwrap();
        store.put("tiles", &json!([])).await.unwrap();

        assert_eq!(store.get("tiles").await.unwrap(), Some(json!([])));
    }

    #[tokio::test]
    async fn test_sqlite_ensure_schema_is_idempotent() {
        let store = sqlite_store().await;
        ensure_schema(store.connection()).await.unwrap();
    }

    #[tokio::test]
    async fn test_sqlite_reads_legacy_rows() {
        let store = sqlite_store().await;
        legacy_kv::ActiveModel {
            key: Set("tiles".to_owned()),
            value: Set("[]".to_owned()),
        }
        .insert(store.connection())
        .await
        .unwrap();

        assert_eq!(store.get_legacy("tiles").await.unwrap().as_deref(), Some("[]"));
        assert!(store.get_legacy("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryBlobStore::new();
        assert!(store.get("color_meanings").await.unwrap().is_none());

        store.put("color_meanings", &json!({})).await.unwrap();
        assert_eq!(store.get("color_meanings").await.unwrap(), Some(json!({})));

        store.insert_legacy("tiles", "[]").await;
        assert_eq!(store.get_legacy("tiles").await.unwrap().as_deref(), Some("[]"));
    }
}
