//! libSQL backend — `DocumentStore` over a local file or in-memory database.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::store::migrations;
use crate::store::traits::DocumentStore;

/// libSQL document store.
///
/// Documents are stored as JSON text in a single `documents` table keyed by
/// `(collection, key)`. One connection is reused for all operations.
pub struct LibSqlDocumentStore {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlDocumentStore {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let store = Self::from_database(db).await?;
        info!(path = %path.display(), "Document store opened");
        Ok(store)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| StoreError::Pool(format!("Failed to create in-memory database: {e}")))?;
        Self::from_database(db).await
    }

    async fn from_database(db: LibSqlDatabase) -> Result<Self, StoreError> {
        let conn = db
            .connect()
            .map_err(|e| StoreError::Pool(format!("Failed to create connection: {e}")))?;
        migrations::upgrade(&conn).await?;
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }
}

#[async_trait]
impl DocumentStore for LibSqlDocumentStore {
    async fn set(
        &self,
        collection: &str,
        key: &str,
        document: serde_json::Value,
    ) -> Result<(), StoreError> {
        let body = serde_json::to_string(&document)?;
        let now = Utc::now().to_rfc3339();

        self.conn
            .execute(
                "INSERT INTO documents (collection, key, body, updated_at) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (collection, key) DO UPDATE SET body = ?3, updated_at = ?4",
                params![collection, key, body, now],
            )
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;

        debug!(collection, key, "Document written");
        Ok(())
    }

    async fn get(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT body FROM documents WHERE collection = ?1 AND key = ?2",
                params![collection, key],
            )
            .await
            .map_err(|e| StoreError::Query(format!("get document: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let body: String = row
                    .get(0)
                    .map_err(|e| StoreError::Query(format!("read document body: {e}")))?;
                Ok(Some(serde_json::from_str(&body)?))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Query(format!("get document: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn set_then_get_in_memory() {
        let store = LibSqlDocumentStore::new_memory().await.unwrap();
        assert!(store.get("employees", "u1").await.unwrap().is_none());

        store
            .set("employees", "u1", json!({"fullName": "Asha"}))
            .await
            .unwrap();
        let doc = store.get("employees", "u1").await.unwrap().unwrap();
        assert_eq!(doc["fullName"], "Asha");
    }

    #[tokio::test]
    async fn set_upserts_existing_document() {
        let store = LibSqlDocumentStore::new_memory().await.unwrap();
        store.set("employees", "u1", json!({"v": 1})).await.unwrap();
        store.set("employees", "u1", json!({"v": 2})).await.unwrap();
        assert_eq!(
            store.get("employees", "u1").await.unwrap(),
            Some(json!({"v": 2}))
        );
    }

    #[tokio::test]
    async fn file_backed_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("hrms.db");

        {
            let store = LibSqlDocumentStore::new_local(&path).await.unwrap();
            store
                .set("employees", "u9", json!({"department": "Finance"}))
                .await
                .unwrap();
        }

        let store = LibSqlDocumentStore::new_local(&path).await.unwrap();
        let doc = store.get("employees", "u9").await.unwrap().unwrap();
        assert_eq!(doc["department"], "Finance");
    }
}
