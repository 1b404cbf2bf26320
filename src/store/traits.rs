//! `DocumentStore` trait — the persistence boundary of the onboarding flow.

use async_trait::async_trait;

use crate::error::StoreError;

/// Backend-agnostic document store keyed by `(collection, key)`.
///
/// `set` replaces the whole document; there are no partial writes.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Write `document` under `collection/key`, replacing any previous one.
    async fn set(
        &self,
        collection: &str,
        key: &str,
        document: serde_json::Value,
    ) -> Result<(), StoreError>;

    /// Read a document back. The onboarding flow itself never reads.
    async fn get(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, StoreError>;
}
