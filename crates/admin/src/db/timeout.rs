//! Deadline decorator for any document store.
//!
//! A hung remote call would otherwise hang its caller forever; wrapping the
//! store turns an expired deadline into `StoreError::Unreachable`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use bakesnplates_core::DocumentId;

use super::{Document, DocumentStore, FieldFilter, Fields, ListQuery, StoreError};

/// Document store wrapper that bounds every call with a timeout.
#[derive(Clone)]
pub struct TimeoutStore {
    inner: Arc<dyn DocumentStore>,
    limit: Duration,
}

impl TimeoutStore {
    /// Wrap a store with a per-call deadline.
    #[must_use]
    pub fn new(inner: Arc<dyn DocumentStore>, limit: Duration) -> Self {
        Self { inner, limit }
    }

    /// The configured per-call deadline.
    #[must_use]
    pub const fn limit(&self) -> Duration {
        self.limit
    }

    async fn bounded<T>(
        &self,
        operation: &str,
        call: impl Future<Output = Result<T, StoreError>> + Send,
    ) -> Result<T, StoreError> {
        tokio::time::timeout(self.limit, call).await.unwrap_or_else(|_| {
            warn!(operation, limit_ms = self.limit.as_millis(), "Store call timed out");
            Err(StoreError::Unreachable(format!(
                "{operation} did not complete within {}ms",
                self.limit.as_millis()
            )))
        })
    }
}

#[async_trait]
impl DocumentStore for TimeoutStore {
    async fn list(&self, query: &ListQuery) -> Result<Vec<Document>, StoreError> {
        self.bounded("list", self.inner.list(query)).await
    }

    async fn insert(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError> {
        self.bounded("insert", self.inner.insert(collection, fields))
            .await
    }

    async fn insert_many(
        &self,
        collection: &str,
        rows: Vec<Fields>,
    ) -> Result<Vec<DocumentId>, StoreError> {
        self.bounded("insert_many", self.inner.insert_many(collection, rows))
            .await
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), StoreError> {
        self.bounded(
            "update_fields",
            self.inner.update_fields(collection, id, fields),
        )
        .await
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<bool, StoreError> {
        self.bounded("delete", self.inner.delete(collection, id))
            .await
    }

    async fn is_empty(
        &self,
        collection: &str,
        filter: Option<&FieldFilter>,
    ) -> Result<bool, StoreError> {
        self.bounded("is_empty", self.inner.is_empty(collection, filter))
            .await
    }
}
