//! Integration tests for the Bakes n Plates dashboard.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory scenarios
//! cargo test -p bakesnplates-integration-tests
//!
//! # Including the PostgreSQL scenarios
//! DATABASE_URL=postgres://... cargo test -p bakesnplates-integration-tests -- --include-ignored
//! ```
//!
//! # Test Categories
//!
//! - `business_data` - sync, seeding and write-then-read properties
//! - `store_failures` - behavior when the remote store misbehaves
//! - `notifications_pos` - notification feed and point-of-sale flows
//! - `postgres` - the same flows against a real database (ignored by default)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;

use bakesnplates_admin::db::{
    self, Document, DocumentStore, FieldFilter, Fields, InMemoryDocumentStore, ListQuery,
    PgDocumentStore, StoreError,
};
use bakesnplates_admin::services::{BusinessDataStore, SyncOptions};
use bakesnplates_core::DocumentId;

/// Sync options without the seed propagation pause.
#[must_use]
pub const fn no_delay() -> SyncOptions {
    SyncOptions {
        seed_propagation_delay: Duration::ZERO,
    }
}

/// A data store over `store` that never pauses after seeding.
#[must_use]
pub fn data_store(store: Arc<dyn DocumentStore>) -> BusinessDataStore {
    BusinessDataStore::new(store, no_delay())
}

/// In-memory store wrapper whose calls can be made to fail or hang.
///
/// Failures surface as `StoreError::Unreachable`, the way a dropped
/// connection to the remote store would.
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: InMemoryDocumentStore,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    hang: Arc<AtomicBool>,
    row_budget: Arc<Mutex<Option<usize>>>,
}

impl FlakyStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The wrapped store, for inspecting what was actually written.
    #[must_use]
    pub const fn inner(&self) -> &InMemoryDocumentStore {
        &self.inner
    }

    /// Fail `list` and `is_empty`.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Fail every insert, update and delete.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every call sleep far longer than any test timeout.
    pub fn hang(&self, hang: bool) {
        self.hang.store(hang, Ordering::SeqCst);
    }

    /// Accept at most `rows` more inserted rows, then refuse inserts.
    ///
    /// A batch that does not fit is refused whole, the way a rolled-back
    /// transaction leaves nothing behind. `None` lifts the limit.
    pub fn limit_inserted_rows(&self, rows: Option<usize>) {
        *self.row_budget.lock().unwrap_or_else(PoisonError::into_inner) = rows;
    }

    fn take_rows(&self, rows: usize, operation: &str) -> Result<(), StoreError> {
        let mut budget = self.row_budget.lock().unwrap_or_else(PoisonError::into_inner);
        match *budget {
            Some(left) if left < rows => {
                Err(StoreError::Unreachable(format!("{operation} cut off")))
            }
            Some(left) => {
                *budget = Some(left - rows);
                Ok(())
            }
            None => Ok(()),
        }
    }

    async fn check(&self, flag: &AtomicBool, operation: &str) -> Result<(), StoreError> {
        if self.hang.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Unreachable(format!("{operation} refused")));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn list(&self, query: &ListQuery) -> Result<Vec<Document>, StoreError> {
        self.check(&self.fail_reads, "list").await?;
        self.inner.list(query).await
    }

    async fn insert(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError> {
        self.check(&self.fail_writes, "insert").await?;
        self.take_rows(1, "insert")?;
        self.inner.insert(collection, fields).await
    }

    async fn insert_many(
        &self,
        collection: &str,
        rows: Vec<Fields>,
    ) -> Result<Vec<DocumentId>, StoreError> {
        self.check(&self.fail_writes, "insert_many").await?;
        self.take_rows(rows.len(), "insert_many")?;
        self.inner.insert_many(collection, rows).await
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), StoreError> {
        self.check(&self.fail_writes, "update").await?;
        self.inner.update_fields(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<bool, StoreError> {
        self.check(&self.fail_writes, "delete").await?;
        self.inner.delete(collection, id).await
    }

    async fn is_empty(
        &self,
        collection: &str,
        filter: Option<&FieldFilter>,
    ) -> Result<bool, StoreError> {
        self.check(&self.fail_reads, "is_empty").await?;
        self.inner.is_empty(collection, filter).await
    }
}

/// Connect to `DATABASE_URL`, run migrations and clear the documents table.
///
/// Returns `None` when `DATABASE_URL` is unset.
///
/// # Panics
///
/// Panics if the database cannot be reached or migrated.
#[allow(clippy::expect_used)]
pub async fn postgres_store() -> Option<PgDocumentStore> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = db::create_pool(&SecretString::from(url), Duration::from_secs(5))
        .await
        .expect("Failed to connect to DATABASE_URL");
    sqlx::migrate!("../admin/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    sqlx::query("DELETE FROM documents")
        .execute(&pool)
        .await
        .expect("Failed to clear documents");
    Some(PgDocumentStore::new(pool))
}
