//! Document store access for the dashboard.
//!
//! Every business collection (products, customers, orders, inventory,
//! expenses, notifications) lives in a remote key-document store. This module
//! defines the narrow contract the services rely on and the backends that
//! implement it:
//!
//! - [`InMemoryDocumentStore`] - process-local store for tests and database-less runs
//! - [`PgDocumentStore`] - `PostgreSQL` `JSONB` documents table
//! - [`TimeoutStore`] - decorator bounding every call with a deadline
//!
//! # Contract
//!
//! | Operation | Input | Output |
//! |---|---|---|
//! | `list` | collection, optional filter, optional sort | documents with ids |
//! | `insert` | collection, field map (no id) | store-assigned id |
//! | `insert_many` | collection, field maps (no ids) | ids, all rows or none |
//! | `update_fields` | collection, id, partial field map | success/failure |
//! | `delete` | collection, id | whether a document was removed |
//! | `is_empty` | collection, optional filter | boolean |
//!
//! Sorting is applied by [`sort_documents`] in every backend so all of them
//! order documents identically.

pub mod memory;
pub mod postgres;
pub mod timeout;

use std::cmp::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::{Map, Value};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use bakesnplates_core::DocumentId;

pub use memory::InMemoryDocumentStore;
pub use postgres::PgDocumentStore;
pub use timeout::TimeoutStore;

/// Field map of a stored document, without its id.
pub type Fields = Map<String, Value>;

/// Errors that can occur during document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or did not answer in time.
    #[error("store unreachable: {0}")]
    Unreachable(String),

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested document was not found.
    #[error("document {id} not found in {collection}")]
    NotFound {
        /// Collection that was searched.
        collection: String,
        /// Missing document id.
        id: String,
    },

    /// A document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl StoreError {
    /// Whether the failure came from connectivity rather than the data itself.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable(_) | Self::Database(_))
    }
}

/// A stored document: its store-assigned id plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Store-assigned identifier.
    pub id: DocumentId,
    /// Document fields (never contains `id`).
    pub fields: Fields,
}

impl Document {
    /// Decode the document into an entity type.
    ///
    /// The id is injected as an `id` field so entity structs can deserialize it
    /// like any other field.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the fields do not match the entity shape.
    pub fn decode<T: serde::de::DeserializeOwned>(self) -> Result<T, StoreError> {
        let mut fields = self.fields;
        fields.insert("id".to_string(), Value::String(self.id.to_string()));
        Ok(serde_json::from_value(Value::Object(fields))?)
    }
}

/// Encode an input type into a field map.
///
/// # Errors
///
/// Returns `StoreError::Serialization` if the value does not serialize, or
/// `StoreError::DataCorruption` if it does not serialize to a JSON object.
pub fn encode<T: serde::Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(mut fields) => {
            fields.remove("id");
            Ok(fields)
        }
        other => Err(StoreError::DataCorruption(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Equality predicate on a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    /// Field name.
    pub field: String,
    /// Value the field must equal.
    pub value: Value,
}

impl FieldFilter {
    /// Create an equality filter.
    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Whether a document's fields satisfy the filter.
    #[must_use]
    pub fn matches(&self, fields: &Fields) -> bool {
        fields.get(&self.field) == Some(&self.value)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Sort key for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    /// Field to sort on.
    pub field: &'static str,
    /// Sort direction.
    pub direction: Direction,
}

impl SortSpec {
    /// Ascending sort on a field.
    #[must_use]
    pub const fn asc(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Ascending,
        }
    }

    /// Descending sort on a field.
    #[must_use]
    pub const fn desc(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Descending,
        }
    }
}

/// Parameters for listing a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    /// Collection name.
    pub collection: String,
    /// Optional equality filter.
    pub filter: Option<FieldFilter>,
    /// Optional sort key.
    pub sort: Option<SortSpec>,
}

impl ListQuery {
    /// List every document of a collection in store order.
    #[must_use]
    pub fn all(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filter: None,
            sort: None,
        }
    }

    /// Restrict the listing to documents matching a filter.
    #[must_use]
    pub fn filter(mut self, filter: FieldFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sort the listing.
    #[must_use]
    pub const fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// The remote document store contract.
///
/// Implementations must assign ids themselves and must never accept an `id`
/// field from callers.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List documents of a collection.
    async fn list(&self, query: &ListQuery) -> Result<Vec<Document>, StoreError>;

    /// Insert a new document and return its assigned id.
    async fn insert(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError>;

    /// Insert several documents as one unit and return their ids in order.
    ///
    /// Either every row is written or none is.
    async fn insert_many(
        &self,
        collection: &str,
        rows: Vec<Fields>,
    ) -> Result<Vec<DocumentId>, StoreError>;

    /// Merge a partial field map into an existing document.
    ///
    /// Returns `StoreError::NotFound` if the document does not exist.
    async fn update_fields(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), StoreError>;

    /// Delete a document. Returns false if it did not exist.
    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<bool, StoreError>;

    /// Whether a collection (optionally restricted by a filter) holds no documents.
    async fn is_empty(
        &self,
        collection: &str,
        filter: Option<&FieldFilter>,
    ) -> Result<bool, StoreError>;
}

/// Sort documents in place according to a sort key.
///
/// Values of the sort field compare as strings byte-wise (case-sensitive),
/// numbers numerically; documents missing the field sort first. Ties are
/// broken by id so the order is fully deterministic.
pub fn sort_documents(documents: &mut [Document], sort: SortSpec) {
    documents.sort_by(|a, b| {
        let ordering = compare_values(a.fields.get(sort.field), b.fields.get(sort.field))
            .then_with(|| a.id.cmp(&b.id));
        match sort.direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    });
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `acquire_timeout` - How long to wait for a pooled connection
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    acquire_timeout: Duration,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(acquire_timeout)
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(id: &str, fields: Value) -> Document {
        let Value::Object(fields) = fields else {
            panic!("fields must be an object");
        };
        Document {
            id: DocumentId::new(id),
            fields,
        }
    }

    #[test]
    fn test_sort_documents_by_name_ascending() {
        let mut docs = vec![
            doc("1", json!({"name": "Sobolo Juice"})),
            doc("2", json!({"name": "Bento Cake"})),
            doc("3", json!({"name": "10\" Cake"})),
        ];
        sort_documents(&mut docs, SortSpec::asc("name"));

        let names: Vec<_> = docs
            .iter()
            .map(|d| d.fields["name"].as_str().unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["10\" Cake", "Bento Cake", "Sobolo Juice"]);
    }

    #[test]
    fn test_sort_documents_descending_breaks_ties_by_id() {
        let mut docs = vec![
            doc("a", json!({"date": "2023-11-21T00:00:00Z"})),
            doc("b", json!({"date": "2023-11-20T00:00:00Z"})),
            doc("c", json!({"date": "2023-11-21T00:00:00Z"})),
        ];
        sort_documents(&mut docs, SortSpec::desc("date"));

        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_sort_documents_is_case_sensitive() {
        let mut docs = vec![
            doc("1", json!({"name": "apple"})),
            doc("2", json!({"name": "Banana"})),
        ];
        sort_documents(&mut docs, SortSpec::asc("name"));
        assert_eq!(docs[0].fields["name"], "Banana");
    }

    #[test]
    fn test_field_filter_matches() {
        let filter = FieldFilter::eq("userId", "u1");
        let Value::Object(fields) = json!({"userId": "u1", "read": false}) else {
            panic!("object");
        };
        assert!(filter.matches(&fields));
        assert!(!FieldFilter::eq("userId", "u2").matches(&fields));
    }

    #[test]
    fn test_decode_injects_id() {
        #[derive(serde::Deserialize)]
        struct Named {
            id: String,
            name: String,
        }

        let named: Named = doc("x1", json!({"name": "Bento Cake"}))
            .decode()
            .expect("decode");
        assert_eq!(named.id, "x1");
        assert_eq!(named.name, "Bento Cake");
    }

    #[test]
    fn test_encode_strips_id_and_rejects_scalars() {
        let fields = encode(&json!({"id": "nope", "name": "Flour"})).expect("encode");
        assert!(!fields.contains_key("id"));
        assert!(matches!(encode(&42), Err(StoreError::DataCorruption(_))));
    }
}
