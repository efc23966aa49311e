//! `InMemoryDocumentStore` - HashMap-backed document store.
//!
//! Used by the test suites and by CLI runs without `DATABASE_URL`. Ids are
//! random UUIDs, mirroring how the remote store assigns them.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use bakesnplates_core::DocumentId;

use super::{
    Document, DocumentStore, FieldFilter, Fields, ListQuery, StoreError, sort_documents,
};

type Collections = HashMap<String, Vec<Document>>;

/// In-memory document store.
///
/// Documents keep insertion order within a collection. Clone-friendly via
/// `Arc`: clones share the same storage, the way two sessions share one remote
/// store.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<Collections>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn list(&self, query: &ListQuery) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let mut documents: Vec<Document> = collections
            .get(&query.collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| {
                        query
                            .filter
                            .as_ref()
                            .is_none_or(|filter| filter.matches(&doc.fields))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(collections);

        if let Some(sort) = query.sort {
            sort_documents(&mut documents, sort);
        }
        Ok(documents)
    }

    async fn insert(&self, collection: &str, mut fields: Fields) -> Result<DocumentId, StoreError> {
        fields.remove("id");
        let id = DocumentId::new(Uuid::new_v4().simple().to_string());

        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.clone(),
                fields,
            });

        Ok(id)
    }

    async fn insert_many(
        &self,
        collection: &str,
        rows: Vec<Fields>,
    ) -> Result<Vec<DocumentId>, StoreError> {
        let documents: Vec<Document> = rows
            .into_iter()
            .map(|mut fields| {
                fields.remove("id");
                Document {
                    id: DocumentId::new(Uuid::new_v4().simple().to_string()),
                    fields,
                }
            })
            .collect();
        let ids = documents.iter().map(|doc| doc.id.clone()).collect();

        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .extend(documents);

        Ok(ids)
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| &doc.id == id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        for (key, value) in fields {
            if key != "id" {
                document.fields.insert(key, value);
            }
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|doc| &doc.id != id);
        Ok(docs.len() < before)
    }

    async fn is_empty(
        &self,
        collection: &str,
        filter: Option<&FieldFilter>,
    ) -> Result<bool, StoreError> {
        let collections = self.collections.read().await;
        let empty = collections.get(collection).is_none_or(|docs| {
            !docs
                .iter()
                .any(|doc| filter.is_none_or(|f| f.matches(&doc.fields)))
        });
        Ok(empty)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::db::SortSpec;

    fn fields(value: serde_json::Value) -> Fields {
        match value {
            serde_json::Value::Object(map) => map,
            _ => Fields::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_unique_ids() {
        let store = InMemoryDocumentStore::new();
        let a = store
            .insert("products", fields(json!({"name": "Bento Cake"})))
            .await
            .expect("insert");
        let b = store
            .insert("products", fields(json!({"name": "Bento Cake"})))
            .await
            .expect("insert");

        assert_ne!(a, b);
        assert!(!a.is_empty());
        assert_eq!(store.count("products").await, 2);
    }

    #[tokio::test]
    async fn test_insert_ignores_caller_id() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .insert("products", fields(json!({"id": "PROD001", "name": "Cupcakes (2)"})))
            .await
            .expect("insert");

        assert_ne!(id.as_str(), "PROD001");
        let docs = store.list(&ListQuery::all("products")).await.expect("list");
        assert!(!docs[0].fields.contains_key("id"));
    }

    #[tokio::test]
    async fn test_insert_many_keeps_row_order() {
        let store = InMemoryDocumentStore::new();
        let ids = store
            .insert_many(
                "customers",
                vec![
                    fields(json!({"id": "CUST001", "name": "John Doe"})),
                    fields(json!({"name": "Jane Smith"})),
                ],
            )
            .await
            .expect("insert_many");

        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        let docs = store.list(&ListQuery::all("customers")).await.expect("list");
        let listed: Vec<_> = docs.iter().map(|d| d.id.clone()).collect();
        assert_eq!(listed, ids);
        assert_eq!(docs[1].fields["name"], "Jane Smith");
        assert!(!docs[0].fields.contains_key("id"));
    }

    #[tokio::test]
    async fn test_list_with_filter_and_sort() {
        let store = InMemoryDocumentStore::new();
        for (user, title) in [("u1", "b"), ("u2", "a"), ("u1", "a")] {
            store
                .insert("notifications", fields(json!({"userId": user, "title": title})))
                .await
                .expect("insert");
        }

        let query = ListQuery::all("notifications")
            .filter(FieldFilter::eq("userId", "u1"))
            .sort(SortSpec::asc("title"));
        let docs = store.list(&query).await.expect("list");

        let titles: Vec<_> = docs.iter().map(|d| d.fields["title"].clone()).collect();
        assert_eq!(titles, vec![json!("a"), json!("b")]);
    }

    #[tokio::test]
    async fn test_update_fields_merges() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .insert("orders", fields(json!({"status": "Pending", "total": "GH₵65.00"})))
            .await
            .expect("insert");

        store
            .update_fields("orders", &id, fields(json!({"status": "Completed"})))
            .await
            .expect("update");

        let docs = store.list(&ListQuery::all("orders")).await.expect("list");
        assert_eq!(docs[0].fields["status"], "Completed");
        assert_eq!(docs[0].fields["total"], "GH₵65.00");
    }

    #[tokio::test]
    async fn test_update_missing_document_is_not_found() {
        let store = InMemoryDocumentStore::new();
        let err = store
            .update_fields("orders", &DocumentId::new("missing"), Fields::new())
            .await
            .expect_err("should fail");
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_and_is_empty() {
        let store = InMemoryDocumentStore::new();
        assert!(store.is_empty("expenses", None).await.expect("is_empty"));

        let id = store
            .insert("expenses", fields(json!({"name": "Flour"})))
            .await
            .expect("insert");
        assert!(!store.is_empty("expenses", None).await.expect("is_empty"));

        assert!(store.delete("expenses", &id).await.expect("delete"));
        assert!(!store.delete("expenses", &id).await.expect("delete"));
        assert!(store.is_empty("expenses", None).await.expect("is_empty"));
    }

    #[tokio::test]
    async fn test_is_empty_respects_filter() {
        let store = InMemoryDocumentStore::new();
        store
            .insert("notifications", fields(json!({"userId": "u1"})))
            .await
            .expect("insert");

        let other = FieldFilter::eq("userId", "u2");
        assert!(store.is_empty("notifications", Some(&other)).await.expect("is_empty"));
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let store = InMemoryDocumentStore::new();
        let clone = store.clone();
        store
            .insert("customers", fields(json!({"name": "John Doe"})))
            .await
            .expect("insert");
        assert_eq!(clone.count("customers").await, 1);
    }
}
