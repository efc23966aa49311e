//! `PostgreSQL` document store.
//!
//! All collections share one `documents` table keyed by `(collection, id)`
//! with the fields kept as `JSONB`. Queries are built at runtime rather than
//! with the sqlx macros because the collection layout is generic.
//!
//! ```sql
//! CREATE TABLE documents (
//!     collection TEXT NOT NULL,
//!     id UUID NOT NULL DEFAULT gen_random_uuid(),
//!     data JSONB NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     PRIMARY KEY (collection, id)
//! );
//! ```

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use bakesnplates_core::DocumentId;

use super::{
    Document, DocumentStore, FieldFilter, Fields, ListQuery, StoreError, sort_documents,
};

/// Document store backed by a `PostgreSQL` `JSONB` table.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Parse a document id, treating malformed ids as missing documents.
fn parse_id(collection: &str, id: &DocumentId) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id.as_str()).map_err(|_| StoreError::NotFound {
        collection: collection.to_string(),
        id: id.to_string(),
    })
}

fn into_document(id: Uuid, data: Value) -> Result<Document, StoreError> {
    match data {
        Value::Object(fields) => Ok(Document {
            id: DocumentId::new(id.simple().to_string()),
            fields,
        }),
        other => Err(StoreError::DataCorruption(format!(
            "document {id} is not an object: {other}"
        ))),
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[instrument(skip(self), fields(collection = %query.collection))]
    async fn list(&self, query: &ListQuery) -> Result<Vec<Document>, StoreError> {
        let rows: Vec<(Uuid, Value)> = match &query.filter {
            Some(filter) => {
                sqlx::query_as(
                    r"
                    SELECT id, data FROM documents
                    WHERE collection = $1 AND data -> $2 = $3
                    ORDER BY created_at, id
                    ",
                )
                .bind(&query.collection)
                .bind(&filter.field)
                .bind(&filter.value)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    r"
                    SELECT id, data FROM documents
                    WHERE collection = $1
                    ORDER BY created_at, id
                    ",
                )
                .bind(&query.collection)
                .fetch_all(&self.pool)
                .await?
            }
        };

        let mut documents = rows
            .into_iter()
            .map(|(id, data)| into_document(id, data))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(sort) = query.sort {
            sort_documents(&mut documents, sort);
        }
        Ok(documents)
    }

    #[instrument(skip(self, fields))]
    async fn insert(&self, collection: &str, mut fields: Fields) -> Result<DocumentId, StoreError> {
        fields.remove("id");
        let id: Uuid = sqlx::query_scalar(
            r"
            INSERT INTO documents (collection, data)
            VALUES ($1, $2)
            RETURNING id
            ",
        )
        .bind(collection)
        .bind(Value::Object(fields))
        .fetch_one(&self.pool)
        .await?;

        Ok(DocumentId::new(id.simple().to_string()))
    }

    #[instrument(skip(self, rows), fields(count = rows.len()))]
    async fn insert_many(
        &self,
        collection: &str,
        rows: Vec<Fields>,
    ) -> Result<Vec<DocumentId>, StoreError> {
        // Dropping the transaction on an early return rolls it back
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(rows.len());

        for mut fields in rows {
            fields.remove("id");
            let id: Uuid = sqlx::query_scalar(
                r"
                INSERT INTO documents (collection, data)
                VALUES ($1, $2)
                RETURNING id
                ",
            )
            .bind(collection)
            .bind(Value::Object(fields))
            .fetch_one(&mut *tx)
            .await?;
            ids.push(DocumentId::new(id.simple().to_string()));
        }

        tx.commit().await?;
        Ok(ids)
    }

    #[instrument(skip(self, fields), fields(id = %id))]
    async fn update_fields(
        &self,
        collection: &str,
        id: &DocumentId,
        mut fields: Fields,
    ) -> Result<(), StoreError> {
        let uuid = parse_id(collection, id)?;
        fields.remove("id");

        let result = sqlx::query(
            r"
            UPDATE documents SET data = data || $3
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection)
        .bind(uuid)
        .bind(Value::Object(fields))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<bool, StoreError> {
        let Ok(uuid) = parse_id(collection, id) else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(uuid)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn is_empty(
        &self,
        collection: &str,
        filter: Option<&FieldFilter>,
    ) -> Result<bool, StoreError> {
        let exists: bool = match filter {
            Some(filter) => {
                sqlx::query_scalar(
                    r"
                    SELECT EXISTS (
                        SELECT 1 FROM documents
                        WHERE collection = $1 AND data -> $2 = $3
                    )
                    ",
                )
                .bind(collection)
                .bind(&filter.field)
                .bind(&filter.value)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar(
                    "SELECT EXISTS (SELECT 1 FROM documents WHERE collection = $1)",
                )
                .bind(collection)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(!exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_rejects_non_uuid() {
        let err = parse_id("orders", &DocumentId::new("ORD001")).expect_err("should fail");
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn test_parse_id_accepts_simple_uuid() {
        let uuid = Uuid::new_v4();
        let parsed =
            parse_id("orders", &DocumentId::new(uuid.simple().to_string())).expect("parse");
        assert_eq!(parsed, uuid);
    }

    #[test]
    fn test_into_document_rejects_scalars() {
        let err = into_document(Uuid::new_v4(), Value::Bool(true)).expect_err("should fail");
        assert!(matches!(err, StoreError::DataCorruption(_)));
    }

    #[test]
    fn test_pg_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgDocumentStore>();
    }
}
