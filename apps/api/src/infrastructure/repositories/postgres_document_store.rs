use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::repositories::{
    DeleteResult, Document, DocumentStore, Filter, FindOptions, ReturnDocument, SortDirection,
    StoreError, StoreResult, UpdateOptions,
};

const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL implementation of [`DocumentStore`]
///
/// All collections share the `documents` table; each row holds one JSONB
/// body keyed by `(collection, id)`. Filters are evaluated with JSONB
/// containment (`body @> filter`) and updates with a shallow `||` merge.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Creates a new PostgresDocumentStore
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the bundled schema migrations
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to run migrations: {}", e)))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn backend(context: &str) -> impl Fn(sqlx::Error) -> StoreError + '_ {
    move |e| StoreError::Backend(format!("{}: {}", context, e))
}

fn as_json(document: &Document) -> Json<Value> {
    Json(Value::Object(document.clone()))
}

fn into_document(body: Json<Value>) -> StoreResult<Document> {
    match body.0 {
        Value::Object(document) => Ok(document),
        other => Err(StoreError::InvalidDocument(format!(
            "stored body is not an object: {}",
            other
        ))),
    }
}

fn string_id(document: &Document) -> Option<String> {
    document.get("id").and_then(Value::as_str).map(str::to_string)
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<()> {
        let id = string_id(&document)
            .ok_or_else(|| StoreError::InvalidDocument("missing string field 'id'".to_string()))?;

        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(Json(Value::Object(document)))
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                    StoreError::Duplicate {
                        collection: collection.to_string(),
                        id: id.clone(),
                    }
                }
                _ => StoreError::Backend(format!("Failed to insert document: {}", e)),
            })?;

        Ok(())
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let body: Option<Json<Value>> = sqlx::query_scalar(
            r#"
            SELECT body FROM documents
            WHERE collection = $1 AND body @> $2
            ORDER BY inserted_at
            LIMIT 1
            "#,
        )
        .bind(collection)
        .bind(as_json(filter))
        .fetch_optional(&self.pool)
        .await
        .map_err(backend("Failed to find document"))?;

        body.map(into_document).transpose()
    }

    async fn find(&self, collection: &str, options: &FindOptions) -> StoreResult<Vec<Document>> {
        let limit = options.limit.map(|l| l as i64);

        let bodies: Vec<Json<Value>> = match &options.sort {
            Some(sort) => {
                let direction = match sort.direction {
                    SortDirection::Ascending => "ASC",
                    SortDirection::Descending => "DESC",
                };
                let sql = format!(
                    r#"
                    SELECT body FROM documents
                    WHERE collection = $1 AND body @> $2
                    ORDER BY body -> $3 {}, inserted_at
                    LIMIT $4
                    "#,
                    direction
                );
                sqlx::query_scalar::<_, Json<Value>>(&sql)
                    .bind(collection)
                    .bind(as_json(&options.filter))
                    .bind(&sort.field)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query_scalar::<_, Json<Value>>(
                    r#"
                    SELECT body FROM documents
                    WHERE collection = $1 AND body @> $2
                    ORDER BY inserted_at
                    LIMIT $3
                    "#,
                )
                .bind(collection)
                .bind(as_json(&options.filter))
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(backend("Failed to list documents"))?;

        bodies.into_iter().map(into_document).collect()
    }

    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
        options: UpdateOptions,
    ) -> StoreResult<Option<Document>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(backend("Failed to begin transaction"))?;

        let existing: Option<(String, Json<Value>)> = sqlx::query_as(
            r#"
            SELECT id, body FROM documents
            WHERE collection = $1 AND body @> $2
            ORDER BY inserted_at
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(collection)
        .bind(as_json(filter))
        .fetch_optional(&mut *tx)
        .await
        .map_err(backend("Failed to lock document"))?;

        let (before, after) = match existing {
            Some((id, before)) => {
                let after: Json<Value> = sqlx::query_scalar(
                    r#"
                    UPDATE documents SET body = body || $3
                    WHERE collection = $1 AND id = $2
                    RETURNING body
                    "#,
                )
                .bind(collection)
                .bind(&id)
                .bind(as_json(&set))
                .fetch_one(&mut *tx)
                .await
                .map_err(backend("Failed to update document"))?;
                (Some(before), after)
            }
            None if options.upsert => {
                let mut created = filter.clone();
                created.extend(set.clone());
                let id = match string_id(&created) {
                    Some(id) => id,
                    None => {
                        let id = Uuid::new_v4().to_string();
                        created.insert("id".to_string(), Value::String(id.clone()));
                        id
                    }
                };

                // a concurrent upsert of the same key may have committed first
                let after: Json<Value> = sqlx::query_scalar(
                    r#"
                    INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)
                    ON CONFLICT (collection, id) DO UPDATE SET body = documents.body || $4
                    RETURNING body
                    "#,
                )
                .bind(collection)
                .bind(&id)
                .bind(Json(Value::Object(created)))
                .bind(as_json(&set))
                .fetch_one(&mut *tx)
                .await
                .map_err(backend("Failed to upsert document"))?;
                (None, after)
            }
            None => return Ok(None),
        };

        tx.commit()
            .await
            .map_err(backend("Failed to commit transaction"))?;

        match options.return_document {
            ReturnDocument::Before => before.map(into_document).transpose(),
            ReturnDocument::After => into_document(after).map(Some),
        }
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<DeleteResult> {
        let result = sqlx::query(
            r#"
            DELETE FROM documents
            WHERE collection = $1 AND id = (
                SELECT id FROM documents
                WHERE collection = $1 AND body @> $2
                ORDER BY inserted_at
                LIMIT 1
            )
            "#,
        )
        .bind(collection)
        .bind(as_json(filter))
        .execute(&self.pool)
        .await
        .map_err(backend("Failed to delete document"))?;

        Ok(DeleteResult {
            deleted_count: result.rows_affected(),
        })
    }
}
