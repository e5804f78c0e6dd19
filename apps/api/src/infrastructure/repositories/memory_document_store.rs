use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::repositories::{
    DeleteResult, Document, DocumentStore, Filter, FindOptions, ReturnDocument, SortDirection,
    StoreError, StoreResult, UpdateOptions,
};

/// In-process implementation of [`DocumentStore`]
///
/// Collections are vectors in insertion order behind a single lock, so every
/// operation (including upserts) is atomic with respect to the others. Used
/// by tests and for running the API without a database.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

fn matches(document: &Document, filter: &Filter) -> bool {
    filter
        .iter()
        .all(|(field, expected)| document.get(field).unwrap_or(&Value::Null) == expected)
}

fn document_id(document: &Document) -> Option<&str> {
    document.get("id").and_then(Value::as_str)
}

/// Total order over JSON values: null < bool < number < string < other
fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<()> {
        let id = document_id(&document)
            .ok_or_else(|| StoreError::InvalidDocument("missing string field 'id'".to_string()))?
            .to_string();

        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();
        if documents.iter().any(|d| document_id(d) == Some(id.as_str())) {
            return Err(StoreError::Duplicate {
                collection: collection.to_string(),
                id,
            });
        }
        documents.push(document);
        Ok(())
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.iter().find(|d| matches(d, filter)))
            .cloned())
    }

    async fn find(&self, collection: &str, options: &FindOptions) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut found: Vec<Document> = collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|d| matches(d, &options.filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(collections);

        if let Some(sort) = &options.sort {
            // stable sort keeps insertion order between equal keys
            found.sort_by(|a, b| {
                let ordering = compare_values(
                    a.get(&sort.field).unwrap_or(&Value::Null),
                    b.get(&sort.field).unwrap_or(&Value::Null),
                );
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }
        if let Some(limit) = options.limit {
            found.truncate(limit);
        }
        Ok(found)
    }

    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
        options: UpdateOptions,
    ) -> StoreResult<Option<Document>> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        if let Some(existing) = documents.iter_mut().find(|d| matches(d, filter)) {
            let before = existing.clone();
            existing.extend(set);
            return Ok(Some(match options.return_document {
                ReturnDocument::Before => before,
                ReturnDocument::After => existing.clone(),
            }));
        }

        if !options.upsert {
            return Ok(None);
        }

        let mut created = filter.clone();
        created.extend(set);
        if document_id(&created).is_none() {
            created.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        }
        documents.push(created.clone());

        Ok(match options.return_document {
            ReturnDocument::Before => None,
            ReturnDocument::After => Some(created),
        })
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<DeleteResult> {
        let mut collections = self.collections.write().await;
        let deleted_count = match collections.get_mut(collection) {
            Some(documents) => match documents.iter().position(|d| matches(d, filter)) {
                Some(index) => {
                    documents.remove(index);
                    1
                }
                None => 0,
            },
            None => 0,
        };
        Ok(DeleteResult { deleted_count })
    }
}
