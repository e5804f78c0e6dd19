use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// A flat JSON record as held by the store
pub type Document = Map<String, Value>;

/// Field-equality conjunction used to select documents
pub type Filter = Document;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document store error: {0}")]
    Backend(String),

    #[error("Document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Document '{id}' already exists in {collection}")]
    Duplicate { collection: String, id: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

/// Selection, ordering and limit for [`DocumentStore::find`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub filter: Filter,
    pub sort: Option<Sort>,
    pub limit: Option<usize>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filter.insert(field.to_string(), value.into());
        self
    }

    pub fn sort_by(mut self, field: &str, direction: SortDirection) -> Self {
        self.sort = Some(Sort {
            field: field.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Which image of the document `find_one_and_update` returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnDocument {
    Before,
    #[default]
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOptions {
    /// Insert `filter ∪ set` when nothing matches
    pub upsert: bool,
    pub return_document: ReturnDocument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// Port for a schemaless document collection store
///
/// Every document carries a string `id` field that is unique within its
/// collection. Implementations must apply `find_one_and_update` atomically:
/// concurrent readers see either the old or the fully merged document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document
    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<()>;

    /// First document matching `filter`, in insertion order
    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>>;

    /// All documents matching the options' filter, sorted and limited
    async fn find(&self, collection: &str, options: &FindOptions) -> StoreResult<Vec<Document>>;

    /// Merge `set` into the first document matching `filter`
    ///
    /// With `upsert`, a missing document is created from the filter and the
    /// set fields, with a generated `id` when the filter has none.
    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
        options: UpdateOptions,
    ) -> StoreResult<Option<Document>>;

    /// Delete the first document matching `filter`
    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<DeleteResult>;
}

/// Filter selecting a document by its `id`
pub fn filter_by_id(id: &str) -> Filter {
    let mut filter = Filter::new();
    filter.insert("id".to_string(), Value::String(id.to_string()));
    filter
}

/// Serialize a record into a document
///
/// # Errors
/// Returns `StoreError::InvalidDocument` if the value is not a JSON object.
pub fn to_document<T: Serialize>(value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(document) => Ok(document),
        other => Err(StoreError::InvalidDocument(format!(
            "expected an object, got {}",
            other
        ))),
    }
}

pub fn from_document<T: DeserializeOwned>(document: Document) -> StoreResult<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

/// Serialize a partial update, keeping only the fields that are set
///
/// `None` fields serialize to `null` and are dropped, so omitted fields never
/// overwrite stored values.
pub fn non_null_fields<P: Serialize>(partial: &P) -> StoreResult<Document> {
    let mut document = to_document(partial)?;
    document.retain(|_, value| !value.is_null());
    Ok(document)
}
