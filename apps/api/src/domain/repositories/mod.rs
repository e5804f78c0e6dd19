// Repository ports
//
// The domain talks to persistence only through these traits; adapters live
// in `infrastructure::repositories`.

pub mod document_store;
pub mod entity;
pub mod errors;

pub use document_store::{
    filter_by_id, DeleteResult, Document, DocumentStore, Filter, FindOptions, ReturnDocument,
    Sort, SortDirection, StoreError, StoreResult, UpdateOptions,
};
pub use entity::{Entity, SingletonEntity};
pub use errors::RepositoryError;
