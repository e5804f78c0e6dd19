use thiserror::Error;

use super::document_store::StoreError;

/// Errors surfaced by the typed repositories
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("No fields to update")]
    EmptyUpdate,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
