use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::repositories::document_store::{from_document, non_null_fields};
use crate::domain::timestamp;
use crate::domain::repositories::{
    filter_by_id, DocumentStore, RepositoryError, ReturnDocument, SingletonEntity, StoreError,
    UpdateOptions,
};

/// Adapter for a resource of which at most one instance exists
///
/// The document lives in `T::COLLECTION` under `id = T::KEY`. Reads never
/// write; updates merge into the stored document, creating it when absent.
///
/// # Example
/// ```no_run
/// # async fn demo(store: std::sync::Arc<dyn portfolio_api::domain::repositories::DocumentStore>)
/// #     -> Result<(), portfolio_api::domain::repositories::RepositoryError> {
/// use portfolio_api::domain::{AboutProfile, AboutProfileUpdate};
/// use portfolio_api::infrastructure::repositories::SingletonRepository;
///
/// let about = SingletonRepository::<AboutProfile>::new(store);
/// let profile = about
///     .update(&AboutProfileUpdate {
///         tagline: Some("Light and shadow".to_string()),
///         ..Default::default()
///     })
///     .await?;
/// assert_eq!(profile.tagline, "Light and shadow");
/// # Ok(())
/// # }
/// ```
pub struct SingletonRepository<T: SingletonEntity> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: SingletonEntity> SingletonRepository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// The stored instance, or `default()` when none exists yet
    ///
    /// The default is not persisted.
    pub async fn get<F>(&self, default: F) -> Result<T, RepositoryError>
    where
        F: FnOnce() -> T,
    {
        match self
            .store
            .find_one(T::COLLECTION, &filter_by_id(T::KEY))
            .await?
        {
            Some(document) => Ok(from_document(document)?),
            None => {
                debug!(collection = T::COLLECTION, "No stored document, serving default");
                Ok(default())
            }
        }
    }

    /// Merge the non-null fields of `partial` and return the merged instance
    ///
    /// Stamps `T::UPDATED_AT_FIELD` with the current time and upserts in a
    /// single atomic store call.
    ///
    /// # Errors
    /// - `EmptyUpdate` if `partial` has no non-null field; nothing is written
    /// - `Store` for any store fault
    pub async fn update<P: Serialize>(&self, partial: &P) -> Result<T, RepositoryError> {
        let mut set = non_null_fields(partial)?;
        set.remove("id");
        if set.is_empty() {
            return Err(RepositoryError::EmptyUpdate);
        }
        set.insert(
            T::UPDATED_AT_FIELD.to_string(),
            Value::String(timestamp::format(&Utc::now())),
        );

        let merged = self
            .store
            .find_one_and_update(
                T::COLLECTION,
                &filter_by_id(T::KEY),
                set,
                UpdateOptions {
                    upsert: true,
                    return_document: ReturnDocument::After,
                },
            )
            .await?
            .ok_or_else(|| StoreError::Backend("upsert returned no document".to_string()))?;

        Ok(from_document(merged)?)
    }
}
