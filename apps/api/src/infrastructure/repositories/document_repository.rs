use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::repositories::document_store::{from_document, non_null_fields, to_document};
use crate::domain::repositories::{
    filter_by_id, DocumentStore, Entity, FindOptions, RepositoryError, ReturnDocument,
    UpdateOptions,
};

/// Typed access to an id-addressed collection
///
/// Maps entities to and from documents of `T::COLLECTION`.
pub struct DocumentRepository<T: Entity> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> DocumentRepository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub async fn create(&self, entity: &T) -> Result<(), RepositoryError> {
        let document = to_document(entity)?;
        self.store.insert_one(T::COLLECTION, document).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<T>, RepositoryError> {
        let document = self.store.find_one(T::COLLECTION, &filter_by_id(id)).await?;
        Ok(document.map(from_document).transpose()?)
    }

    pub async fn list(&self, options: &FindOptions) -> Result<Vec<T>, RepositoryError> {
        let documents = self.store.find(T::COLLECTION, options).await?;
        documents
            .into_iter()
            .map(|document| from_document(document).map_err(RepositoryError::from))
            .collect()
    }

    /// Merge the set fields of `partial` into the entity with the given id
    ///
    /// # Errors
    /// - `EmptyUpdate` if `partial` sets no field; the store is not touched
    /// - `NotFound` if no entity has this id
    pub async fn update<P: Serialize>(&self, id: &str, partial: &P) -> Result<T, RepositoryError> {
        let mut set = non_null_fields(partial)?;
        set.remove("id");
        if set.is_empty() {
            return Err(RepositoryError::EmptyUpdate);
        }

        let updated = self
            .store
            .find_one_and_update(
                T::COLLECTION,
                &filter_by_id(id),
                set,
                UpdateOptions {
                    upsert: false,
                    return_document: ReturnDocument::After,
                },
            )
            .await?
            .ok_or(RepositoryError::NotFound(T::NAME))?;

        Ok(from_document(updated)?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let result = self.store.delete_one(T::COLLECTION, &filter_by_id(id)).await?;
        if result.deleted_count == 0 {
            return Err(RepositoryError::NotFound(T::NAME));
        }
        Ok(())
    }
}

impl<T: Entity> Clone for DocumentRepository<T> {
    fn clone(&self) -> Self {
        Self::new(self.store.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::photo::{NewPhoto, Photo, PhotoUpdate};
    use crate::domain::repositories::SortDirection;
    use crate::infrastructure::repositories::MemoryDocumentStore;
    use serde_json::json;

    fn repository() -> (Arc<MemoryDocumentStore>, DocumentRepository<Photo>) {
        let store = Arc::new(MemoryDocumentStore::new());
        (store.clone(), DocumentRepository::new(store))
    }

    fn photo(title: &str, category: &str, order: i64) -> Photo {
        Photo::new(NewPhoto {
            title: title.to_string(),
            category: category.to_string(),
            image_data: "https://img.example/x.jpg".to_string(),
            description: String::new(),
            featured: false,
            order,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn create_and_find_by_id() {
        let (_, repo) = repository();
        let dunes = photo("Dunes", "landscape", 1);
        repo.create(&dunes).await.unwrap();

        let found = repo.find_by_id(&dunes.id).await.unwrap().unwrap();

        assert_eq!(found.id, dunes.id);
        assert_eq!(found.title, "Dunes");
        assert_eq!(found.created_at.timestamp(), dunes.created_at.timestamp());
        assert!(repo.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_honours_filter_and_sort() {
        let (_, repo) = repository();
        repo.create(&photo("B", "portrait", 2)).await.unwrap();
        repo.create(&photo("X", "wedding", 0)).await.unwrap();
        repo.create(&photo("A", "portrait", 1)).await.unwrap();

        let portraits = repo
            .list(
                &FindOptions::new()
                    .filter("category", "portrait")
                    .sort_by("order", SortDirection::Ascending),
            )
            .await
            .unwrap();

        let titles: Vec<_> = portraits.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn update_merges_set_fields_only() {
        let (_, repo) = repository();
        let original = photo("Dunes", "landscape", 1);
        repo.create(&original).await.unwrap();

        let updated = repo
            .update(
                &original.id,
                &PhotoUpdate {
                    featured: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(updated.featured);
        assert_eq!(updated.title, "Dunes");
        assert_eq!(updated.id, original.id);
    }

    #[tokio::test]
    async fn update_cannot_change_id() {
        let (_, repo) = repository();
        let original = photo("Dunes", "landscape", 1);
        repo.create(&original).await.unwrap();

        let err = repo
            .update(&original.id, &json!({"id": "hijacked"}))
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::EmptyUpdate));
        assert!(repo.find_by_id(&original.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn empty_update_is_rejected_before_lookup() {
        let (_, repo) = repository();

        let err = repo
            .update("missing", &PhotoUpdate::default())
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::EmptyUpdate));
    }

    #[tokio::test]
    async fn update_of_missing_entity_is_not_found() {
        let (store, repo) = repository();

        let err = repo
            .update(
                "missing",
                &PhotoUpdate {
                    title: Some("x".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Photo not found");
        assert_eq!(store.count("photos").await, 0);
    }

    #[tokio::test]
    async fn delete_removes_once() {
        let (_, repo) = repository();
        let dunes = photo("Dunes", "landscape", 1);
        repo.create(&dunes).await.unwrap();

        repo.delete(&dunes.id).await.unwrap();
        let err = repo.delete(&dunes.id).await.unwrap_err();

        assert!(matches!(err, RepositoryError::NotFound("Photo")));
    }
}
