//! Catalog write coordinator.

use chrono::Utc;
use common::{ProductId, ProductRecord};
use store::{ObjectLocation, ObjectStore, RecordStore};

use crate::draft::ProductDraft;
use crate::error::{CatalogError, Result};

/// Coordinates catalog writes across the object store and the record store.
///
/// A create call moves through `Validating → Uploading → Persisting → Done`,
/// exiting to a failed state at the first error. The upload happens before
/// the record write so that a partial failure leaves at worst an orphaned
/// object, never a record referencing a missing image. No step is retried
/// here; retry policy belongs to the caller or the store clients.
pub struct CatalogCoordinator<O, R>
where
    O: ObjectStore,
    R: RecordStore,
{
    objects: O,
    records: R,
}

impl<O, R> CatalogCoordinator<O, R>
where
    O: ObjectStore,
    R: RecordStore,
{
    /// Creates a coordinator over the given store clients.
    pub fn new(objects: O, records: R) -> Self {
        Self { objects, records }
    }

    /// Validates the draft, uploads its image, and persists the record.
    ///
    /// If the record write fails after a successful upload, the uploaded
    /// object is deleted again so the stores do not diverge; a failure of
    /// that compensating delete is logged and the original error returned.
    #[tracing::instrument(skip(self, draft), fields(product_name = %draft.name))]
    pub async fn create_product(&self, draft: ProductDraft) -> Result<ProductRecord> {
        metrics::counter!("catalog_create_total").increment(1);
        let started = std::time::Instant::now();

        draft.validate()?;

        let ProductDraft {
            name,
            description,
            price,
            image,
        } = draft;

        let id = ProductId::new();
        let key = image.media_type.object_key(id);
        let content_type = image.media_type.content_type();

        let location = self
            .objects
            .put(&key, image.bytes, content_type)
            .await
            .map_err(CatalogError::StorageUpload)?;
        tracing::info!(product_id = %id, %key, %location, "image uploaded");

        let now = Utc::now();
        let record = ProductRecord {
            id,
            name,
            description,
            price,
            image_url: location.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };

        if let Err(persist_err) = self.records.put(record.clone()).await {
            // Compensate: remove the image so no orphaned object remains.
            if let Err(delete_err) = self.objects.delete(&key).await {
                tracing::warn!(
                    product_id = %id,
                    %key,
                    error = %delete_err,
                    "compensating image delete failed, object orphaned"
                );
            } else {
                tracing::info!(product_id = %id, %key, "compensated failed record write");
            }
            metrics::counter!("catalog_create_failed").increment(1);
            return Err(CatalogError::RecordPersist(persist_err));
        }

        metrics::counter!("catalog_products_created").increment(1);
        metrics::histogram!("catalog_create_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        tracing::info!(product_id = %id, "product created");

        Ok(record)
    }

    /// Returns all products, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<ProductRecord>> {
        let mut records = self
            .records
            .scan()
            .await
            .map_err(CatalogError::RecordScan)?;

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        tracing::debug!(count = records.len(), "products listed");
        Ok(records)
    }

    /// Deletes a product record and its stored image.
    ///
    /// The image delete is best effort: a dangling object degrades
    /// gracefully, while a record pointing at a missing image would not,
    /// so only the record delete can fail the operation.
    #[tracing::instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<ProductId> {
        let record = self
            .records
            .get(id)
            .await
            .map_err(CatalogError::RecordFetch)?
            .ok_or(CatalogError::NotFound(id))?;

        if !record.image_url.is_empty() {
            let location = ObjectLocation::new(record.image_url.clone());
            match self.objects.key_for_location(&location) {
                Some(key) => {
                    if let Err(e) = self.objects.delete(&key).await {
                        tracing::warn!(
                            product_id = %id,
                            %key,
                            error = %e,
                            "image delete failed, leaving dangling object"
                        );
                    }
                }
                None => {
                    tracing::warn!(
                        product_id = %id,
                        image_url = %record.image_url,
                        "could not derive object key from image url"
                    );
                }
            }
        }

        self.records
            .delete(id)
            .await
            .map_err(CatalogError::RecordDelete)?;

        metrics::counter!("catalog_products_deleted").increment(1);
        tracing::info!(product_id = %id, "product deleted");

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use store::{InMemoryObjectStore, InMemoryRecordStore};

    use super::*;
    use crate::image::{ImagePayload, MediaType};

    fn coordinator() -> CatalogCoordinator<InMemoryObjectStore, InMemoryRecordStore> {
        CatalogCoordinator::new(
            InMemoryObjectStore::new("catalog-images"),
            InMemoryRecordStore::new(),
        )
    }

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            description: "test product".to_string(),
            price: 4.5,
            image: ImagePayload::new(vec![0xFF, 0xD8, 0xFF], MediaType::Jpeg),
        }
    }

    #[tokio::test]
    async fn create_assigns_matching_timestamps() {
        let coordinator = coordinator();
        let record = coordinator.create_product(draft("Mug")).await.unwrap();
        assert_eq!(record.created_at, record.updated_at);
    }

    #[tokio::test]
    async fn create_links_record_to_uploaded_object() {
        let coordinator = coordinator();
        let record = coordinator.create_product(draft("Mug")).await.unwrap();
        assert!(record.image_url.ends_with(&format!("products/{}.jpg", record.id)));
    }

    #[tokio::test]
    async fn delete_returns_the_deleted_id() {
        let coordinator = coordinator();
        let record = coordinator.create_product(draft("Mug")).await.unwrap();
        let deleted = coordinator.delete_product(record.id).await.unwrap();
        assert_eq!(deleted, record.id);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let coordinator = coordinator();
        let result = coordinator.delete_product(ProductId::new()).await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }
}
