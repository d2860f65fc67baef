//! In-memory store implementations for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{ProductId, ProductRecord};
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::object::{ObjectKey, ObjectLocation, ObjectStore};
use crate::record::RecordStore;

/// A blob held by the in-memory object store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Default)]
struct ObjectState {
    objects: HashMap<ObjectKey, StoredObject>,
    fail_on_put: bool,
    fail_on_delete: bool,
}

/// In-memory object store for testing.
///
/// Mimics S3 addressing: locations follow the virtual-hosted URL scheme
/// of the configured bucket name. Failure injection switches let tests
/// exercise the coordinator's partial-failure paths.
#[derive(Debug, Clone)]
pub struct InMemoryObjectStore {
    bucket: String,
    state: Arc<RwLock<ObjectState>>,
}

impl InMemoryObjectStore {
    /// Creates a new empty store addressing the given bucket name.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            state: Arc::new(RwLock::new(ObjectState::default())),
        }
    }

    /// Configures the store to fail the next put calls.
    pub async fn set_fail_on_put(&self, fail: bool) {
        self.state.write().await.fail_on_put = fail;
    }

    /// Configures the store to fail the next delete calls.
    pub async fn set_fail_on_delete(&self, fail: bool) {
        self.state.write().await.fail_on_delete = fail;
    }

    /// Returns the number of stored objects.
    pub async fn object_count(&self) -> usize {
        self.state.read().await.objects.len()
    }

    /// Returns the stored object under `key`, if any.
    pub async fn get_object(&self, key: &ObjectKey) -> Option<StoredObject> {
        self.state.read().await.objects.get(key).cloned()
    }

    /// Removes an object without going through the trait, simulating
    /// external deletion.
    pub async fn remove_out_of_band(&self, key: &ObjectKey) {
        self.state.write().await.objects.remove(key);
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(
        &self,
        key: &ObjectKey,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<ObjectLocation> {
        let mut state = self.state.write().await;

        if state.fail_on_put {
            return Err(StoreError::backend("object put", "injected put failure"));
        }

        state.objects.insert(
            key.clone(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );

        Ok(self.location_for(key))
    }

    async fn delete(&self, key: &ObjectKey) -> Result<()> {
        let mut state = self.state.write().await;

        if state.fail_on_delete {
            return Err(StoreError::backend(
                "object delete",
                "injected delete failure",
            ));
        }

        state.objects.remove(key);
        Ok(())
    }

    fn location_for(&self, key: &ObjectKey) -> ObjectLocation {
        ObjectLocation::for_bucket(&self.bucket, key)
    }

    fn key_for_location(&self, location: &ObjectLocation) -> Option<ObjectKey> {
        location.key_suffix()
    }
}

#[derive(Debug, Default)]
struct RecordState {
    records: HashMap<ProductId, ProductRecord>,
    fail_on_put: bool,
    fail_on_get: bool,
    fail_on_scan: bool,
    fail_on_delete: bool,
}

/// In-memory record store for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    state: Arc<RwLock<RecordState>>,
}

impl InMemoryRecordStore {
    /// Creates a new empty record store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail the next put calls.
    pub async fn set_fail_on_put(&self, fail: bool) {
        self.state.write().await.fail_on_put = fail;
    }

    /// Configures the store to fail the next get calls.
    pub async fn set_fail_on_get(&self, fail: bool) {
        self.state.write().await.fail_on_get = fail;
    }

    /// Configures the store to fail the next scan calls.
    pub async fn set_fail_on_scan(&self, fail: bool) {
        self.state.write().await.fail_on_scan = fail;
    }

    /// Configures the store to fail the next delete calls.
    pub async fn set_fail_on_delete(&self, fail: bool) {
        self.state.write().await.fail_on_delete = fail;
    }

    /// Returns the number of stored records.
    pub async fn record_count(&self) -> usize {
        self.state.read().await.records.len()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn put(&self, record: ProductRecord) -> Result<()> {
        let mut state = self.state.write().await;

        if state.fail_on_put {
            return Err(StoreError::backend("record put", "injected put failure"));
        }

        state.records.insert(record.id, record);
        Ok(())
    }

    async fn get(&self, id: ProductId) -> Result<Option<ProductRecord>> {
        let state = self.state.read().await;

        if state.fail_on_get {
            return Err(StoreError::backend("record get", "injected get failure"));
        }

        Ok(state.records.get(&id).cloned())
    }

    async fn scan(&self) -> Result<Vec<ProductRecord>> {
        let state = self.state.read().await;

        if state.fail_on_scan {
            return Err(StoreError::backend("record scan", "injected scan failure"));
        }

        Ok(state.records.values().cloned().collect())
    }

    async fn delete(&self, id: ProductId) -> Result<()> {
        let mut state = self.state.write().await;

        if state.fail_on_delete {
            return Err(StoreError::backend(
                "record delete",
                "injected delete failure",
            ));
        }

        state.records.remove(&id);
        Ok(())
    }
}
