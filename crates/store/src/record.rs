//! Record store contract.

use async_trait::async_trait;
use common::{ProductId, ProductRecord};

use crate::Result;

/// Durable key-indexed store for product records.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persists a record, replacing any existing record with the same id.
    async fn put(&self, record: ProductRecord) -> Result<()>;

    /// Retrieves a record by id. Returns `None` if absent.
    async fn get(&self, id: ProductId) -> Result<Option<ProductRecord>>;

    /// Retrieves all records. Order is unspecified; callers sort as needed.
    async fn scan(&self) -> Result<Vec<ProductRecord>>;

    /// Deletes a record by id. Deleting an absent id is not an error.
    async fn delete(&self, id: ProductId) -> Result<()>;
}
