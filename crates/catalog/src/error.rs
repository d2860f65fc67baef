//! Catalog error types.

use common::ProductId;
use store::StoreError;
use thiserror::Error;

/// Draft validation failures. These are caller errors and are
/// guaranteed to be raised before any store is contacted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Product name must not be empty.
    #[error("Product name must not be empty")]
    EmptyName,

    /// Product description must not be empty.
    #[error("Product description must not be empty")]
    EmptyDescription,

    /// Product price must be a non-negative number.
    #[error("Product price must be non-negative, got {0}")]
    InvalidPrice(f64),

    /// Image data is required and must not be empty.
    #[error("Product image data is required")]
    MissingImage,

    /// The supplied image data could not be decoded.
    #[error("Image data is not valid base64: {0}")]
    InvalidImageData(String),
}

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The draft failed validation; no side effects were performed.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Uploading the image to the object store failed; no record was written.
    #[error("Failed to upload image: {0}")]
    StorageUpload(StoreError),

    /// Persisting the product record failed after the image was uploaded.
    #[error("Failed to store product record: {0}")]
    RecordPersist(StoreError),

    /// Reading a product record failed.
    #[error("Failed to retrieve product record: {0}")]
    RecordFetch(StoreError),

    /// Scanning the record store failed.
    #[error("Failed to list product records: {0}")]
    RecordScan(StoreError),

    /// Deleting the product record failed.
    #[error("Failed to delete product record: {0}")]
    RecordDelete(StoreError),

    /// No record exists with the given id.
    #[error("Product not found: {0}")]
    NotFound(ProductId),
}

/// Convenience type alias for catalog results.
pub type Result<T> = std::result::Result<T, CatalogError>;
