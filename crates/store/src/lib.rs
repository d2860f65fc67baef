//! Store contracts for the product catalog.
//!
//! Two independently-failing collaborators sit behind these traits:
//! an [`ObjectStore`] for image blobs and a [`RecordStore`] for product
//! records. In-memory implementations back the test suite and local
//! development; AWS-backed implementations (S3, DynamoDB) back deployment.

pub mod aws;
pub mod error;
pub mod memory;
pub mod object;
pub mod record;

pub use aws::{AwsStoreConfig, DynamoRecordStore, S3ObjectStore};
pub use error::{Result, StoreError};
pub use memory::{InMemoryObjectStore, InMemoryRecordStore, StoredObject};
pub use object::{ObjectKey, ObjectLocation, ObjectStore};
pub use record::RecordStore;
