//! Catalog write coordinator.
//!
//! Coordinates product creation across two independently-failing stores:
//! the image goes to an object store first, then the record referencing
//! it is persisted. Ordering matters because the stores share no
//! transaction: a crash between the two steps leaves at worst an
//! orphaned image, never a record pointing at nothing. When record
//! persistence fails outright, a compensating delete removes the
//! freshly uploaded image.

pub mod coordinator;
pub mod draft;
pub mod error;
pub mod image;

pub use coordinator::CatalogCoordinator;
pub use draft::ProductDraft;
pub use error::{CatalogError, ValidationError};
pub use image::{ImagePayload, MediaType};
