use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// A persisted catalog entry.
///
/// The record references its image by URL; it never holds the image
/// bytes themselves. A record with a non-empty `image_url` is expected
/// to have a live object in the object store behind that URL.
///
/// Wire field names are camelCase (`imageUrl`, `createdAt`, ...) to
/// match the public API format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Immutable identifier, assigned once at creation.
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Resolvable URL of the stored product image.
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    /// Set equal to `created_at` on creation; reserved for future update flows.
    pub updated_at: DateTime<Utc>,
}
