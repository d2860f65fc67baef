//! Product drafts and their validation rules.

use crate::error::ValidationError;
use crate::image::ImagePayload;

/// Unvalidated input for creating a catalog entry.
///
/// Built per request and discarded after processing; never persisted.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: ImagePayload,
}

impl ProductDraft {
    /// Checks the draft against the catalog's input rules.
    ///
    /// Runs before any store is contacted, so a failing draft produces
    /// no side effects.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        if self.price.is_nan() || self.price < 0.0 {
            return Err(ValidationError::InvalidPrice(self.price));
        }
        if self.image.bytes.is_empty() {
            return Err(ValidationError::MissingImage);
        }
        Ok(())
    }
}
