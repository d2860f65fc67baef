//! Image payloads and media type handling.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use common::ProductId;
use store::ObjectKey;

use crate::error::ValidationError;

/// Declared media type of an uploaded image.
///
/// Unrecognized declared types fall back to JPEG rather than being
/// rejected; the bytes are stored as-is either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaType {
    #[default]
    Jpeg,
    Png,
    Gif,
}

impl MediaType {
    /// Parses a declared media type string (e.g. `"image/png"`).
    pub fn from_declared(declared: &str) -> Self {
        match declared {
            "image/jpeg" | "image/jpg" => MediaType::Jpeg,
            "image/png" => MediaType::Png,
            "image/gif" => MediaType::Gif,
            _ => MediaType::Jpeg,
        }
    }

    /// Returns the file extension used in storage keys.
    pub fn extension(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "jpg",
            MediaType::Png => "png",
            MediaType::Gif => "gif",
        }
    }

    /// Returns the MIME content type attached to the stored object.
    pub fn content_type(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Gif => "image/gif",
        }
    }

    /// Derives the storage key for a product's image.
    pub fn object_key(&self, id: ProductId) -> ObjectKey {
        ObjectKey::new(format!("products/{}.{}", id, self.extension()))
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content_type())
    }
}

/// Decoded image bytes plus their declared media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub media_type: MediaType,
}

impl ImagePayload {
    /// Creates a payload from already-decoded bytes.
    pub fn new(bytes: Vec<u8>, media_type: MediaType) -> Self {
        Self { bytes, media_type }
    }

    /// Parses a base64 data URL of the form `data:image/png;base64,<bytes>`.
    ///
    /// A bare base64 string without the data-URL prefix is also accepted
    /// and treated as JPEG.
    pub fn from_data_url(raw: &str) -> Result<Self, ValidationError> {
        let (media_type, encoded) = match raw.strip_prefix("data:") {
            Some(rest) => {
                let (header, body) = rest
                    .split_once(',')
                    .ok_or_else(|| ValidationError::InvalidImageData("missing ','".to_string()))?;
                let declared = header.split(';').next().unwrap_or_default();
                (MediaType::from_declared(declared), body)
            }
            None => (MediaType::Jpeg, raw),
        };

        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| ValidationError::InvalidImageData(e.to_string()))?;

        Ok(Self { bytes, media_type })
    }
}
