//! Object store contract and addressing types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Key addressing a blob within an object store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Creates a new object key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ObjectKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Resolvable URL of a stored object.
///
/// Locations are a pure function of store identity (bucket) and key,
/// so they can be computed without a round trip to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectLocation(String);

impl ObjectLocation {
    /// Creates a location from a raw URL string.
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Computes the S3-style virtual-hosted URL for a key in a bucket.
    pub fn for_bucket(bucket: &str, key: &ObjectKey) -> Self {
        Self(format!("https://{bucket}.s3.amazonaws.com/{key}"))
    }

    /// Recovers the object key from a location URL.
    ///
    /// The key is everything after the host part (`scheme://host/<key>`).
    /// Returns `None` when the URL has no path component.
    pub fn key_suffix(&self) -> Option<ObjectKey> {
        self.0
            .splitn(4, '/')
            .nth(3)
            .filter(|key| !key.is_empty())
            .map(ObjectKey::new)
    }

    /// Returns the location as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Durable blob storage addressed by key.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `bytes` under `key`, tagged with `content_type`.
    ///
    /// Returns the resolvable location of the stored object.
    async fn put(&self, key: &ObjectKey, bytes: Vec<u8>, content_type: &str)
    -> Result<ObjectLocation>;

    /// Deletes the object stored under `key`.
    ///
    /// Deleting an absent key is not an error.
    async fn delete(&self, key: &ObjectKey) -> Result<()>;

    /// Computes the location of `key` without contacting the store.
    fn location_for(&self, key: &ObjectKey) -> ObjectLocation;

    /// Derives the object key back from a location produced by this store.
    fn key_for_location(&self, location: &ObjectLocation) -> Option<ObjectKey>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_for_bucket_is_deterministic() {
        let key = ObjectKey::new("products/abc.png");
        let a = ObjectLocation::for_bucket("catalog-images", &key);
        let b = ObjectLocation::for_bucket("catalog-images", &key);
        assert_eq!(a, b);
        assert_eq!(
            a.as_str(),
            "https://catalog-images.s3.amazonaws.com/products/abc.png"
        );
    }

    #[test]
    fn key_suffix_inverts_for_bucket() {
        let key = ObjectKey::new("products/abc.png");
        let location = ObjectLocation::for_bucket("catalog-images", &key);
        assert_eq!(location.key_suffix(), Some(key));
    }

    #[test]
    fn key_suffix_preserves_nested_paths() {
        let location = ObjectLocation::new("https://b.s3.amazonaws.com/a/b/c.jpg");
        assert_eq!(location.key_suffix(), Some(ObjectKey::new("a/b/c.jpg")));
    }

    #[test]
    fn key_suffix_rejects_url_without_path() {
        let location = ObjectLocation::new("https://b.s3.amazonaws.com");
        assert_eq!(location.key_suffix(), None);
    }
}
