//! Media storage port - where uploaded post images live.

use async_trait::async_trait;

/// Image storage trait - abstraction over filesystem or in-memory backends.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store image bytes and return the stored name, e.g. `posts/<uuid>.png`.
    async fn save(&self, extension: &str, bytes: &[u8]) -> Result<String, MediaError>;

    /// Load a stored image by name. `Ok(None)` when it does not exist.
    async fn open(&self, name: &str) -> Result<Option<Vec<u8>>, MediaError>;

    /// Remove a stored image. Missing names are not an error.
    async fn remove(&self, name: &str) -> Result<(), MediaError>;

    /// Public URL a template can point at.
    fn url(&self, name: &str) -> String;
}

/// Media storage errors.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Invalid media name: {0}")]
    InvalidName(String),

    #[error("Storage I/O failed: {0}")]
    Io(String),
}

/// Reject names that could escape the storage root.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('/')
        && !name.contains('\\')
        && name
            .split('/')
            .all(|part| !part.is_empty() && part != "." && part != "..")
}
