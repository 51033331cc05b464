//! In-memory image storage - for tests and database-less runs.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use yatube_core::ports::{ImageStore, MediaError, is_safe_name};

use super::{join_url, new_image_name};

/// Keeps uploaded images in a map. Data is lost on process restart.
pub struct InMemoryImageStore {
    files: RwLock<HashMap<String, Vec<u8>>>,
    base_url: String,
}

impl InMemoryImageStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            base_url: base_url.into(),
        }
    }

    /// Number of stored images.
    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }
}

impl Default for InMemoryImageStore {
    fn default() -> Self {
        Self::new("/media/")
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn save(&self, extension: &str, bytes: &[u8]) -> Result<String, MediaError> {
        let name = new_image_name(extension);
        self.files.write().await.insert(name.clone(), bytes.to_vec());
        Ok(name)
    }

    async fn open(&self, name: &str) -> Result<Option<Vec<u8>>, MediaError> {
        if !is_safe_name(name) {
            return Err(MediaError::InvalidName(name.to_string()));
        }
        Ok(self.files.read().await.get(name).cloned())
    }

    async fn remove(&self, name: &str) -> Result<(), MediaError> {
        self.files.write().await.remove(name);
        Ok(())
    }

    fn url(&self, name: &str) -> String {
        join_url(&self.base_url, name)
    }
}
