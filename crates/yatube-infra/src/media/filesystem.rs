//! Filesystem-backed image storage.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use yatube_core::ports::{ImageStore, MediaError, is_safe_name};

use super::{join_url, new_image_name};

/// Where media files live and how they are addressed.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub root: PathBuf,
    pub base_url: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("media"),
            base_url: "/media/".to_string(),
        }
    }
}

impl MediaConfig {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            root: std::env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or(default.root),
            base_url: std::env::var("MEDIA_URL").unwrap_or(default.base_url),
        }
    }
}

/// Stores images as plain files below `MediaConfig::root`.
pub struct FilesystemImageStore {
    config: MediaConfig,
}

impl FilesystemImageStore {
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, MediaError> {
        if !is_safe_name(name) {
            return Err(MediaError::InvalidName(name.to_string()));
        }
        Ok(self.config.root.join(name))
    }
}

#[async_trait]
impl ImageStore for FilesystemImageStore {
    async fn save(&self, extension: &str, bytes: &[u8]) -> Result<String, MediaError> {
        let name = new_image_name(extension);
        let path = self.path_for(&name)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| MediaError::Io(e.to_string()))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| MediaError::Io(e.to_string()))?;

        tracing::debug!(image = %name, size = bytes.len(), "Image stored");
        Ok(name)
    }

    async fn open(&self, name: &str) -> Result<Option<Vec<u8>>, MediaError> {
        let path = self.path_for(name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MediaError::Io(e.to_string())),
        }
    }

    async fn remove(&self, name: &str) -> Result<(), MediaError> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MediaError::Io(e.to_string())),
        }
    }

    fn url(&self, name: &str) -> String {
        join_url(&self.config.base_url, name)
    }
}
