//! Image storage implementations - local filesystem and in-memory fallback.

mod filesystem;
mod memory;

pub use filesystem::{FilesystemImageStore, MediaConfig};
pub use memory::InMemoryImageStore;

/// Directory (and name prefix) uploaded post images are stored under.
pub(crate) const POSTS_DIR: &str = "posts";

pub(crate) fn new_image_name(extension: &str) -> String {
    format!("{POSTS_DIR}/{}.{extension}", uuid::Uuid::new_v4())
}

pub(crate) fn join_url(base_url: &str, name: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), name)
}
