//! # Yatube Infrastructure
//!
//! Concrete implementations of the ports defined in `yatube-core`.
//! This crate contains record storage, media storage, and auth services.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL record storage via SeaORM
//! - `minimal` - In-memory storage only

pub mod auth;
pub mod database;
pub mod media;

// Re-exports - In-Memory
pub use database::InMemoryStore;
pub use media::{FilesystemImageStore, InMemoryImageStore, MediaConfig};

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

// Re-exports - PostgreSQL
#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, DatabaseConnections};
