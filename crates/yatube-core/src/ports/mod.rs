//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod media;
mod repository;

pub use auth::{AuthError, DEFAULT_ROLE, PasswordService, TokenClaims, TokenService};
pub use media::{ImageStore, MediaError, is_safe_name};
pub use repository::{BaseRepository, GroupRepository, PostRepository, UserRepository};
