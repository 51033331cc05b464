//! Application state - shared across all handlers.

use std::sync::Arc;

use yatube_core::ports::{
    GroupRepository, ImageStore, PasswordService, PostRepository, TokenService, UserRepository,
};
use yatube_infra::{
    Argon2PasswordService, FilesystemImageStore, InMemoryStore, JwtTokenService,
};

use crate::config::AppConfig;

#[cfg(feature = "postgres")]
use yatube_infra::database::{
    PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository,
};
#[cfg(feature = "postgres")]
use yatube_infra::{DatabaseConfig, DatabaseConnections};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub images: Arc<dyn ImageStore>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    ///
    /// Fails when a database is configured but cannot be reached.
    pub async fn new(config: &AppConfig) -> std::io::Result<Self> {
        let images: Arc<dyn ImageStore> = Arc::new(FilesystemImageStore::new(config.media.clone()));
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));

        let state = match config.database.url.as_deref() {
            #[cfg(feature = "postgres")]
            Some(url) => {
                let connections = DatabaseConnections::init(&DatabaseConfig {
                    url: url.to_string(),
                    max_connections: config.database.max_connections,
                    min_connections: config.database.min_connections,
                })
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to connect to database");
                    std::io::Error::other(e.to_string())
                })?;

                Self {
                    users: Arc::new(PostgresUserRepository::new(connections.main.clone())),
                    groups: Arc::new(PostgresGroupRepository::new(connections.main.clone())),
                    posts: Arc::new(PostgresPostRepository::new(connections.main)),
                    images,
                    tokens,
                    passwords: Arc::new(Argon2PasswordService::new()),
                }
            }
            #[cfg(not(feature = "postgres"))]
            Some(_) => {
                tracing::warn!("DATABASE_URL ignored: built without postgres feature");
                Self::in_memory(images, tokens)
            }
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::in_memory(images, tokens)
            }
        };

        tracing::info!("Application state initialized");
        Ok(state)
    }

    /// State backed by a single in-memory store.
    pub fn in_memory(images: Arc<dyn ImageStore>, tokens: Arc<dyn TokenService>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            groups: store.clone(),
            posts: store,
            images,
            tokens,
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }
}
