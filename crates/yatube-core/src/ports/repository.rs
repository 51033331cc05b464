use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Group, NewGroup, NewPost, Post, PostFilter, User};
use crate::error::RepoError;

/// Generic repository trait defining lookups shared by every record.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Insert a new user. Fails with `Constraint` when the username is taken.
    async fn create(&self, user: User) -> Result<User, RepoError>;
}

/// Group repository.
///
/// Deleting a group detaches its posts instead of removing them.
#[async_trait]
pub trait GroupRepository: BaseRepository<Group, i64> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    /// All groups ordered by title, used for form choices.
    async fn list_all(&self) -> Result<Vec<Group>, RepoError>;

    /// Insert a new group. Fails with `Constraint` when the slug is taken.
    async fn create(&self, group: NewGroup) -> Result<Group, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// Insert a new post; the store assigns `id` and `pub_date`.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Persist text, group and image of an existing post. `pub_date` and
    /// `author_id` are left untouched.
    async fn update(&self, post: Post) -> Result<Post, RepoError>;

    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError>;

    /// Posts newest-first, sliced by `offset` and `limit`.
    async fn list(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;
}
