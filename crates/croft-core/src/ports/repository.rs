use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Post;
use crate::error::RepoError;

/// Generic repository trait defining standard aggregate operations.
///
/// `update` is a full replace guarded by the entity's version field: the
/// write only lands when the stored version still matches, and a stale
/// writer gets [`RepoError::Conflict`] back instead of silently clobbering
/// a concurrent mutation.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Replace an existing entity, checked against its version field.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository - the aggregate store for posts with embedded comments.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// All posts, newest first.
    async fn find_all_newest_first(&self) -> Result<Vec<Post>, RepoError>;

    /// All posts by the given author, newest first.
    async fn find_by_author(&self, author: &str) -> Result<Vec<Post>, RepoError>;
}
