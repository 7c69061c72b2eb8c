use async_trait::async_trait;

use crate::domain::Post;
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Every stored entity, in storage order.
    async fn find_all(&self) -> Result<Vec<T>, RepoError>;

    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (insert or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Deleting a missing ID is not an error.
    async fn delete_by_id(&self, id: ID) -> Result<(), RepoError>;

    /// Number of stored entities.
    async fn count(&self) -> Result<u64, RepoError>;
}

/// Post repository.
///
/// `save` owns the `version` column: a new post is stored with version 1,
/// an existing one gets its `title`/`body` replaced and its version bumped.
/// The version carried by the argument is ignored.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    /// Exact title match. Titles are not unique; the lowest id wins.
    async fn find_by_title(&self, title: &str) -> Result<Option<Post>, RepoError>;

    /// Save posts one after the other, stopping at the first failure.
    async fn save_all(&self, posts: Vec<Post>) -> Result<Vec<Post>, RepoError> {
        let mut saved = Vec::with_capacity(posts.len());
        for post in posts {
            saved.push(self.save(post).await?);
        }
        Ok(saved)
    }
}
