//! In-memory post repository - used when no database is configured.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use posts_core::Post;
use posts_core::error::RepoError;
use posts_core::ports::{BaseRepository, PostRepository};

/// Post store backed by a `BTreeMap` keyed on id, behind an async RwLock.
///
/// Iteration follows ascending id, the same order the PostgreSQL adapter
/// returns. Data is lost on process restart.
pub struct InMemoryPostRepository {
    rows: RwLock<BTreeMap<i32, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, i32> for InMemoryPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.rows.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut rows = self.rows.write().await;

        let saved = match rows.get(&post.id) {
            Some(current) => {
                let version = current.version.unwrap_or(0).checked_add(1).ok_or_else(|| {
                    RepoError::Constraint(format!("Post {} version out of range", post.id))
                })?;
                Post {
                    title: post.title,
                    body: post.body,
                    version: Some(version),
                    ..current.clone()
                }
            }
            None => Post {
                version: Some(1),
                ..post
            },
        };

        rows.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), RepoError> {
        self.rows.write().await.remove(&id);
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.rows.read().await.len() as u64)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_title(&self, title: &str) -> Result<Option<Post>, RepoError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|p| p.title == title)
            .cloned())
    }
}
