//! Post use-case service.
//!
//! Every operation is a single pass of validate → lookup → merge → persist.
//! Nothing is cached between calls; the repository handle is the only state.

use std::sync::Arc;

use crate::domain::{Post, PostDraft};
use crate::error::DomainError;
use crate::ports::{BaseRepository, PostRepository};

pub type DomainResult<T> = Result<T, DomainError>;

/// Post service facade over a repository implementation.
#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    /// All posts, empty when the store is empty.
    pub async fn list(&self) -> DomainResult<Vec<Post>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn get(&self, id: i32) -> DomainResult<Post> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    pub async fn find_by_title(&self, title: &str) -> DomainResult<Post> {
        self.repo
            .find_by_title(title)
            .await?
            .ok_or_else(|| DomainError::post_not_found(title))
    }

    /// Validate and store a new post. Nothing is written when validation fails.
    ///
    /// An id that already exists is saved over: its `title` and `body` are
    /// replaced and its version bumped, the same as any other save.
    pub async fn create(&self, draft: PostDraft) -> DomainResult<Post> {
        let post = draft.into_new_post().map_err(DomainError::Validation)?;
        Ok(self.repo.save(post).await?)
    }

    /// Replace `title` and `body` of an existing post.
    ///
    /// `id`, `user_id` and `version` in the draft are ignored; the stored
    /// values are kept and the store bumps the version.
    pub async fn update(&self, id: i32, draft: PostDraft) -> DomainResult<Post> {
        let violations = draft.content_violations();
        if !violations.is_empty() {
            return Err(DomainError::Validation(violations));
        }

        let existing = self.get(id).await?;
        let merged = existing.merge_update(draft);
        Ok(self.repo.save(merged).await?)
    }

    /// Remove a post. A missing id counts as already deleted.
    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        Ok(self.repo.delete_by_id(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use super::*;
    use crate::error::RepoError;

    #[derive(Default)]
    struct StubRepository {
        rows: Mutex<BTreeMap<i32, Post>>,
    }

    #[async_trait]
    impl BaseRepository<Post, i32> for StubRepository {
        async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
            Ok(self.rows.lock().await.values().cloned().collect())
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
            Ok(self.rows.lock().await.get(&id).cloned())
        }

        async fn save(&self, mut post: Post) -> Result<Post, RepoError> {
            let mut rows = self.rows.lock().await;
            post.version = match rows.get(&post.id) {
                Some(current) => current.version.map(|v| v + 1),
                None => Some(1),
            };
            rows.insert(post.id, post.clone());
            Ok(post)
        }

        async fn delete_by_id(&self, id: i32) -> Result<(), RepoError> {
            self.rows.lock().await.remove(&id);
            Ok(())
        }

        async fn count(&self) -> Result<u64, RepoError> {
            Ok(self.rows.lock().await.len() as u64)
        }
    }

    #[async_trait]
    impl PostRepository for StubRepository {
        async fn find_by_title(&self, title: &str) -> Result<Option<Post>, RepoError> {
            Ok(self
                .rows
                .lock()
                .await
                .values()
                .find(|p| p.title == title)
                .cloned())
        }
    }

    struct BrokenRepository;

    #[async_trait]
    impl BaseRepository<Post, i32> for BrokenRepository {
        async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
            Err(RepoError::Connection("refused".to_string()))
        }

        async fn find_by_id(&self, _id: i32) -> Result<Option<Post>, RepoError> {
            Err(RepoError::Connection("refused".to_string()))
        }

        async fn save(&self, _post: Post) -> Result<Post, RepoError> {
            Err(RepoError::Connection("refused".to_string()))
        }

        async fn delete_by_id(&self, _id: i32) -> Result<(), RepoError> {
            Err(RepoError::Connection("refused".to_string()))
        }

        async fn count(&self) -> Result<u64, RepoError> {
            Err(RepoError::Connection("refused".to_string()))
        }
    }

    #[async_trait]
    impl PostRepository for BrokenRepository {
        async fn find_by_title(&self, _title: &str) -> Result<Option<Post>, RepoError> {
            Err(RepoError::Connection("refused".to_string()))
        }
    }

    fn service() -> PostService {
        PostService::new(Arc::new(StubRepository::default()))
    }

    fn draft(id: i32, user_id: i32, title: &str, body: &str) -> PostDraft {
        PostDraft {
            id: Some(id),
            user_id: Some(user_id),
            title: title.to_string(),
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_get_returns_same_fields() {
        let service = service();
        let created = service.create(draft(101, 1, "101 Title", "101 Body")).await.unwrap();
        assert_eq!(created.version, Some(1));

        let loaded = service.get(101).await.unwrap();
        assert_eq!(loaded.id, 101);
        assert_eq!(loaded.user_id, 1);
        assert_eq!(loaded.title, "101 Title");
        assert_eq!(loaded.body, "101 Body");
        assert!(loaded.version.is_some());
    }

    #[tokio::test]
    async fn create_on_existing_id_saves_over_it() {
        let service = service();
        service.create(draft(5, 1, "first", "first")).await.unwrap();

        let again = service.create(draft(5, 1, "second", "second")).await.unwrap();

        assert_eq!(again.title, "second");
        assert_eq!(again.version, Some(2));
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_with_blank_fields_writes_nothing() {
        let service = service();
        let err = service.create(draft(101, 1, "", " ")).await.unwrap_err();

        match err {
            DomainError::Validation(violations) => assert_eq!(violations.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_post_is_not_found_for_get_and_update() {
        let service = service();
        assert!(matches!(
            service.get(999).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            service.update(999, draft(999, 1, "t", "b")).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn update_keeps_owner_and_bumps_version() {
        let service = service();
        service.create(draft(3, 1, "title3", "body3")).await.unwrap();

        let updated = service
            .update(3, draft(77, 9, "NEW", "NEW BODY"))
            .await
            .unwrap();

        assert_eq!(
            updated,
            Post {
                id: 3,
                user_id: 1,
                title: "NEW".to_string(),
                body: "NEW BODY".to_string(),
                version: Some(2),
            }
        );
        assert!(matches!(
            service.get(77).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn update_rejects_blank_content() {
        let service = service();
        service.create(draft(3, 1, "title3", "body3")).await.unwrap();

        let err = service.update(3, draft(3, 1, "", "body")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(service.get(3).await.unwrap().version, Some(1));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let service = service();
        service.create(draft(1, 1, "t", "b")).await.unwrap();

        service.delete(1).await.unwrap();
        service.delete(1).await.unwrap();
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_by_title_reports_missing_title() {
        let service = service();
        service.create(draft(1, 1, "title1", "body1")).await.unwrap();

        assert_eq!(service.find_by_title("title1").await.unwrap().id, 1);
        assert!(matches!(
            service.find_by_title("nope").await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn store_failures_surface_as_persistence_errors() {
        let service = PostService::new(Arc::new(BrokenRepository));
        assert!(matches!(
            service.list().await,
            Err(DomainError::Persistence(RepoError::Connection(_)))
        ));
        assert!(matches!(
            service.delete(1).await,
            Err(DomainError::Persistence(_))
        ));
    }
}
