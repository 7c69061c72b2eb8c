//! PostgreSQL post repository.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use posts_core::Post;
use posts_core::error::RepoError;
use posts_core::ports::{BaseRepository, PostRepository};

use super::entity::post::{self, Entity as PostEntity};

/// Version given to a post on its first write.
const INITIAL_VERSION: i32 = 1;

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    #[cfg(test)]
    pub(crate) fn into_connection(self) -> DbConn {
        self.db
    }

    /// Overwrite title/body of an existing row and bump its version in one
    /// statement. Returns `None` when no row has this id.
    async fn update_existing(&self, post: &Post) -> Result<Option<Post>, RepoError> {
        let current: SimpleExpr = Expr::col(post::Column::Version).into();
        let next_version = Expr::expr(Func::coalesce([current, Expr::val(0).into()])).add(1);

        let rows = PostEntity::update_many()
            .col_expr(post::Column::Title, Expr::value(post.title.clone()))
            .col_expr(post::Column::Body, Expr::value(post.body.clone()))
            .col_expr(post::Column::Version, next_version)
            .filter(post::Column::Id.eq(post.id))
            .exec_with_returning(&self.db)
            .await
            .map_err(write_error)?;

        Ok(rows.into_iter().next().map(Into::into))
    }

    async fn insert_new(&self, post: Post) -> Result<Post, RepoError> {
        let model = post::ActiveModel {
            version: Set(Some(INITIAL_VERSION)),
            ..post.into()
        }
        .insert(&self.db)
        .await
        .map_err(write_error)?;

        Ok(model.into())
    }
}

#[async_trait]
impl BaseRepository<Post, i32> for PostgresPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        if let Some(updated) = self.update_existing(&post).await? {
            tracing::debug!(post_id = updated.id, version = ?updated.version, "Post updated");
            return Ok(updated);
        }

        // A concurrent insert of the same id loses on the primary key.
        let inserted = self.insert_new(post).await?;
        tracing::debug!(post_id = inserted.id, "Post inserted");
        Ok(inserted)
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(write_error)?;

        tracing::debug!(post_id = id, rows = result.rows_affected, "Post delete");
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        PostEntity::find().count(&self.db).await.map_err(read_error)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_title(&self, title: &str) -> Result<Option<Post>, RepoError> {
        tracing::debug!(title, "Finding post by title");

        let result = PostEntity::find()
            .filter(post::Column::Title.eq(title))
            .order_by_asc(post::Column::Id)
            .one(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.map(Into::into))
    }
}

fn read_error(err: DbErr) -> RepoError {
    match &err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(err.to_string()),
        _ => RepoError::Query(err.to_string()),
    }
}

fn write_error(err: DbErr) -> RepoError {
    let err_str = err.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint("Post already exists".to_string())
    } else {
        read_error(err)
    }
}
