//! Table bootstrap derived from the entity definitions.

use sea_orm::{ConnectionTrait, DbConn, DbErr, Schema};

use super::entity::post::Entity as PostEntity;

/// Create the `posts` table when it does not exist yet.
pub async fn ensure_schema(db: &DbConn) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let mut create = Schema::new(backend).create_table_from_entity(PostEntity);
    create.if_not_exists();

    db.execute(backend.build(&create)).await?;
    tracing::info!("Posts table ready");
    Ok(())
}
