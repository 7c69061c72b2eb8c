#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::database::entity::post;
    use crate::database::postgres_repo::PostgresPostRepository;
    use crate::database::schema::ensure_schema;
    use posts_core::Post;
    use posts_core::error::RepoError;
    use posts_core::ports::{BaseRepository, PostRepository};
    use sea_orm::{
        DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, MockExecResult, RuntimeErr,
        Value,
    };

    fn model(id: i32, title: &str, version: i32) -> post::Model {
        post::Model {
            id,
            user_id: 1,
            title: title.to_owned(),
            body: format!("body{id}"),
            version: Some(version),
        }
    }

    // Statements issued so far, with the SQL identifier quotes unescaped.
    fn logged_statements(db: DatabaseConnection) -> Vec<String> {
        db.into_transaction_log()
            .iter()
            .map(|txn| format!("{txn:?}").replace("\\\"", "\""))
            .collect()
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(4, "Test Post", 1)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(4).await.unwrap();

        let post = result.unwrap();
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, 4);
        assert_eq!(post.version, Some(1));
    }

    #[tokio::test]
    async fn test_find_all_posts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                model(1, "title1", 1),
                model(2, "title2", 1),
                model(3, "title3", 1),
            ]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        assert_eq!(repo.find_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_find_by_title() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(1, "title1", 1)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let post = repo.find_by_title("title1").await.unwrap().unwrap();
        assert_eq!(post.title, "title1");
    }

    #[tokio::test]
    async fn test_save_existing_post_returns_bumped_version() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(3, "NEW", 2)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let saved = repo.save(Post::new(3, 1, "NEW", "body3")).await.unwrap();

        assert_eq!(saved.version, Some(2));
        assert_eq!(saved.title, "NEW");
    }

    #[tokio::test]
    async fn test_save_new_post_inserts_with_initial_version() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .append_query_results([vec![model(101, "101 Title", 1)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let saved = repo
            .save(Post::new(101, 1, "101 Title", "body101"))
            .await
            .unwrap();

        assert_eq!(saved.id, 101);
        assert_eq!(saved.version, Some(1));
    }

    #[tokio::test]
    async fn test_update_sets_version_in_sql_and_keeps_owner() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(3, "NEW", 2)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let mut post = Post::new(3, 9, "NEW", "body3");
        post.version = Some(77);
        repo.save(post).await.unwrap();

        let log = logged_statements(repo.into_connection());
        assert_eq!(log.len(), 1);
        let update = &log[0];
        let set_clause = &update[update.find("UPDATE").unwrap()..update.find("WHERE").unwrap()];
        assert!(set_clause.contains(r#""version" = COALESCE("version""#));
        assert!(!set_clause.contains(r#""user_id""#));
        assert!(!update.contains("Int(Some(77))"));
        assert!(!update.contains("Int(Some(9))"));
    }

    #[tokio::test]
    async fn test_insert_binds_initial_version_not_client_version() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .append_query_results([vec![model(101, "101 Title", 1)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let mut post = Post::new(101, 2, "101 Title", "body101");
        post.version = Some(77);
        repo.save(post).await.unwrap();

        let log = logged_statements(repo.into_connection());
        assert_eq!(log.len(), 2);
        let insert = &log[1];
        assert!(insert.contains(r#"INSERT INTO "posts""#));
        assert!(insert.contains("Int(Some(1))"));
        assert!(!insert.contains("Int(Some(77))"));
    }

    #[tokio::test]
    async fn test_save_maps_duplicate_key_to_constraint() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .append_query_errors([DbErr::Query(RuntimeErr::Internal(
                "duplicate key value violates unique constraint \"posts_pkey\"".to_owned(),
            ))])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let err = repo.save(Post::new(5, 1, "t", "b")).await.unwrap_err();

        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_ok() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        assert!(repo.delete_by_id(999).await.is_ok());
    }

    #[tokio::test]
    async fn test_count_posts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[BTreeMap::from([(
                "num_items",
                Value::BigInt(Some(3)),
            )])]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_ensure_schema_creates_table_if_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        ensure_schema(&db).await.unwrap();

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("CREATE TABLE IF NOT EXISTS"));
    }
}
