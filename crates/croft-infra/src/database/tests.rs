#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use croft_core::domain::Post;
    use croft_core::error::RepoError;
    use croft_core::ports::{BaseRepository, PostRepository};

    use crate::database::entity::post::{CommentList, ImageList, Model};
    use crate::database::postgres_repo::PostgresPostRepository;

    fn model(id: Uuid, author: &str) -> Model {
        Model {
            id,
            title: "Test Post".to_owned(),
            content: "Content".to_owned(),
            images: ImageList(vec!["/a.png".to_owned()]),
            author: author.to_owned(),
            author_image: "/default-profile.png".to_owned(),
            timestamp: chrono::Utc::now().into(),
            likes: 0,
            dislikes: 0,
            comments: CommentList(vec![]),
            edited: false,
            edited_at: None,
            version: 1,
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let post_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model(post_id, "alice")]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        assert!(result.is_some());
        let post = result.unwrap();
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, post_id);
        assert_eq!(post.images, vec!["/a.png".to_owned()]);
        assert!(post.comments.is_empty());
    }

    #[tokio::test]
    async fn test_find_all_newest_first_maps_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![
                model(Uuid::new_v4(), "alice"),
                model(Uuid::new_v4(), "bob"),
            ]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let posts = repo.find_all_newest_first().await.unwrap();
        assert_eq!(posts.len(), 2);
    }

    #[tokio::test]
    async fn test_update_reports_conflict_when_no_row_matched() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let post = Post::new("t".into(), "c".into(), vec![], "alice".into(), None);

        let err = repo.update(post).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict));
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let err = repo.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }
}
