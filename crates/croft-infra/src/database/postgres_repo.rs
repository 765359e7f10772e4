//! PostgreSQL aggregate store.
//!
//! Every write replaces the whole row (the aggregate includes its embedded
//! comments as JSONB). Updates are guarded by the version column: the row
//! only changes when the stored version still matches the one the caller
//! read, so concurrent read-modify-write cycles cannot silently overwrite
//! each other.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use croft_core::domain::Post;
use croft_core::error::RepoError;
use croft_core::ports::{BaseRepository, PostRepository};

use super::entity::post::{self, ActiveModel, Entity as PostEntity};

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn query_err(err: sea_orm::DbErr) -> RepoError {
    RepoError::Query(err.to_string())
}

#[async_trait]
impl BaseRepository<Post, Uuid> for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, mut post: Post) -> Result<Post, RepoError> {
        post.version = 1;
        let active_model: ActiveModel = post.into();

        let model = active_model.insert(&self.db).await.map_err(|e| {
            let err_str = e.to_string();
            if err_str.contains("duplicate") || err_str.contains("unique") {
                RepoError::Constraint("Post already exists".to_string())
            } else {
                RepoError::Query(err_str)
            }
        })?;

        Ok(model.into())
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let expected = post.version;
        let mut next = post;
        next.version = expected + 1;

        let active_model: ActiveModel = next.clone().into();
        let result = PostEntity::update_many()
            .set(active_model)
            .filter(post::Column::Id.eq(next.id))
            .filter(post::Column::Version.eq(expected))
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        // A missed update is either a vanished row or a concurrent writer;
        // the service re-reads and sorts out which.
        if result.rows_affected == 0 {
            return Err(RepoError::Conflict);
        }

        Ok(next)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_all_newest_first(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_desc(post::Column::Timestamp)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_author(&self, author: &str) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Author.eq(author))
            .order_by_desc(post::Column::Timestamp)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
