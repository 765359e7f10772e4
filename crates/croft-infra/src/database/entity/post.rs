//! Post entity for SeaORM.
//!
//! Images and comments live in JSONB columns, so one row is the whole
//! aggregate and a row write is a full-aggregate replace.

use sea_orm::entity::prelude::*;
use sea_orm::{FromJsonQueryResult, Set};
use serde::{Deserialize, Serialize};

use croft_core::domain::{Comment, Post};

/// Image references, stored as a JSONB array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ImageList(pub Vec<String>);

/// Embedded comments, stored as a JSONB array in append order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct CommentList(pub Vec<Comment>);

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub images: ImageList,
    pub author: String,
    pub author_image: String,
    pub timestamp: DateTimeWithTimeZone,
    pub likes: i32,
    pub dislikes: i32,
    #[sea_orm(column_type = "JsonBinary")]
    pub comments: CommentList,
    pub edited: bool,
    pub edited_at: Option<DateTimeWithTimeZone>,
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to the domain aggregate.
impl From<Model> for Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            images: model.images.0,
            author: model.author,
            author_image: model.author_image,
            timestamp: model.timestamp.into(),
            likes: model.likes,
            dislikes: model.dislikes,
            comments: model.comments.0,
            edited: model.edited,
            edited_at: model.edited_at.map(Into::into),
            version: model.version,
        }
    }
}

/// Conversion from the domain aggregate to a SeaORM ActiveModel.
impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Set(post.id),
            title: Set(post.title),
            content: Set(post.content),
            images: Set(ImageList(post.images)),
            author: Set(post.author),
            author_image: Set(post.author_image),
            timestamp: Set(post.timestamp.into()),
            likes: Set(post.likes),
            dislikes: Set(post.dislikes),
            comments: Set(CommentList(post.comments)),
            edited: Set(post.edited),
            edited_at: Set(post.edited_at.map(Into::into)),
            version: Set(post.version),
        }
    }
}
