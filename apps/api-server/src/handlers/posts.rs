//! Post and comment handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use croft_core::service::PostDraft;
use croft_shared::dto::{CommentRequest, PostRequest};

use crate::middleware::error::AppResult;
use crate::middleware::identity::{Identity, OptionalIdentity};
use crate::state::AppState;

/// Identity used when a post is created without a username header.
const ANONYMOUS: &str = "Anonymous";

fn draft(req: PostRequest) -> PostDraft {
    PostDraft {
        title: req.title,
        content: req.content,
        images: req.images,
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub author: Option<String>,
}

/// GET /api/posts - all posts newest first, optionally filtered by author.
pub async fn list(state: web::Data<AppState>, query: web::Query<ListQuery>) -> AppResult<HttpResponse> {
    let posts = match &query.author {
        Some(author) => state.posts.list_by_author(author).await?,
        None => state.posts.list_all().await?,
    };
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state.posts.get_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/posts - identity headers are optional here; an absent username
/// falls back to the anonymous identity.
pub async fn create(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let (username, avatar) = match identity.0 {
        Some(id) => (id.username, id.avatar),
        None => (ANONYMOUS.to_string(), None),
    };

    let post = state
        .posts
        .create(draft(body.into_inner()), username, avatar)
        .await?;
    Ok(HttpResponse::Created().json(post))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .update(path.into_inner(), draft(body.into_inner()), &identity.username)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(path.into_inner(), &identity.username)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/posts/{id}/like
pub async fn like(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state.posts.like(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/posts/{id}/dislike
pub async fn dislike(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state.posts.dislike(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/posts/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    identity: Identity,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .add_comment(path.into_inner(), body.into_inner().text, identity.username)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// PUT /api/posts/{post_id}/comments/{comment_id}
pub async fn edit_comment(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
    identity: Identity,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let post = state
        .posts
        .edit_comment(post_id, comment_id, body.into_inner().text, &identity.username)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/posts/{post_id}/comments/{comment_id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let post = state
        .posts
        .delete_comment(post_id, comment_id, &identity.username)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}
