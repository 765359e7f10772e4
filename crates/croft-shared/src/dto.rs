//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request body for creating or updating a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Request body for adding or editing a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

/// Echo of the identity headers, returned by the user-context endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContextResponse {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_image: Option<String>,
}
