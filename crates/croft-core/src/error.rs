//! Domain-level error types.

use thiserror::Error;

/// Service errors - outcomes of post/comment operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("post or comment not found")]
    NotFound,

    #[error("caller is not the author")]
    Forbidden,

    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Write conflict: stored version differs")]
    Conflict,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
