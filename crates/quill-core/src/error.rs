//! Error taxonomy for the data layer.

use crate::id::{CommentId, Slug};

/// Errors surfaced by stores and repositories.
///
/// Expected conditions (not-found, forbidden) are explicit variants; only
/// genuinely unexpected storage faults travel through [`Error::Database`]
/// and [`Error::Internal`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No article exists under the given slug.
    #[error("article {0} not found")]
    ArticleNotFound(Slug),

    /// No comment exists under the given id.
    #[error("comment {0} not found")]
    CommentNotFound(CommentId),

    /// No user exists under the given id or username.
    #[error("user {0} not found")]
    UserNotFound(String),

    /// Caller is not the owning author of the article or comment.
    #[error("not the owning author")]
    Forbidden,

    /// Username or email is already registered.
    #[error("username or email already registered")]
    AlreadyExists,

    /// A value object rejected its input at construction.
    #[error("{0}")]
    Validation(String),

    /// Underlying storage fault.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invariant violation or other internal fault.
    #[error("{0}")]
    Internal(String),
}

/// Convenience Result type.
pub type Result<T> = std::result::Result<T, Error>;
