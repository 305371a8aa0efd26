//! Board error types.

use thiserror::Error;

/// Errors raised while validating or resolving board content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Post input failed validation.
    #[error("{0}")]
    InvalidPost(String),

    /// Comment input failed validation.
    #[error("{0}")]
    InvalidComment(String),

    /// The referenced post does not exist.
    #[error("Post not found: {0}")]
    PostNotFound(String),
}
