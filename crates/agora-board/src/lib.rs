//! Community board for Agora.
//!
//! Posts written by registered users and the comments under them, plus
//! validation of the bodies accepted by `POST /posts` and `POST /comments`.

pub mod author;
pub mod comment;
pub mod error;
pub mod post;

pub use author::Author;
pub use comment::{Comment, CommentDraft, NewComment, MAX_COMMENT_CHARS};
pub use error::BoardError;
pub use post::{NewPost, Post, PostDetail, PostDraft};
