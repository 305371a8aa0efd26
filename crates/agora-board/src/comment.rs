//! Comments and comment input validation.

use agora_commerce::{CommentId, PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::author::Author;
use crate::error::BoardError;

/// Longest comment accepted, in UTF-16 code units after trimming.
pub const MAX_COMMENT_CHARS: usize = 2000;

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub post_id: PostId,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "users", default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
}

/// Body of `POST /comments`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub post_id: Option<PostId>,
    #[serde(default)]
    pub author_id: Option<UserId>,
}

/// A validated comment. `content` is already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub content: String,
    pub post_id: PostId,
    pub author_id: UserId,
}

impl NewComment {
    pub fn validate(self) -> Result<CommentDraft, BoardError> {
        let (Some(content), Some(post_id), Some(author_id)) = (
            self.content.filter(|c| !c.is_empty()),
            self.post_id.filter(|id| !id.is_empty()),
            self.author_id.filter(|id| !id.is_empty()),
        ) else {
            return Err(BoardError::InvalidComment(
                "content, post and author are required".to_string(),
            ));
        };

        let content = content.trim();
        // Measured in UTF-16 code units, as browsers count input length.
        let units = content.encode_utf16().count();
        if units == 0 || units > MAX_COMMENT_CHARS {
            return Err(BoardError::InvalidComment(format!(
                "comments must be between 1 and {MAX_COMMENT_CHARS} characters"
            )));
        }

        Ok(CommentDraft {
            content: content.to_string(),
            post_id,
            author_id,
        })
    }
}

impl CommentDraft {
    pub fn into_comment(self, id: CommentId, now: DateTime<Utc>, author: Option<Author>) -> Comment {
        Comment {
            id,
            content: self.content,
            post_id: self.post_id,
            author_id: self.author_id,
            created_at: now,
            author,
        }
    }
}
