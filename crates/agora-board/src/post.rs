//! Posts and post input validation.

use agora_commerce::{PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::author::Author;
use crate::comment::Comment;
use crate::error::BoardError;

/// A board post.
///
/// The joined author is carried under `users` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "users", default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
}

/// A post together with its comments, newest comment first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub comments: Vec<Comment>,
}

impl PostDetail {
    pub fn new(post: Post, mut comments: Vec<Comment>) -> Self {
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self { post, comments }
    }
}

/// Body of `POST /posts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author_id: Option<UserId>,
}

/// A validated post ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub author_id: UserId,
}

impl NewPost {
    /// Title, content and author are all required and non-blank.
    pub fn validate(self) -> Result<PostDraft, BoardError> {
        let present = |s: Option<String>| s.filter(|s| !s.trim().is_empty());

        match (
            present(self.title),
            present(self.content),
            self.author_id.filter(|id| !id.is_empty()),
        ) {
            (Some(title), Some(content), Some(author_id)) => Ok(PostDraft {
                title,
                content,
                author_id,
            }),
            _ => Err(BoardError::InvalidPost(
                "title, content and author are required".to_string(),
            )),
        }
    }
}

impl PostDraft {
    pub fn into_post(self, id: PostId, now: DateTime<Utc>, author: Option<Author>) -> Post {
        Post {
            id,
            title: self.title,
            content: self.content,
            author_id: self.author_id,
            created_at: now,
            author,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::NewComment;
    use chrono::{Duration, TimeZone};

    fn new_post(json: serde_json::Value) -> NewPost {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_validate_post() {
        let draft = new_post(serde_json::json!({
            "title": "Hello",
            "content": "First post",
            "author_id": "u1"
        }))
        .validate()
        .unwrap();
        assert_eq!(draft.author_id.as_str(), "u1");
    }

    #[test]
    fn test_validate_post_requires_all_fields() {
        for body in [
            serde_json::json!({"content": "c", "author_id": "u1"}),
            serde_json::json!({"title": "t", "content": " ", "author_id": "u1"}),
            serde_json::json!({"title": "t", "content": "c", "author_id": ""}),
            serde_json::json!({}),
        ] {
            assert!(matches!(
                new_post(body).validate(),
                Err(BoardError::InvalidPost(_))
            ));
        }
    }

    #[test]
    fn test_post_serializes_author_as_users() {
        let post = PostDraft {
            title: "t".to_string(),
            content: "c".to_string(),
            author_id: UserId::new("u1"),
        }
        .into_post(
            PostId::new("p1"),
            Utc::now(),
            Some(Author::new("u1", "u1@example.com")),
        );

        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["users"]["email"], "u1@example.com");
        assert!(json.get("author").is_none());
    }

    #[test]
    fn test_detail_orders_comments_newest_first() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let post = PostDraft {
            title: "t".to_string(),
            content: "c".to_string(),
            author_id: UserId::new("u1"),
        }
        .into_post(PostId::new("p1"), t0, None);

        let comment = |id: &str, minutes: i64| {
            NewComment {
                content: Some(format!("comment {id}")),
                post_id: Some(PostId::new("p1")),
                author_id: Some(UserId::new("u2")),
            }
            .validate()
            .unwrap()
            .into_comment(id.into(), t0 + Duration::minutes(minutes), None)
        };

        let detail = PostDetail::new(post, vec![comment("c1", 1), comment("c2", 5), comment("c3", 3)]);
        let order: Vec<&str> = detail.comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["c2", "c3", "c1"]);

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["id"], "p1");
        assert_eq!(json["comments"].as_array().unwrap().len(), 3);
    }
}
