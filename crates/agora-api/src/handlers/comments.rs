//! `POST /comments`.

use agora_board::{BoardError, NewComment};
use http::Response;
use serde_json::json;

use crate::error::ApiError;
use crate::handlers::{parse_body, success};
use crate::repository::Repository;

pub fn create<R: Repository>(repo: &R, body: &[u8]) -> Result<Response<Vec<u8>>, ApiError> {
    let draft = parse_body::<NewComment>(body)?.validate()?;
    if !repo.post_exists(&draft.post_id)? {
        return Err(BoardError::PostNotFound(draft.post_id.to_string()).into());
    }

    let comment = repo.insert_comment(draft)?;
    tracing::info!(comment_id = %comment.id, post_id = %comment.post_id, "comment created");

    success(json!({ "comment": comment }))
}
