//! `GET /posts`, `POST /posts` and `GET /posts/{id}`.

use agora_board::{BoardError, NewPost};
use agora_commerce::PostId;
use http::Response;
use serde_json::json;

use crate::error::ApiError;
use crate::handlers::{parse_body, success};
use crate::repository::Repository;

pub fn list<R: Repository>(repo: &R) -> Result<Response<Vec<u8>>, ApiError> {
    success(json!({ "posts": repo.list_posts()? }))
}

pub fn create<R: Repository>(repo: &R, body: &[u8]) -> Result<Response<Vec<u8>>, ApiError> {
    let draft = parse_body::<NewPost>(body)?.validate()?;
    let post = repo.insert_post(draft)?;
    tracing::info!(post_id = %post.id, author_id = %post.author_id, "post created");

    success(json!({ "post": post }))
}

pub fn get<R: Repository>(repo: &R, id: &PostId) -> Result<Response<Vec<u8>>, ApiError> {
    let detail = repo
        .find_post(id)?
        .ok_or_else(|| BoardError::PostNotFound(id.to_string()))?;

    success(json!({ "post": detail }))
}
