//! Request handlers, one module per resource.

pub mod comments;
pub mod posts;
pub mod products;

use http::{header, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Decode a JSON request body.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Malformed JSON body: {e}")))
}

/// A 200 response whose body is `payload` plus `"success": true`.
pub(crate) fn success(mut payload: serde_json::Value) -> Result<Response<Vec<u8>>, ApiError> {
    if let Some(fields) = payload.as_object_mut() {
        fields.insert("success".to_string(), serde_json::Value::Bool(true));
    }

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(serde_json::to_vec(&payload)?)
        .map_err(|e| ApiError::Serialization(e.to_string()))
}
