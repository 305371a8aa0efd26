//! API error types and their HTTP mapping.

use agora_board::BoardError;
use agora_commerce::CommerceError;
use http::{header, Response, StatusCode};
use thiserror::Error;

/// Failures reported by a [`Repository`](crate::Repository) backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The backend rejected or failed the operation.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Another handler panicked while holding the store.
    #[error("Repository lock poisoned")]
    Poisoned,
}

/// Errors returned by API handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid input: malformed JSON, failed validation, bad query string.
    #[error("{0}")]
    BadRequest(String),

    /// Unknown route or missing resource.
    #[error("{0}")]
    NotFound(String),

    /// Route exists but not for this method.
    #[error("Method {method} not allowed")]
    MethodNotAllowed {
        method: http::Method,
        allowed: &'static str,
    },

    /// Backend failure.
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// Response could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Repository(_) | ApiError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Render as `{ "success": false, "error": "..." }`.
    pub fn into_response(self) -> Response<Vec<u8>> {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = serde_json::json!({
            "success": false,
            "error": self.to_string(),
        });

        let mut builder = Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, "application/json");
        if let ApiError::MethodNotAllowed { allowed, .. } = &self {
            builder = builder.header(header::ALLOW, *allowed);
        }

        builder
            .body(body.to_string().into_bytes())
            .unwrap_or_else(|_| fallback_response())
    }
}

/// Bare 500 used when a response cannot be built at all.
pub(crate) fn fallback_response() -> Response<Vec<u8>> {
    let mut response = Response::new(br#"{"success":false,"error":"internal error"}"#.to_vec());
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}

impl From<CommerceError> for ApiError {
    fn from(e: CommerceError) -> Self {
        match e {
            CommerceError::InvalidProduct(_)
            | CommerceError::InvalidQuery(_)
            | CommerceError::InvalidPaymentCallback(_)
            | CommerceError::EmptyCart => ApiError::BadRequest(e.to_string()),
            CommerceError::CacheError(_) | CommerceError::SerializationError(_) => {
                ApiError::Repository(RepositoryError::Backend(e.to_string()))
            }
        }
    }
}

impl From<BoardError> for ApiError {
    fn from(e: BoardError) -> Self {
        match e {
            BoardError::InvalidPost(_) | BoardError::InvalidComment(_) => {
                ApiError::BadRequest(e.to_string())
            }
            BoardError::PostNotFound(_) => ApiError::NotFound(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Serialization(e.to_string())
    }
}
