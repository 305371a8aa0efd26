//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in e-commerce operations.
///
/// Cart mutations never produce these; they come from the boundary
/// around the cart (catalog input, checkout handshake, persistence).
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product input failed validation.
    #[error("Invalid product: {0}")]
    InvalidProduct(String),

    /// Catalog query string failed validation.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Checkout was requested with nothing in the cart.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// A payment redirect was missing fields or malformed.
    #[error("Invalid payment callback: {0}")]
    InvalidPaymentCallback(String),

    /// Cache error.
    #[error("Cache error: {0}")]
    CacheError(#[from] agora_cache::CacheError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
