//! JSON query API for Agora.
//!
//! Handlers for the product catalog and the community board, expressed
//! over plain [`http`] request and response types so any server can host
//! them. Storage sits behind the [`Repository`] trait.
//!
//! Successful responses carry `"success": true` alongside their payload.
//! Failures are `{ "success": false, "error": "..." }` with status
//! 400, 404, 405 or 500.
//!
//! # Example
//!
//! ```rust,ignore
//! use agora_api::{MemoryRepository, Router};
//!
//! let router = Router::new(MemoryRepository::new());
//! let request = http::Request::get("/api/products?category=mugs").body(Vec::new())?;
//! let response = router.handle(&request);
//! assert_eq!(response.status(), 200);
//! ```

pub mod error;
pub mod handlers;
pub mod repository;
pub mod router;

pub use error::{ApiError, RepositoryError};
pub use repository::{MemoryRepository, Repository};
pub use router::Router;
