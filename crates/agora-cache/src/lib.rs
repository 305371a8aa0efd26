//! Type-safe Key-Value persistence layer for Agora.
//!
//! Provides a simple, ergonomic API for keeping client-local state in a
//! key-value store with automatic JSON serialization. Two backends ship
//! with the crate: [`MemoryStore`] for tests and ephemeral sessions, and
//! [`FileStore`] for state that must survive a restart.
//!
//! # Example
//!
//! ```rust,ignore
//! use agora_cache::Cache;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct CartSnapshot {
//!     items: Vec<LineItem>,
//! }
//!
//! let cache = Cache::open_dir(".agora")?;
//!
//! // Store a value
//! cache.set("cart-storage", &snapshot)?;
//!
//! // Retrieve a value
//! let snapshot: Option<CartSnapshot> = cache.get("cart-storage")?;
//!
//! // Delete a value
//! cache.delete("cart-storage")?;
//! ```

mod error;
mod kv;

pub use error::CacheError;
pub use kv::{Cache, FileStore, KvStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}
