//! String identifiers, one newtype per entity.
//!
//! A `PostId` cannot be passed where a `ProductId` is expected, yet each
//! id serializes as the bare string the storage layer holds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares a `String` newtype with conversions, `Display` and a
/// transparent serde form. The string literal becomes the type's docs.
macro_rules! string_id {
    ($(#[doc = $doc:literal] $name:ident;)+) => {$(
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// A fresh id that no other call in this process returns.
            pub fn generate() -> Self {
                Self(next_unique())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    )+};
}

string_id! {
    /// Catalog product; also the key of a cart line.
    ProductId;
    /// Order handed to the payment widget.
    OrderId;
    /// Board author.
    UserId;
    /// Board post.
    PostId;
    /// Comment on a post.
    CommentId;
}

impl OrderId {
    /// Build the `ORDER_<unix millis>` id handed to the payment widget.
    pub fn from_millis(millis: i64) -> Self {
        Self(format!("ORDER_{}", millis))
    }
}

/// `<nanos since epoch>-<sequence>` in hex. The sequence keeps ids
/// distinct when the clock does not advance between calls.
fn next_unique() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static SEQUENCE: AtomicU64 = AtomicU64::new(0);

    let nanos: u128 = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);

    format!("{nanos:x}-{sequence:x}")
}
