//! Shop-side domain logic for Agora.
//!
//! - **Cart**: the cart reducer and the persisted, observable cart store
//! - **Catalog**: products, new-product validation, listing queries
//! - **Checkout**: payment widget handshake and completion
//!
//! # Example
//!
//! ```rust,ignore
//! use agora_commerce::prelude::*;
//! use agora_cache::Cache;
//!
//! let cache = Cache::open_dir(".agora")?;
//! let mut store = CartStore::open(CachePersistence::new(cache));
//!
//! store.add(NewLineItem::new("p1", "Ceramic Mug", 12_000), AddOptions::default());
//! store.update_quantity(&ProductId::new("p1"), 3);
//! assert_eq!(store.total_price(), 36_000);
//!
//! let request = PaymentRequest::from_cart(store.cart(), &config)?;
//! ```

pub mod error;
pub mod ids;

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use error::CommerceError;
pub use ids::*;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;

    // Cart
    pub use crate::cart::{
        AddOptions, CachePersistence, Cart, CartAction, CartPersistence, CartSnapshot, CartStore,
        LineItem, NewLineItem, CART_STORAGE_KEY,
    };

    // Catalog
    pub use crate::catalog::{NewProduct, Product, ProductQuery};

    // Checkout
    pub use crate::checkout::{
        complete_checkout, CheckoutConfig, CheckoutReceipt, CheckoutStatus, PaymentErrorCode,
        PaymentFailure, PaymentOutcome, PaymentRequest, PaymentSuccess,
    };
}
