//! Shopping cart module.
//!
//! Contains the cart aggregate, its reducer, and the persisted store
//! that owns a session's cart.

mod cart;
mod item;
mod store;

pub use cart::{Cart, CartAction, CartSnapshot};
pub use item::{AddOptions, LineItem, NewLineItem};
pub use store::{
    CachePersistence, CartPersistence, CartStore, Ephemeral, SubscriptionId, CART_STORAGE_KEY,
};
