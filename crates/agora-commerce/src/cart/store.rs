//! Cart store: the single owner of a session's cart.
//!
//! The store wraps the pure reducer in [`Cart::apply`] with two side
//! effects that run after the next state is computed: write-through to a
//! [`CartPersistence`] backend and notification of subscribers.

use std::fmt;

use agora_cache::{Cache, KvStore};

use crate::cart::{AddOptions, Cart, CartAction, CartSnapshot, LineItem, NewLineItem};
use crate::error::CommerceError;
use crate::ids::ProductId;

/// Storage key the cart snapshot is persisted under.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// Durable storage for the cart snapshot.
pub trait CartPersistence {
    /// Load the stored snapshot, if any.
    fn load(&self) -> Result<Option<CartSnapshot>, CommerceError>;

    /// Replace the stored snapshot.
    fn save(&self, snapshot: &CartSnapshot) -> Result<(), CommerceError>;
}

/// No-op persistence for carts that live only in memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ephemeral;

impl CartPersistence for Ephemeral {
    fn load(&self) -> Result<Option<CartSnapshot>, CommerceError> {
        Ok(None)
    }

    fn save(&self, _snapshot: &CartSnapshot) -> Result<(), CommerceError> {
        Ok(())
    }
}

/// Persists the snapshot as JSON in a [`Cache`].
#[derive(Debug, Clone)]
pub struct CachePersistence<S> {
    cache: Cache<S>,
    key: String,
}

impl<S: KvStore> CachePersistence<S> {
    /// Persist under [`CART_STORAGE_KEY`].
    pub fn new(cache: Cache<S>) -> Self {
        Self::with_key(cache, CART_STORAGE_KEY)
    }

    /// Persist under a custom key.
    pub fn with_key(cache: Cache<S>, key: impl Into<String>) -> Self {
        Self {
            cache,
            key: key.into(),
        }
    }

    /// The backing cache.
    pub fn cache(&self) -> &Cache<S> {
        &self.cache
    }

    /// The storage key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<S: KvStore> CartPersistence for CachePersistence<S> {
    fn load(&self) -> Result<Option<CartSnapshot>, CommerceError> {
        Ok(self.cache.get(&self.key)?)
    }

    fn save(&self, snapshot: &CartSnapshot) -> Result<(), CommerceError> {
        Ok(self.cache.set(&self.key, snapshot)?)
    }
}

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Cart)>;

/// State container for one session's cart.
///
/// Mutators never fail. If the persistence write fails the in-memory
/// transition still stands and the failure is logged.
///
/// # Example
///
/// ```rust,ignore
/// let mut store = CartStore::open(CachePersistence::new(Cache::open_dir(".agora")?));
/// store.add(NewLineItem::new("p1", "Mug", 12_000), AddOptions::default());
/// assert_eq!(store.cart().total_price(), 12_000);
/// ```
pub struct CartStore<P = Ephemeral> {
    cart: Cart,
    persistence: P,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl CartStore<Ephemeral> {
    /// An empty store that is never persisted.
    pub fn in_memory() -> Self {
        Self::open(Ephemeral)
    }
}

impl<P: CartPersistence> CartStore<P> {
    /// Open a store, rehydrating from `persistence`.
    ///
    /// A missing snapshot yields an empty cart. So does an unreadable
    /// one, after logging a warning.
    pub fn open(persistence: P) -> Self {
        let cart = match persistence.load() {
            Ok(Some(snapshot)) => {
                let stored = (snapshot.total_items, snapshot.total_price);
                let cart = Cart::from(snapshot);
                if stored != (cart.total_items(), cart.total_price()) {
                    tracing::warn!(
                        stored_items = stored.0,
                        stored_price = stored.1,
                        total_items = cart.total_items(),
                        total_price = cart.total_price(),
                        "stored cart totals disagree with items, using recomputed totals"
                    );
                }
                cart
            }
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to rehydrate cart, starting empty");
                Cart::new()
            }
        };

        Self {
            cart,
            persistence,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current cart state.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    /// Sum of quantities.
    pub fn total_items(&self) -> u64 {
        self.cart.total_items()
    }

    /// Sum of `price * quantity`.
    pub fn total_price(&self) -> u64 {
        self.cart.total_price()
    }

    /// The persistence backend.
    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Apply an action, persist the result, and notify subscribers.
    pub fn dispatch(&mut self, action: CartAction) -> &Cart {
        self.cart = self.cart.apply(&action);

        tracing::debug!(
            action = action.name(),
            lines = self.cart.unique_item_count(),
            total_items = self.cart.total_items(),
            total_price = self.cart.total_price(),
            "cart updated"
        );

        if let Err(e) = self.persistence.save(&self.cart.snapshot()) {
            tracing::warn!(action = action.name(), error = %e, "failed to persist cart");
        }

        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.cart);
        }

        &self.cart
    }

    /// Add a product; merges with an existing line of the same id.
    pub fn add(&mut self, item: NewLineItem, options: AddOptions) -> &Cart {
        self.dispatch(CartAction::Add { item, options })
    }

    /// Remove a line. Missing ids are ignored.
    pub fn remove_item(&mut self, id: &ProductId) -> &Cart {
        self.dispatch(CartAction::Remove { id: id.clone() })
    }

    /// Set a line's quantity. Zero or negative removes the line.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) -> &Cart {
        self.dispatch(CartAction::UpdateQuantity {
            id: id.clone(),
            quantity,
        })
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) -> &Cart {
        self.dispatch(CartAction::Clear)
    }

    /// Register a callback invoked with the new cart after every dispatch.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Cart) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len_before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() < len_before
    }
}

impl<P: fmt::Debug> fmt::Debug for CartStore<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("persistence", &self.persistence)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
