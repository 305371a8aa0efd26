//! Cart aggregate and its reducer.
//!
//! Every transition builds the next item list and then recomputes both
//! totals from it. Totals are never patched incrementally.

use serde::{Deserialize, Serialize};

use crate::cart::{AddOptions, LineItem, NewLineItem};
use crate::ids::ProductId;

/// A state transition on the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartAction {
    /// Add a product, merging with an existing line of the same id.
    Add {
        item: NewLineItem,
        #[serde(default)]
        options: AddOptions,
    },
    /// Remove the line with this id, if any.
    Remove { id: ProductId },
    /// Set a line's quantity; zero or negative removes it.
    UpdateQuantity { id: ProductId, quantity: i64 },
    /// Drop every line.
    Clear,
}

impl CartAction {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            CartAction::Add { .. } => "add",
            CartAction::Remove { .. } => "remove",
            CartAction::UpdateQuantity { .. } => "update_quantity",
            CartAction::Clear => "clear",
        }
    }
}

/// The persisted form of a cart.
///
/// Field names match the stored JSON: `{ items, totalItems, totalPrice }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    /// Line items in insertion order.
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Stored item count.
    #[serde(default)]
    pub total_items: u64,
    /// Stored total price.
    #[serde(default)]
    pub total_price: u64,
}

/// A shopping cart.
///
/// Fields are private so the totals can only come from [`Cart::from_items`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<LineItem>,
    total_items: u64,
    total_price: u64,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from line items, recomputing both totals.
    ///
    /// Lines with quantity zero are dropped and repeated ids are folded
    /// into the first occurrence, so the result always satisfies the
    /// cart invariants even when fed a hand-edited snapshot.
    pub fn from_items(items: Vec<LineItem>) -> Self {
        let mut normalized: Vec<LineItem> = Vec::with_capacity(items.len());
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            match normalized.iter_mut().find(|i| i.id == item.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity)
                }
                None => normalized.push(item),
            }
        }

        let total_items = sum_quantities(&normalized);
        let total_price = sum_prices(&normalized);
        Self {
            items: normalized,
            total_items,
            total_price,
        }
    }

    /// Apply an action and return the next cart. `self` is untouched.
    pub fn apply(&self, action: &CartAction) -> Cart {
        match action {
            CartAction::Add { item, options } => self.with_added(item, options.quantity()),
            CartAction::Remove { id } => self.without(id),
            CartAction::UpdateQuantity { id, quantity } => self.with_quantity(id, *quantity),
            CartAction::Clear => Cart::new(),
        }
    }

    fn with_added(&self, candidate: &NewLineItem, quantity: u32) -> Cart {
        let mut items = self.items.clone();
        match items.iter_mut().find(|i| i.id == candidate.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
            None => items.push(candidate.clone().into_line_item(quantity)),
        }
        Cart::from_items(items)
    }

    fn without(&self, id: &ProductId) -> Cart {
        let items = self
            .items
            .iter()
            .filter(|i| &i.id != id)
            .cloned()
            .collect();
        Cart::from_items(items)
    }

    fn with_quantity(&self, id: &ProductId, quantity: i64) -> Cart {
        if quantity <= 0 {
            return self.without(id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let items = self
            .items
            .iter()
            .map(|i| {
                if &i.id == id {
                    LineItem {
                        quantity,
                        ..i.clone()
                    }
                } else {
                    i.clone()
                }
            })
            .collect();
        Cart::from_items(items)
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Get a line by product id.
    pub fn get_item(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Maintained item count (sum of quantities).
    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Maintained total price (sum of `price * quantity`).
    pub fn total_price(&self) -> u64 {
        self.total_price
    }

    /// Item count recomputed from the lines.
    pub fn recompute_total_items(&self) -> u64 {
        sum_quantities(&self.items)
    }

    /// Total price recomputed from the lines.
    pub fn recompute_total_price(&self) -> u64 {
        sum_prices(&self.items)
    }

    /// Number of distinct lines.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The persisted form of this cart.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            total_items: self.total_items,
            total_price: self.total_price,
        }
    }
}

impl From<CartSnapshot> for Cart {
    /// Rehydrate from storage. Stored totals are ignored and recomputed.
    fn from(snapshot: CartSnapshot) -> Self {
        Cart::from_items(snapshot.items)
    }
}

fn sum_quantities(items: &[LineItem]) -> u64 {
    items
        .iter()
        .fold(0u64, |sum, i| sum.saturating_add(u64::from(i.quantity)))
}

fn sum_prices(items: &[LineItem]) -> u64 {
    items
        .iter()
        .fold(0u64, |sum, i| sum.saturating_add(i.subtotal()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn add(id: &str, price: u64, quantity: u32) -> CartAction {
        CartAction::Add {
            item: NewLineItem::new(id, format!("Product {}", id), price),
            options: AddOptions::from_count(quantity).unwrap(),
        }
    }

    fn update(id: &str, quantity: i64) -> CartAction {
        CartAction::UpdateQuantity {
            id: ProductId::new(id),
            quantity,
        }
    }

    fn remove(id: &str) -> CartAction {
        CartAction::Remove {
            id: ProductId::new(id),
        }
    }

    fn quantities(cart: &Cart) -> Vec<(&str, u32)> {
        cart.items()
            .iter()
            .map(|i| (i.id.as_str(), i.quantity))
            .collect()
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), 0);
    }

    #[test]
    fn test_add_defaults_to_one() {
        let cart = Cart::new().apply(&CartAction::Add {
            item: NewLineItem::new("p1", "Mug", 1200),
            options: AddOptions::default(),
        });

        assert_eq!(quantities(&cart), vec![("p1", 1)]);
        assert_eq!(cart.total_price(), 1200);
    }

    #[test]
    fn test_add_same_item_merges_quantity() {
        let cart = Cart::new().apply(&add("p1", 100, 2)).apply(&add("p1", 100, 3));

        assert_eq!(quantities(&cart), vec![("p1", 5)]);
        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.total_price(), 500);
    }

    #[test]
    fn test_merge_keeps_position_and_existing_fields() {
        let cart = Cart::new()
            .apply(&add("a", 100, 1))
            .apply(&add("b", 200, 1))
            .apply(&CartAction::Add {
                item: NewLineItem::new("a", "Renamed", 999),
                options: AddOptions::default(),
            });

        assert_eq!(quantities(&cart), vec![("a", 2), ("b", 1)]);
        let a = cart.get_item(&ProductId::new("a")).unwrap();
        assert_eq!(a.name, "Product a");
        assert_eq!(a.price, 100);
    }

    #[test]
    fn test_update_sets_absolute_quantity() {
        let cart = Cart::new().apply(&add("p1", 100, 2)).apply(&update("p1", 7));
        assert_eq!(quantities(&cart), vec![("p1", 7)]);
        assert_eq!(cart.total_price(), 700);
    }

    #[test]
    fn test_zero_or_negative_update_removes() {
        let start = Cart::new().apply(&add("p1", 100, 2)).apply(&add("p2", 50, 1));
        let removed = start.apply(&remove("p1"));

        assert_eq!(start.apply(&update("p1", 0)), removed);
        assert_eq!(start.apply(&update("p1", -5)), removed);
        assert!(removed.get_item(&ProductId::new("p1")).is_none());
    }

    #[test]
    fn test_missing_key_is_noop() {
        let start = Cart::new().apply(&add("p1", 100, 2));

        assert_eq!(start.apply(&remove("missing")), start);
        assert_eq!(start.apply(&update("missing", 3)), start);
    }

    #[test]
    fn test_clear_resets_fully() {
        let cart = Cart::new()
            .apply(&add("p1", 100, 2))
            .apply(&add("p2", 300, 1))
            .apply(&CartAction::Clear);

        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), 0);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let cart = Cart::new()
            .apply(&add("a", 1000, 1))
            .apply(&add("b", 2000, 1))
            .apply(&add("a", 1000, 2));
        assert_eq!(quantities(&cart), vec![("a", 3), ("b", 1)]);
        assert_eq!(cart.total_items(), 4);
        assert_eq!(cart.total_price(), 5000);

        let cart = cart.apply(&update("b", 0));
        assert_eq!(quantities(&cart), vec![("a", 3)]);
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), 3000);

        let cart = cart.apply(&CartAction::Clear);
        assert!(cart.items().is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), 0);
    }

    #[test]
    fn test_apply_leaves_previous_state_untouched() {
        let before = Cart::new().apply(&add("p1", 100, 1));
        let _after = before.apply(&CartAction::Clear);
        assert_eq!(before.total_items(), 1);
    }

    #[test]
    fn test_huge_update_saturates() {
        let cart = Cart::new().apply(&add("p1", 1, 1)).apply(&update("p1", i64::MAX));
        assert_eq!(cart.items()[0].quantity, u32::MAX);
        assert_eq!(cart.total_items(), u64::from(u32::MAX));
    }

    #[test]
    fn test_rehydration_recomputes_and_normalizes() {
        let snapshot: CartSnapshot = serde_json::from_value(serde_json::json!({
            "items": [
                {"id": "a", "name": "A", "price": 100, "quantity": 2},
                {"id": "b", "name": "B", "price": 50, "quantity": 0},
                {"id": "a", "name": "A", "price": 100, "quantity": 1}
            ],
            "totalItems": 999,
            "totalPrice": 1
        }))
        .unwrap();

        let cart = Cart::from(snapshot);
        assert_eq!(quantities(&cart), vec![("a", 3)]);
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), 300);
    }

    #[test]
    fn test_snapshot_wire_format() {
        let cart = Cart::new().apply(&add("p1", 100, 2));
        let json = serde_json::to_value(cart.snapshot()).unwrap();

        assert_eq!(json["totalItems"], 2);
        assert_eq!(json["totalPrice"], 200);
        assert_eq!(json["items"][0]["id"], "p1");
        assert_eq!(serde_json::to_value(&cart).unwrap(), json);
    }

    #[test]
    fn test_action_deserializes_with_default_options() {
        let action: CartAction = serde_json::from_value(serde_json::json!({
            "type": "add",
            "item": {"id": "p1", "name": "Mug", "price": 1000}
        }))
        .unwrap();

        let cart = Cart::new().apply(&action);
        assert_eq!(cart.total_items(), 1);
    }

    fn action_strategy() -> impl Strategy<Value = CartAction> {
        let id = prop::sample::select(vec!["a", "b", "c", "d"]);
        prop_oneof![
            4 => (id.clone(), 0u64..5000, 1u32..10).prop_map(|(id, price, qty)| add(id, price, qty)),
            1 => id.clone().prop_map(remove),
            2 => (id, -3i64..10).prop_map(|(id, qty)| update(id, qty)),
            1 => Just(CartAction::Clear),
        ]
    }

    proptest! {
        #[test]
        fn prop_totals_match_items_after_every_step(
            actions in prop::collection::vec(action_strategy(), 0..40)
        ) {
            let mut cart = Cart::new();
            for action in &actions {
                cart = cart.apply(action);
                prop_assert_eq!(cart.total_items(), cart.recompute_total_items());
                prop_assert_eq!(cart.total_price(), cart.recompute_total_price());
                prop_assert!(cart.items().iter().all(|i| i.quantity >= 1));
            }
        }

        #[test]
        fn prop_ids_stay_unique(
            actions in prop::collection::vec(action_strategy(), 0..40)
        ) {
            let mut cart = Cart::new();
            for action in &actions {
                cart = cart.apply(action);
            }
            let mut ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
            let len = ids.len();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), len);
        }
    }
}
