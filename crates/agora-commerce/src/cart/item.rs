//! Line item types.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::ids::ProductId;

/// One distinct product held in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product identifier; unique within a cart.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price in the smallest currency unit (won).
    pub price: u64,
    /// Quantity held. Never zero inside a [`Cart`](crate::cart::Cart).
    pub quantity: u32,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LineItem {
    /// `price * quantity`, saturating at `u64::MAX`.
    pub fn subtotal(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }
}

/// A product about to be added to the cart: a line item without a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLineItem {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price in the smallest currency unit.
    pub price: u64,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewLineItem {
    /// Create a candidate with no display metadata.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: None,
            description: None,
        }
    }

    /// Attach an image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn into_line_item(self, quantity: u32) -> LineItem {
        LineItem {
            id: self.id,
            name: self.name,
            price: self.price,
            quantity,
            image: self.image,
            description: self.description,
        }
    }
}

/// Options for [`Cart::add`](crate::cart::Cart).
///
/// `quantity` defaults to 1 when unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddOptions {
    /// How many units to add.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<NonZeroU32>,
}

impl AddOptions {
    /// Default quantity when none is given.
    pub const DEFAULT_QUANTITY: u32 = 1;

    /// Options adding `quantity` units.
    pub fn with_quantity(quantity: NonZeroU32) -> Self {
        Self {
            quantity: Some(quantity),
        }
    }

    /// Options from a raw count; `None` for zero.
    pub fn from_count(quantity: u32) -> Option<Self> {
        NonZeroU32::new(quantity).map(Self::with_quantity)
    }

    /// The effective quantity.
    pub fn quantity(&self) -> u32 {
        self.quantity
            .map(NonZeroU32::get)
            .unwrap_or(Self::DEFAULT_QUANTITY)
    }
}
