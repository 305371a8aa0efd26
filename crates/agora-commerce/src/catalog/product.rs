//! Product types and input validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::NewLineItem;
use crate::error::CommerceError;
use crate::ids::ProductId;

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Full description.
    pub description: Option<String>,
    /// Unit price in won.
    pub price: u64,
    /// Image URL.
    pub image_url: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    /// Units in stock.
    pub stock_quantity: u32,
    /// Whether the product is listed.
    pub is_active: bool,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Check if the product is available for purchase.
    pub fn is_available(&self) -> bool {
        self.is_active && self.stock_quantity > 0
    }

    /// The cart candidate for this product.
    pub fn to_line_item(&self) -> NewLineItem {
        NewLineItem {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image: self.image_url.clone(),
            description: self.description.clone(),
        }
    }
}

/// A price given either as a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    /// `12000`
    Number(u64),
    /// `"12000"`
    Text(String),
}

impl PriceInput {
    fn parse(&self) -> Result<u64, CommerceError> {
        match self {
            PriceInput::Number(n) => Ok(*n),
            PriceInput::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| CommerceError::InvalidProduct(format!("price is not a number: {s:?}"))),
        }
    }
}

/// Body of `POST /products`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<PriceInput>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub stock_quantity: Option<u32>,
}

/// A validated product ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub price: u64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub stock_quantity: u32,
}

impl NewProduct {
    /// Validate: name and a non-zero price are required.
    pub fn validate(self) -> Result<ProductDraft, CommerceError> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let (Some(name), Some(price)) = (name, self.price) else {
            return Err(CommerceError::InvalidProduct(
                "name and price are required".to_string(),
            ));
        };

        let price = price.parse()?;
        if price == 0 {
            return Err(CommerceError::InvalidProduct(
                "name and price are required".to_string(),
            ));
        }

        Ok(ProductDraft {
            name,
            price,
            description: self.description,
            image_url: self.image_url,
            category: self.category.filter(|c| !c.is_empty()),
            stock_quantity: self.stock_quantity.unwrap_or(0),
        })
    }
}

impl ProductDraft {
    /// Materialize into a product with the given id and creation time.
    pub fn into_product(self, id: ProductId, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            image_url: self.image_url,
            category: self.category,
            stock_quantity: self.stock_quantity,
            is_active: true,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}
