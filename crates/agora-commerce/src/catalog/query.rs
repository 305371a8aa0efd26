//! Product listing query.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::catalog::Product;
use crate::error::CommerceError;

/// Filters for `GET /products`.
///
/// Only active products are listed, newest first. `offset` applies only
/// together with `limit`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    /// Restrict to one category.
    pub category: Option<String>,
    /// Page size.
    pub limit: Option<usize>,
    /// Rows to skip before the page starts (default 0).
    pub offset: Option<usize>,
}

impl ProductQuery {
    /// Parse from a raw query string such as `category=mugs&limit=10`.
    pub fn from_query_str(query: &str) -> Result<Self, CommerceError> {
        let mut parsed = ProductQuery::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "category" if !value.is_empty() => parsed.category = Some(value.into_owned()),
                "limit" => parsed.limit = Some(parse_count("limit", &value)?),
                "offset" => parsed.offset = Some(parse_count("offset", &value)?),
                _ => {}
            }
        }
        Ok(parsed)
    }

    /// Filter by category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Page through results.
    pub fn with_page(mut self, limit: usize, offset: usize) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    /// Check whether a product passes the filters.
    pub fn matches(&self, product: &Product) -> bool {
        product.is_active
            && self
                .category
                .as_ref()
                .map_or(true, |c| product.category.as_ref() == Some(c))
    }

    /// Run the query over a product set.
    pub fn apply<'a>(&self, products: impl IntoIterator<Item = &'a Product>) -> Vec<Product> {
        let mut listed: Vec<&Product> = products.into_iter().filter(|p| self.matches(p)).collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let listed = listed.into_iter().cloned();
        match self.limit {
            Some(limit) => listed.skip(self.offset.unwrap_or(0)).take(limit).collect(),
            None => listed.collect(),
        }
    }
}

fn parse_count(field: &str, value: &str) -> Result<usize, CommerceError> {
    value
        .trim()
        .parse()
        .map_err(|_| CommerceError::InvalidQuery(format!("{field} must be a non-negative integer")))
}
