//! Product catalog module.
//!
//! Contains product types, input validation for new products, and the
//! listing query used by `GET /products`.

mod product;
mod query;

pub use product::{NewProduct, PriceInput, Product, ProductDraft};
pub use query::ProductQuery;
