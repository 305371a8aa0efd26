//! `GET /products` and `POST /products`.

use agora_commerce::catalog::{NewProduct, ProductQuery};
use http::Response;
use serde_json::json;

use crate::error::ApiError;
use crate::handlers::{parse_body, success};
use crate::repository::Repository;

pub fn list<R: Repository>(repo: &R, query: Option<&str>) -> Result<Response<Vec<u8>>, ApiError> {
    let query = ProductQuery::from_query_str(query.unwrap_or(""))?;
    let products = repo.list_products(&query)?;
    tracing::debug!(count = products.len(), category = ?query.category, "listed products");

    success(json!({ "products": products }))
}

pub fn create<R: Repository>(repo: &R, body: &[u8]) -> Result<Response<Vec<u8>>, ApiError> {
    let draft = parse_body::<NewProduct>(body)?.validate()?;
    let product = repo.insert_product(draft)?;
    tracing::info!(product_id = %product.id, "product created");

    success(json!({
        "product": product,
        "message": "Product created successfully.",
    }))
}
