//! Request routing.
//!
//! | Path          | Methods    |
//! |---------------|------------|
//! | `/products`   | GET, POST  |
//! | `/posts`      | GET, POST  |
//! | `/posts/{id}` | GET        |
//! | `/comments`   | POST       |
//!
//! An `/api` prefix and a trailing slash are accepted.

use agora_commerce::PostId;
use http::{Method, Request, Response};

use crate::error::ApiError;
use crate::handlers::{comments, posts, products};
use crate::repository::Repository;

/// Dispatches requests to handlers over a shared repository.
#[derive(Debug)]
pub struct Router<R> {
    repo: R,
}

impl<R: Repository> Router<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Handle one request. Every failure becomes an error envelope.
    pub fn handle(&self, request: &Request<Vec<u8>>) -> Response<Vec<u8>> {
        tracing::debug!(method = %request.method(), path = request.uri().path(), "request");

        match self.route(request) {
            Ok(response) => response,
            Err(e) => e.into_response(),
        }
    }

    fn route(&self, request: &Request<Vec<u8>>) -> Result<Response<Vec<u8>>, ApiError> {
        let method = request.method();
        let path = request.uri().path();
        let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.first() == Some(&"api") {
            segments.remove(0);
        }

        match segments.as_slice() {
            ["products"] => {
                if *method == Method::GET {
                    products::list(&self.repo, request.uri().query())
                } else if *method == Method::POST {
                    products::create(&self.repo, request.body())
                } else {
                    Err(not_allowed(method, "GET, POST"))
                }
            }
            ["posts"] => {
                if *method == Method::GET {
                    posts::list(&self.repo)
                } else if *method == Method::POST {
                    posts::create(&self.repo, request.body())
                } else {
                    Err(not_allowed(method, "GET, POST"))
                }
            }
            ["posts", id] => {
                if *method == Method::GET {
                    posts::get(&self.repo, &PostId::new(*id))
                } else {
                    Err(not_allowed(method, "GET"))
                }
            }
            ["comments"] => {
                if *method == Method::POST {
                    comments::create(&self.repo, request.body())
                } else {
                    Err(not_allowed(method, "POST"))
                }
            }
            _ => Err(ApiError::NotFound(format!("No route for {path}"))),
        }
    }
}

fn not_allowed(method: &Method, allowed: &'static str) -> ApiError {
    ApiError::MethodNotAllowed {
        method: method.clone(),
        allowed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;
    use agora_board::Author;
    use agora_commerce::catalog::Product;
    use agora_commerce::ProductId;
    use chrono::{TimeZone, Utc};
    use http::StatusCode;
    use serde_json::{json, Value};

    fn router() -> Router<MemoryRepository> {
        let repo = MemoryRepository::new();
        repo.insert_author(Author::new("u1", "u1@example.com")).unwrap();
        Router::new(repo)
    }

    fn get(router: &Router<MemoryRepository>, uri: &str) -> (StatusCode, Value) {
        send(router, Method::GET, uri, Vec::new())
    }

    fn post(router: &Router<MemoryRepository>, uri: &str, body: Value) -> (StatusCode, Value) {
        send(router, Method::POST, uri, body.to_string().into_bytes())
    }

    fn send(
        router: &Router<MemoryRepository>,
        method: Method,
        uri: &str,
        body: Vec<u8>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri).body(body).unwrap();
        let response = router.handle(&request);
        assert_eq!(response.headers()["content-type"], "application/json");
        (response.status(), serde_json::from_slice(response.body()).unwrap())
    }

    fn seed(router: &Router<MemoryRepository>, id: &str, category: &str, day: u32, active: bool) {
        router
            .repository()
            .seed_product(Product {
                id: ProductId::new(id),
                name: id.to_string(),
                description: None,
                price: 1000,
                image_url: None,
                category: Some(category.to_string()),
                stock_quantity: 5,
                is_active: active,
                created_at: Some(Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0).unwrap()),
                updated_at: None,
            })
            .unwrap();
    }

    fn product_ids(body: &Value) -> Vec<&str> {
        body["products"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_list_products_filters_and_pages() {
        let router = router();
        seed(&router, "a", "mugs", 1, true);
        seed(&router, "b", "pens", 2, true);
        seed(&router, "c", "mugs", 3, true);
        seed(&router, "d", "mugs", 4, false);

        let (status, body) = get(&router, "/api/products");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(product_ids(&body), vec!["c", "b", "a"]);

        let (_, body) = get(&router, "/products?category=mugs");
        assert_eq!(product_ids(&body), vec!["c", "a"]);

        let (_, body) = get(&router, "/products?limit=1&offset=1");
        assert_eq!(product_ids(&body), vec!["b"]);
    }

    #[test]
    fn test_bad_paging_is_rejected() {
        let (status, body) = get(&router(), "/products?limit=many");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[test]
    fn test_create_product() {
        let router = router();
        let (status, body) = post(&router, "/products", json!({"name": "Mug", "price": "12000"}));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["product"]["price"], 12000);
        assert_eq!(body["product"]["stock_quantity"], 0);
        assert!(body["message"].is_string());

        let (_, listed) = get(&router, "/products");
        assert_eq!(listed["products"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_create_product_validation() {
        let (status, body) = post(&router(), "/products", json!({"name": "Mug"}));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"success": false, "error": "Invalid product: name and price are required"}));
    }

    #[test]
    fn test_malformed_json_is_bad_request() {
        let (status, body) = send(&router(), Method::POST, "/posts", b"{not json".to_vec());
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[test]
    fn test_post_and_comment_flow() {
        let router = router();
        let (status, body) = post(
            &router,
            "/posts",
            json!({"title": "Hello", "content": "First", "author_id": "u1"}),
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["post"]["users"]["email"], "u1@example.com");
        let post_id = body["post"]["id"].as_str().unwrap().to_string();

        let (status, body) = post(
            &router,
            "/comments",
            json!({"content": "  nice  ", "post_id": post_id, "author_id": "u1"}),
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["comment"]["content"], "nice");

        let (status, body) = get(&router, &format!("/posts/{post_id}"));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["post"]["title"], "Hello");
        assert_eq!(body["post"]["comments"][0]["content"], "nice");

        let (_, body) = get(&router, "/posts/");
        assert_eq!(body["posts"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_post_is_not_found() {
        let router = router();
        let (status, _) = get(&router, "/posts/nope");
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = post(
            &router,
            "/comments",
            json!({"content": "hi", "post_id": "nope", "author_id": "u1"}),
        );
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[test]
    fn test_comment_length_is_checked_before_lookup() {
        let (status, _) = post(
            &router(),
            "/comments",
            json!({"content": "x".repeat(2001), "post_id": "nope", "author_id": "u1"}),
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unknown_route_and_wrong_method() {
        let router = router();
        let (status, body) = get(&router, "/orders");
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);

        let (status, _) = send(&router, Method::DELETE, "/products", Vec::new());
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        let (status, _) = get(&router, "/comments");
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_api_prefix_must_be_a_whole_segment() {
        let router = router();
        for uri in ["/apiproducts", "/apiposts", "/api-products"] {
            let (status, body) = get(&router, uri);
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["success"], false);
        }

        let (status, _) = get(&router, "/api/products/");
        assert_eq!(status, StatusCode::OK);
        let (status, _) = get(&router, "/api/api/products");
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
