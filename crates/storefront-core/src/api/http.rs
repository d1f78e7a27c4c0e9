//! HTTP Backend
//!
//! `reqwest` implementation of the resource traits. Session cookies are
//! sent with every request; no token is attached manually.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{
    AccountApi, ApiError, ApiResult, AuthApi, CartApi, CartItemUpdate, CartLineInput, CatalogApi,
    NewListing, NewOrder, NewReview,
};
use crate::config::StorefrontConfig;
use crate::filter::{FilterState, QUERY_COMPONENT};
use crate::models::{Cart, Category, Order, Page, Product, Review, User};
use crate::validation::{LoginForm, OtpForm, ProfileForm, RegisterForm};

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn from_config(config: &StorefrontConfig) -> Self {
        Self::new(config.api_base_url.as_str())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("[API] {} {}", method, url);
        with_credentials(self.client.request(method, url))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let body = read_success_body(builder).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// For endpoints that may answer 204 or an empty body
    async fn send_or_default<T: DeserializeOwned + Default>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let body = read_success_body(builder).await?;
        if body.trim().is_empty() {
            return Ok(T::default());
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn send_empty(&self, builder: RequestBuilder) -> ApiResult<()> {
        read_success_body(builder).await.map(|_| ())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send(self.request(Method::GET, path)).await
    }

    async fn post<I: Serialize + ?Sized, O: DeserializeOwned>(&self, path: &str, body: &I) -> ApiResult<O> {
        self.send(self.request(Method::POST, path).json(body)).await
    }
}

async fn read_success_body(builder: RequestBuilder) -> ApiResult<String> {
    let response = builder.send().await?;
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        warn!("[API] request failed with status {}", status.as_u16());
        Err(ApiError::from_status(status.as_u16(), &body))
    }
}

#[cfg(target_arch = "wasm32")]
fn with_credentials(builder: RequestBuilder) -> RequestBuilder {
    builder.fetch_credentials_include()
}

#[cfg(not(target_arch = "wasm32"))]
fn with_credentials(builder: RequestBuilder) -> RequestBuilder {
    builder
}

/// Path segment escaping for slugs and ids
fn segment(value: &str) -> String {
    percent_encoding::utf8_percent_encode(value, QUERY_COMPONENT).to_string()
}

#[derive(Serialize)]
struct EmailArgs<'a> {
    email: &'a str,
}

// ========================
// Catalog
// ========================

#[async_trait(?Send)]
impl CatalogApi for HttpBackend {
    async fn list_products(&self, filter: &FilterState) -> ApiResult<Page<Product>> {
        if filter.has_constraints() {
            let pairs = filter.to_query_pairs();
            self.send(self.request(Method::GET, "/products/filter").query(&pairs)).await
        } else {
            let pairs = [
                ("pageNumber", filter.page.to_string()),
                ("pageSize", filter.page_size.to_string()),
            ];
            self.send(self.request(Method::GET, "/products").query(&pairs)).await
        }
    }

    async fn product_by_slug(&self, slug: &str) -> ApiResult<Product> {
        self.get(&format!("/products/slug/{}", segment(slug))).await
    }

    async fn categories(&self) -> ApiResult<Vec<Category>> {
        self.get("/products/categories").await
    }

    async fn recent_products(&self, user_id: u32) -> ApiResult<Vec<Product>> {
        self.get(&format!("/products/user/{}/recent", user_id)).await
    }

    async fn reviews(&self, slug: &str, page_number: u32, page_size: u32) -> ApiResult<Page<Review>> {
        let pairs = [("pageNumber", page_number), ("pageSize", page_size)];
        let path = format!("/products/slug/{}/reviews", segment(slug));
        self.send(self.request(Method::GET, &path).query(&pairs)).await
    }

    async fn create_review(&self, review: &NewReview) -> ApiResult<Review> {
        self.post("/products/review", review).await
    }

    async fn create_product(&self, listing: &NewListing) -> ApiResult<Product> {
        self.post("/products", listing).await
    }
}

// ========================
// Cart
// ========================

#[async_trait(?Send)]
impl CartApi for HttpBackend {
    async fn get_cart(&self) -> ApiResult<Cart> {
        self.get("/me/cart").await
    }

    async fn add_items(&self, items: &[CartLineInput]) -> ApiResult<Cart> {
        self.post("/me/cart", items).await
    }

    async fn update_item(&self, update: &CartItemUpdate) -> ApiResult<Cart> {
        self.send(self.request(Method::PATCH, "/me/cart").json(update)).await
    }

    async fn remove_item(&self, cart_item_id: &str) -> ApiResult<Cart> {
        let path = format!("/me/cart/{}", segment(cart_item_id));
        self.send(self.request(Method::DELETE, &path)).await
    }

    async fn clear_cart(&self) -> ApiResult<Cart> {
        self.send_or_default(self.request(Method::DELETE, "/me/cart")).await
    }
}

// ========================
// Auth
// ========================

#[async_trait(?Send)]
impl AuthApi for HttpBackend {
    async fn login(&self, form: &LoginForm) -> ApiResult<User> {
        self.post("/auth/login", form).await
    }

    async fn register(&self, form: &RegisterForm) -> ApiResult<User> {
        self.post("/auth/register", form).await
    }

    async fn logout(&self) -> ApiResult<()> {
        self.send_empty(self.request(Method::POST, "/auth/logout")).await
    }

    async fn authorize(&self) -> ApiResult<User> {
        self.get("/auth/authorize").await
    }

    async fn verify(&self, form: &OtpForm) -> ApiResult<User> {
        self.post("/auth/verify", form).await
    }

    async fn resend_otp(&self, email: &str) -> ApiResult<()> {
        let builder = self
            .request(Method::POST, "/auth/verify/resendOtp")
            .json(&EmailArgs { email });
        self.send_empty(builder).await
    }
}

// ========================
// Account & Orders
// ========================

#[async_trait(?Send)]
impl AccountApi for HttpBackend {
    async fn get_user(&self, id: u32) -> ApiResult<User> {
        self.get(&format!("/users/{}", id)).await
    }

    async fn update_user(&self, id: u32, form: &ProfileForm) -> ApiResult<User> {
        let builder = self.request(Method::PUT, &format!("/users/{}", id)).json(form);
        self.send(builder).await
    }

    async fn place_order(&self, order: &NewOrder) -> ApiResult<Order> {
        self.post("/orders", order).await
    }

    async fn list_orders(&self) -> ApiResult<Vec<Order>> {
        self.get("/orders").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let backend = HttpBackend::new("http://localhost:8080/api/");
        assert_eq!(backend.base_url(), "http://localhost:8080/api");
        assert_eq!(backend.url("/me/cart"), "http://localhost:8080/api/me/cart");
    }

    #[test]
    fn test_segment_escapes_slashes() {
        assert_eq!(segment("red-shoes"), "red-shoes");
        assert_eq!(segment("a/b"), "a%2Fb");
    }

    #[test]
    fn test_cart_item_update_omits_seen_when_unset() {
        let update = CartItemUpdate {
            cart_item_id: "ci-1".to_string(),
            quantity: 2,
            seen: None,
        };
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"cartItemId":"ci-1","quantity":2}"#
        );
    }
}
