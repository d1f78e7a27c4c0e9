//! Backend API
//!
//! Abstract interfaces for the REST backend, grouped by resource.
//! [`HttpBackend`] implements all of them over `reqwest`; tests use
//! in-memory implementations.
//!
//! Futures are `?Send`: everything runs on the browser's single thread.

mod error;
mod http;

pub use error::{ApiError, ApiResult, ProblemDetails};
pub use http::HttpBackend;

use async_trait::async_trait;
use serde::Serialize;

use crate::filter::FilterState;
use crate::models::{Address, Cart, Category, Order, Page, Product, Review, User};
use crate::validation::{LoginForm, OtpForm, ProfileForm, RegisterForm};

// ========================
// Request Bodies
// ========================

/// One element of the add-to-cart batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub product_id: String,
    pub quantity: u32,
}

/// PATCH body for `/me/cart`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemUpdate {
    pub cart_item_id: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seen: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub product_id: String,
    pub rating: u8,
    pub comment: String,
}

/// Seller listing submitted by the wizard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub name: String,
    pub description: String,
    pub category_id: u32,
    /// Cents
    pub price: i64,
    pub stock: u32,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineInput {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub items: Vec<OrderLineInput>,
    pub shipping_address: Address,
}

impl NewOrder {
    /// Order lines for everything in the cart
    pub fn from_cart(cart: &Cart, shipping_address: Address) -> Self {
        Self {
            items: cart
                .items
                .iter()
                .map(|item| OrderLineInput {
                    product_id: item.product.id.clone(),
                    quantity: item.quantity,
                })
                .collect(),
            shipping_address,
        }
    }
}

// ========================
// Resource Traits
// ========================

#[async_trait(?Send)]
pub trait CatalogApi {
    /// `GET /products`, or `GET /products/filter` when any filter is set
    async fn list_products(&self, filter: &FilterState) -> ApiResult<Page<Product>>;

    async fn product_by_slug(&self, slug: &str) -> ApiResult<Product>;

    async fn categories(&self) -> ApiResult<Vec<Category>>;

    async fn recent_products(&self, user_id: u32) -> ApiResult<Vec<Product>>;

    async fn reviews(&self, slug: &str, page_number: u32, page_size: u32) -> ApiResult<Page<Review>>;

    async fn create_review(&self, review: &NewReview) -> ApiResult<Review>;

    async fn create_product(&self, listing: &NewListing) -> ApiResult<Product>;
}

/// `/me/cart`. Every mutation answers with the authoritative cart.
#[async_trait(?Send)]
pub trait CartApi {
    async fn get_cart(&self) -> ApiResult<Cart>;

    async fn add_items(&self, items: &[CartLineInput]) -> ApiResult<Cart>;

    async fn update_item(&self, update: &CartItemUpdate) -> ApiResult<Cart>;

    async fn remove_item(&self, cart_item_id: &str) -> ApiResult<Cart>;

    async fn clear_cart(&self) -> ApiResult<Cart>;
}

#[async_trait(?Send)]
pub trait AuthApi {
    async fn login(&self, form: &LoginForm) -> ApiResult<User>;

    async fn register(&self, form: &RegisterForm) -> ApiResult<User>;

    async fn logout(&self) -> ApiResult<()>;

    /// Current session user, from the session cookie
    async fn authorize(&self) -> ApiResult<User>;

    async fn verify(&self, form: &OtpForm) -> ApiResult<User>;

    async fn resend_otp(&self, email: &str) -> ApiResult<()>;
}

#[async_trait(?Send)]
pub trait AccountApi {
    async fn get_user(&self, id: u32) -> ApiResult<User>;

    async fn update_user(&self, id: u32, form: &ProfileForm) -> ApiResult<User>;

    async fn place_order(&self, order: &NewOrder) -> ApiResult<Order>;

    async fn list_orders(&self) -> ApiResult<Vec<Order>>;
}
