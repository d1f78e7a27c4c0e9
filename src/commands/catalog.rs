//! Catalog Commands
//!
//! Products, categories and reviews.

use storefront_core::api::{CatalogApi, NewListing, NewReview};
use storefront_core::filter::FilterState;
use storefront_core::models::{Category, Page, Product, Review};
use storefront_core::ApiResult;

use super::backend;

// ========================
// Products
// ========================

pub async fn list_products(filter: &FilterState) -> ApiResult<Page<Product>> {
    backend().list_products(filter).await
}

pub async fn get_product(slug: &str) -> ApiResult<Product> {
    backend().product_by_slug(slug).await
}

pub async fn list_recent_products(user_id: u32) -> ApiResult<Vec<Product>> {
    backend().recent_products(user_id).await
}

pub async fn create_product(listing: &NewListing) -> ApiResult<Product> {
    backend().create_product(listing).await
}

// ========================
// Categories
// ========================

pub async fn list_categories() -> ApiResult<Vec<Category>> {
    backend().categories().await
}

// ========================
// Reviews
// ========================

pub async fn list_reviews(slug: &str, page_number: u32, page_size: u32) -> ApiResult<Page<Review>> {
    backend().reviews(slug, page_number, page_size).await
}

pub async fn create_review(review: &NewReview) -> ApiResult<Review> {
    backend().create_review(review).await
}
