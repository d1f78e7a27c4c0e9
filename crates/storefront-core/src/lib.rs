//! Storefront Core
//!
//! Platform-neutral state logic shared by the storefront UI:
//! - models: Entities mirrored from the REST backend
//! - category_tree: Category filter tree reconciler
//! - filter: Filter state and query string encoding
//! - pagination: Page link windowing
//! - cart: Cart mirror reducer and synchronizer
//! - wizard: Seller listing wizard
//! - validation: Form field validation
//! - api: REST backend traits and the HTTP implementation
//! - config: Runtime configuration

pub mod api;
pub mod cart;
pub mod category_tree;
pub mod config;
pub mod filter;
pub mod models;
pub mod pagination;
pub mod validation;
pub mod wizard;

pub use api::{ApiError, ApiResult, ProblemDetails};
pub use config::StorefrontConfig;
pub use validation::FieldErrors;
