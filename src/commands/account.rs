//! Account Commands
//!
//! Profile and order history.

use storefront_core::api::{AccountApi, NewOrder};
use storefront_core::models::{Order, User};
use storefront_core::validation::ProfileForm;
use storefront_core::ApiResult;

use super::backend;

pub async fn get_user(id: u32) -> ApiResult<User> {
    backend().get_user(id).await
}

pub async fn update_user(id: u32, form: &ProfileForm) -> ApiResult<User> {
    backend().update_user(id, form).await
}

pub async fn place_order(order: &NewOrder) -> ApiResult<Order> {
    backend().place_order(order).await
}

pub async fn list_orders() -> ApiResult<Vec<Order>> {
    backend().list_orders().await
}
