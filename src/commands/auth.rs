//! Auth Commands
//!
//! Session cookie based login, registration and email verification.

use storefront_core::api::AuthApi;
use storefront_core::models::User;
use storefront_core::validation::{LoginForm, OtpForm, RegisterForm};
use storefront_core::ApiResult;

use super::backend;

pub async fn login(form: &LoginForm) -> ApiResult<User> {
    backend().login(form).await
}

pub async fn register(form: &RegisterForm) -> ApiResult<User> {
    backend().register(form).await
}

pub async fn logout() -> ApiResult<()> {
    backend().logout().await
}

/// Restore the session from the cookie, if any
pub async fn authorize() -> ApiResult<User> {
    backend().authorize().await
}

pub async fn verify_email(form: &OtpForm) -> ApiResult<User> {
    backend().verify(form).await
}

pub async fn resend_otp(email: &str) -> ApiResult<()> {
    backend().resend_otp(email).await
}
