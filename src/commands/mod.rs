//! Backend Command Wrappers
//!
//! Frontend bindings to the REST backend, organized by domain.
//! All calls go through one shared [`HttpBackend`].

mod account;
mod auth;
mod catalog;

use std::cell::OnceCell;

use storefront_core::api::HttpBackend;
use storefront_core::StorefrontConfig;

thread_local! {
    static BACKEND: OnceCell<HttpBackend> = const { OnceCell::new() };
}

/// Configure the shared backend; only the first call takes effect
pub fn init(config: &StorefrontConfig) {
    BACKEND.with(|cell| {
        if cell.set(HttpBackend::from_config(config)).is_err() {
            log::warn!("[API] backend already initialised");
        }
    });
}

/// Shared backend handle (cheap to clone)
pub fn backend() -> HttpBackend {
    BACKEND.with(|cell| {
        cell.get_or_init(|| HttpBackend::from_config(&StorefrontConfig::default()))
            .clone()
    })
}

// Re-export all public items
pub use account::*;
pub use auth::*;
pub use catalog::*;
