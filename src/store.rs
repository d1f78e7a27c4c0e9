//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. Cart and
//! category state only change through their reducers.

use leptos::prelude::*;
use reactive_stores::Store;
use storefront_core::api::HttpBackend;
use storefront_core::cart::{self, CartAction, CartSink, CartState, CartSynchronizer};
use storefront_core::category_tree::{self, FilterAction};
use storefront_core::filter::FilterState;
use storefront_core::models::{Category, User};

use crate::commands;

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Cart mirror and request bookkeeping
    pub cart: CartState,
    /// Category tree with the pending (not yet applied) checkbox state
    pub categories: Vec<Category>,
    /// Filters the product listing was last fetched with
    pub applied_filter: FilterState,
    /// Signed-in user, if any
    pub user: Option<User>,
    /// Session restore finished (user may still be None)
    pub session_checked: bool,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Cart
// ========================

/// Routes synchronizer actions into the store's cart field
#[derive(Clone, Copy)]
pub struct StoreCartSink(pub AppStore);

impl CartSink for StoreCartSink {
    fn snapshot(&self) -> CartState {
        self.0.cart().get_untracked()
    }

    fn dispatch(&self, action: CartAction) {
        self.0
            .cart()
            .update(|state| *state = cart::reduce(std::mem::take(state), action));
    }
}

pub type StoreCartSync = CartSynchronizer<HttpBackend, StoreCartSink>;

/// Cart synchronizer bound to the store
pub fn cart_sync(store: AppStore) -> StoreCartSync {
    CartSynchronizer::new(commands::backend(), StoreCartSink(store))
}

// ========================
// Store Helper Functions
// ========================

/// Apply a category tree action
pub fn store_dispatch_filter(store: &AppStore, action: FilterAction) {
    store
        .categories()
        .update(|tree| *tree = category_tree::reduce(tree, action));
}

/// Record the signed-in user (None on logout)
pub fn store_set_user(store: &AppStore, user: Option<User>) {
    store.user().set(user);
    store.session_checked().set(true);
}

/// Forget everything tied to the session
pub fn store_sign_out(store: &AppStore) {
    store_set_user(store, None);
    StoreCartSink(*store).dispatch(CartAction::Reset);
}
