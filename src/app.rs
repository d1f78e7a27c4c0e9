//! Storefront App
//!
//! Root component: provides the store and context, restores the session,
//! then switches pages on the current route.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use storefront_core::category_tree::FilterAction;
use storefront_core::StorefrontConfig;

use crate::commands;
use crate::components::{
    AccountPage, CartPage, CatalogPage, CheckoutPage, ErrorBanner, Header, ListingWizardPage,
    LoginPage, NotFoundPage, OrderPlacedPage, OrdersPage, ProductPage, RegisterPage, ToastHost,
    VerifyPage,
};
use crate::context::AppContext;
use crate::routes::Route;
use crate::store::{cart_sync, store_dispatch_filter, store_set_user, AppState, AppStateStoreFields};

fn current_route() -> Route {
    let Some(location) = web_sys::window().map(|w| w.location()) else {
        return Route::catalog();
    };
    let path = location.pathname().unwrap_or_default();
    let search = location.search().unwrap_or_default();
    Route::from_location(&path, &search)
}

#[component]
pub fn App(config: StorefrontConfig) -> impl IntoView {
    let store = Store::new(AppState::default());
    provide_context(store);

    let route = signal(current_route());
    let ctx = AppContext::new(route, config);
    provide_context(ctx);

    // Back/forward
    let _ = window_event_listener(leptos::ev::popstate, move |_| {
        let route = current_route();
        log::debug!("[NAV] popstate {:?}", route);
        ctx.restore(route);
    });

    // Restore the session, then load the cart for a signed-in user
    Effect::new(move |_| {
        spawn_local(async move {
            match commands::authorize().await {
                Ok(user) => {
                    log::info!("[AUTH] session restored for {}", user.email);
                    store_set_user(&store, Some(user));
                    cart_sync(store).initialize_cart().await;
                }
                Err(err) => {
                    if !err.is_unauthorized() {
                        log::warn!("[AUTH] session check failed: {}", err);
                    }
                    store_set_user(&store, None);
                }
            }
        });
    });

    // Category tree for the filter and the listing wizard
    Effect::new(move |_| {
        spawn_local(async move {
            match commands::list_categories().await {
                Ok(categories) => {
                    log::info!("[APP] loaded {} categories", categories.len());
                    store_dispatch_filter(&store, FilterAction::Replace(categories));
                }
                Err(err) => {
                    log::warn!("[APP] categories failed: {}", err);
                    ctx.error(err.user_message());
                }
            }
        });
    });

    // Guard signed-in pages once the session check has finished
    Effect::new(move |_| {
        let route = ctx.route.get();
        if !route.requires_auth() || !store.session_checked().get() {
            return;
        }
        if store.user().with(|u| u.is_none()) {
            log::info!("[NAV] {} needs a session", route.to_url());
            ctx.navigate(Route::Login);
        } else if route == Route::Sell
            && !store.user().with(|u| u.as_ref().is_some_and(|u| u.is_seller()))
        {
            ctx.error("Only seller accounts can list products");
            ctx.navigate(Route::catalog());
        }
    });

    let cart_error = Signal::derive(move || {
        let on_cart_page = ctx.route.with(|r| *r == Route::Cart);
        (!on_cart_page).then(|| store.cart().with(|s| s.error.clone())).flatten()
    });

    let query = Signal::derive(move || match ctx.route.get() {
        Route::Catalog { query } => query,
        _ => String::new(),
    });
    let slug = Signal::derive(move || match ctx.route.get() {
        Route::Product { slug } => slug,
        _ => String::new(),
    });
    let order_id = Signal::derive(move || match ctx.route.get() {
        Route::OrderPlaced { order_id } => order_id,
        _ => String::new(),
    });
    let email = Signal::derive(move || match ctx.route.get() {
        Route::Verify { email } => email,
        _ => String::new(),
    });

    // re-render only when the page kind changes
    let page = Memo::new(move |_| std::mem::discriminant(&ctx.route.get()));

    view! {
        <Header />
        <ErrorBanner message=cart_error on_dismiss=Callback::new(move |_: ()| cart_sync(store).dismiss_error()) />
        <main class="page">
            {move || {
                let _ = page.get();
                match ctx.route.get_untracked() {
                    Route::Catalog { .. } => view! { <CatalogPage query=query /> }.into_any(),
                    Route::Product { .. } => view! { <ProductPage slug=slug /> }.into_any(),
                    Route::Cart => view! { <CartPage /> }.into_any(),
                    Route::Checkout => view! { <CheckoutPage /> }.into_any(),
                    Route::OrderPlaced { .. } => view! { <OrderPlacedPage order_id=order_id /> }.into_any(),
                    Route::Login => view! { <LoginPage /> }.into_any(),
                    Route::Register => view! { <RegisterPage /> }.into_any(),
                    Route::Verify { .. } => view! { <VerifyPage email=email /> }.into_any(),
                    Route::Account => view! { <AccountPage /> }.into_any(),
                    Route::Orders => view! { <OrdersPage /> }.into_any(),
                    Route::Sell => view! { <ListingWizardPage /> }.into_any(),
                    Route::NotFound => view! { <NotFoundPage /> }.into_any(),
                }
            }}
        </main>
        <ToastHost />
    }
}
