//! Header Component
//!
//! Brand, search box, cart badge and the account menu.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands;
use crate::context::use_app_context;
use crate::routes::Route;
use crate::store::{store_sign_out, use_app_store, AppStateStoreFields};
use storefront_core::filter::FilterState;

#[component]
pub fn Header() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (search, set_search) = signal(String::new());

    let submit_search = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let filter = FilterState {
            search: search.get_untracked().trim().to_string(),
            ..store.applied_filter().get_untracked().reset_page()
        };
        ctx.navigate(Route::Catalog {
            query: filter.to_query_string(),
        });
    };

    let total_items = move || store.cart().with(|state| state.cart.total_items);
    let not_seen = move || store.cart().with(|state| state.cart.not_seen_count);

    let logout = move |_: web_sys::MouseEvent| {
        spawn_local(async move {
            if let Err(err) = commands::logout().await {
                log::warn!("[AUTH] logout failed: {}", err);
            }
            store_sign_out(&store);
            ctx.navigate(Route::catalog());
        });
    };

    view! {
        <header class="site-header">
            <a class="brand" href="/" on:click=move |ev| {
                ev.prevent_default();
                ctx.navigate(Route::catalog());
            }>"Storefront"</a>

            <form class="header-search" on:submit=submit_search>
                <input
                    type="search"
                    placeholder="Search products..."
                    prop:value=move || search.get()
                    on:input=move |ev| set_search.set(event_target_value(&ev))
                />
            </form>

            <nav class="header-nav">
                <button class="cart-link" on:click=move |_| ctx.navigate(Route::Cart)>
                    "Cart"
                    <span class="cart-badge">{total_items}</span>
                    <Show when=move || { not_seen() > 0 }>
                        <span class="cart-badge unseen" title="New items">{not_seen}</span>
                    </Show>
                </button>

                {move || match store.user().get() {
                    Some(user) => {
                        let is_seller = user.is_seller();
                        view! {
                            <span class="account-menu">
                                <button on:click=move |_| ctx.navigate(Route::Account)>
                                    {user.display_name()}
                                </button>
                                <button on:click=move |_| ctx.navigate(Route::Orders)>"Orders"</button>
                                <Show when=move || is_seller>
                                    <button on:click=move |_| ctx.navigate(Route::Sell)>"Sell"</button>
                                </Show>
                                <button class="logout-btn" on:click=logout>"Log out"</button>
                            </span>
                        }
                        .into_any()
                    }
                    None => view! {
                        <span class="account-menu">
                            <button on:click=move |_| ctx.navigate(Route::Login)>"Log in"</button>
                            <button on:click=move |_| ctx.navigate(Route::Register)>"Register"</button>
                        </span>
                    }
                    .into_any(),
                }}
            </nav>
        </header>
    }
}
