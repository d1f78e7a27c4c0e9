//! Cart Page
//!
//! Item rows with a quantity stepper. Every button goes through the cart
//! synchronizer; the rendered cart is always the last one the server sent.

use leptos::prelude::*;
use leptos::task::spawn_local;
use storefront_core::cart::{MutationKey, MutationKind};
use storefront_core::models::{format_price, CartItem};

use crate::components::{DeleteConfirmButton, ErrorBanner};
use crate::context::use_app_context;
use crate::routes::Route;
use crate::store::{cart_sync, use_app_store, AppStateStoreFields};

#[component]
fn CartRow(item: CartItem) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let id = StoredValue::new(item.id.clone());
    let quantity = item.quantity;
    let max = item.product.stock.max(quantity);
    let slug = item.product.slug.clone();
    let href = format!("/products/{}", slug);
    let line_total = format_price(item.product.price * i64::from(quantity));
    let remove_key = StoredValue::new(MutationKey::new(MutationKind::Remove, item.id.clone()));

    let busy = Signal::derive(move || store.cart().with(|s| s.is_loading()));
    let removing = move || remove_key.with_value(|key| store.cart().with(|s| s.is_in_flight(key)));

    let set_quantity = move |next: u32| {
        let item_id = id.get_value();
        spawn_local(async move {
            cart_sync(store).update_cart(&item_id, next).await;
        });
    };

    view! {
        <div class=move || if removing() { "cart-row removing" } else { "cart-row" }>
            {item.product.thumbnail().map(|src| view! { <img class="cart-thumb" src=src.to_string() alt="" /> })}
            <div class="cart-row-info">
                <a href=href on:click=move |ev| {
                    ev.prevent_default();
                    ctx.navigate(Route::Product { slug: slug.clone() });
                }>{item.product.name.clone()}</a>
                {(!item.seen).then(|| view! { <span class="new-badge">"New"</span> })}
                <span class="unit-price">{format_price(item.product.price)}</span>
            </div>
            <div class="stepper">
                <button
                    disabled=move || { busy.get() || quantity <= 1 }
                    on:click=move |_| set_quantity(quantity.saturating_sub(1))
                >
                    "−"
                </button>
                <span class="quantity">{quantity}</span>
                <button
                    disabled=move || { busy.get() || quantity >= max }
                    on:click=move |_| set_quantity(quantity + 1)
                >
                    "+"
                </button>
            </div>
            <span class="line-total">{line_total}</span>
            <DeleteConfirmButton
                button_class="delete-btn"
                disabled=busy
                on_confirm=Callback::new(move |_: ()| {
                    let item_id = id.get_value();
                    spawn_local(async move {
                        cart_sync(store).remove_from_cart(&item_id).await;
                    });
                })
            />
        </div>
    }
}

#[component]
pub fn CartPage() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    // mark unseen items once per visit, as soon as any are known
    let marked = StoredValue::new(false);
    Effect::new(move |_| {
        let unseen = store.cart().with(|s| s.cart.not_seen_count);
        if marked.get_value() || unseen == 0 {
            return;
        }
        marked.set_value(true);
        spawn_local(async move {
            let outcomes = cart_sync(store).mark_all_as_seen().await;
            log::debug!("[CART] marked {} items seen", outcomes.iter().filter(|o| o.is_applied()).count());
        });
    });

    let items = move || store.cart().with(|s| s.cart.items.clone());
    let is_empty = move || store.cart().with(|s| s.cart.is_empty());
    let busy = Signal::derive(move || store.cart().with(|s| s.is_loading()));
    let error = Signal::derive(move || store.cart().with(|s| s.error.clone()));

    view! {
        <section class="cart-page">
            <h1>"Your cart"</h1>
            <ErrorBanner message=error on_dismiss=Callback::new(move |_: ()| cart_sync(store).dismiss_error()) />
            <Show
                when=move || !is_empty()
                fallback=move || view! {
                    <p class="empty-state">"Your cart is empty."</p>
                    <button on:click=move |_| ctx.navigate(Route::catalog())>"Continue shopping"</button>
                }
            >
                <div class="cart-rows">
                    <For
                        each=items
                        key=|item| (item.id.clone(), item.quantity, item.seen)
                        children=|item| view! { <CartRow item=item /> }
                    />
                </div>
                <div class="cart-summary">
                    <p>
                        {move || format!("{} items", store.cart().with(|s| s.cart.total_items))}
                        <strong class="cart-total">
                            {move || format_price(store.cart().with(|s| s.cart.total_price))}
                        </strong>
                    </p>
                    <DeleteConfirmButton
                        button_class="secondary"
                        label="Clear cart"
                        disabled=busy
                        on_confirm=Callback::new(move |_: ()| {
                            spawn_local(async move {
                                cart_sync(store).clear_cart().await;
                            });
                        })
                    />
                    <button
                        class="checkout-btn"
                        disabled=move || busy.get()
                        on:click=move |_| ctx.navigate(Route::Checkout)
                    >
                        "Checkout"
                    </button>
                </div>
            </Show>
        </section>
    }
}
