//! Checkout
//!
//! Shipping address, order submission and the confirmation page.

use leptos::prelude::*;
use leptos::task::spawn_local;
use storefront_core::api::NewOrder;
use storefront_core::models::{format_price, Address};
use storefront_core::validation::validate_address;
use storefront_core::FieldErrors;

use crate::commands;
use crate::components::FieldError;
use crate::context::use_app_context;
use crate::routes::Route;
use crate::store::{cart_sync, use_app_store, AppStateStoreFields};

/// Address inputs bound to one signal, shared with the profile form
#[component]
pub fn AddressFields(
    address: ReadSignal<Address>,
    set_address: WriteSignal<Address>,
    errors: ReadSignal<FieldErrors>,
) -> impl IntoView {
    view! {
        <fieldset class="address-fields">
            <label>
                "Address"
                <input
                    type="text"
                    prop:value=move || address.with(|a| a.line1.clone())
                    on:input=move |ev| set_address.update(|a| a.line1 = event_target_value(&ev))
                />
            </label>
            <FieldError errors=errors field="line1" />
            <label>
                "Address line 2"
                <input
                    type="text"
                    prop:value=move || address.with(|a| a.line2.clone().unwrap_or_default())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        set_address.update(|a| a.line2 = (!value.trim().is_empty()).then_some(value));
                    }
                />
            </label>
            <label>
                "City"
                <input
                    type="text"
                    prop:value=move || address.with(|a| a.city.clone())
                    on:input=move |ev| set_address.update(|a| a.city = event_target_value(&ev))
                />
            </label>
            <FieldError errors=errors field="city" />
            <label>
                "Postal code"
                <input
                    type="text"
                    prop:value=move || address.with(|a| a.postal_code.clone())
                    on:input=move |ev| set_address.update(|a| a.postal_code = event_target_value(&ev))
                />
            </label>
            <FieldError errors=errors field="postalCode" />
            <label>
                "Country"
                <input
                    type="text"
                    prop:value=move || address.with(|a| a.country.clone())
                    on:input=move |ev| set_address.update(|a| a.country = event_target_value(&ev))
                />
            </label>
            <FieldError errors=errors field="country" />
        </fieldset>
    }
}

#[component]
pub fn CheckoutPage() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let initial = store
        .user()
        .with_untracked(|u| u.as_ref().and_then(|u| u.address.clone()))
        .unwrap_or_default();
    let (address, set_address) = signal(initial);
    let (errors, set_errors) = signal(FieldErrors::new());
    let (placing, set_placing) = signal(false);

    let place_order = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let shipping = address.get_untracked();
        let invalid = validate_address(&shipping);
        if !invalid.is_empty() {
            set_errors.set(invalid);
            return;
        }
        set_errors.set(FieldErrors::new());

        let cart = store.cart().with_untracked(|s| s.cart.clone());
        if cart.is_empty() {
            ctx.error("Your cart is empty");
            return;
        }
        let order = NewOrder::from_cart(&cart, shipping);
        set_placing.set(true);
        spawn_local(async move {
            match commands::place_order(&order).await {
                Ok(placed) => {
                    log::info!("[CHECKOUT] order {} placed", placed.id);
                    // the backend empties the cart; pick up its state
                    cart_sync(store).initialize_cart().await;
                    ctx.navigate(Route::OrderPlaced { order_id: placed.id });
                }
                Err(err) => {
                    log::warn!("[CHECKOUT] order failed: {}", err);
                    set_errors.set(err.field_errors());
                    ctx.error(err.user_message());
                }
            }
            set_placing.set(false);
        });
    };

    view! {
        <section class="checkout-page">
            <h1>"Checkout"</h1>
            <div class="checkout-summary">
                <For
                    each=move || store.cart().with(|s| s.cart.items.clone())
                    key=|item| (item.id.clone(), item.quantity)
                    children=|item| view! {
                        <div class="summary-line">
                            <span>{format!("{} × {}", item.quantity, item.product.name)}</span>
                            <span>{format_price(item.product.price * i64::from(item.quantity))}</span>
                        </div>
                    }
                />
                <p class="summary-total">
                    "Total "
                    <strong>{move || format_price(store.cart().with(|s| s.cart.total_price))}</strong>
                </p>
            </div>
            <form class="checkout-form" on:submit=place_order>
                <h3>"Shipping address"</h3>
                <AddressFields address=address set_address=set_address errors=errors />
                <button
                    type="submit"
                    disabled=move || placing.get() || store.cart().with(|s| s.cart.is_empty() || s.is_loading())
                >
                    {move || if placing.get() { "Placing order..." } else { "Place order" }}
                </button>
            </form>
        </section>
    }
}

#[component]
pub fn OrderPlacedPage(#[prop(into)] order_id: Signal<String>) -> impl IntoView {
    let ctx = use_app_context();

    view! {
        <section class="order-placed">
            <h1>"Thank you!"</h1>
            <p>"Your order " <strong>{move || order_id.get()}</strong> " has been placed."</p>
            <button on:click=move |_| ctx.navigate(Route::Orders)>"View orders"</button>
            <button class="secondary" on:click=move |_| ctx.navigate(Route::catalog())>"Continue shopping"</button>
        </section>
    }
}
