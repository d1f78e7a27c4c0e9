//! Product Grid Component
//!
//! Cards for a page of products, each with an add-to-cart button.

use leptos::prelude::*;
use leptos::task::spawn_local;
use storefront_core::cart::{MutationKey, MutationKind, MutationOutcome};
use storefront_core::models::{format_price, Product};

use crate::context::{use_app_context, ToastKind};
use crate::routes::Route;
use crate::store::{cart_sync, use_app_store, AppStateStoreFields};

/// Add-to-cart bound to the cart synchronizer.
/// Disabled while any cart request is in flight or once the product is in the cart.
#[component]
pub fn AddToCartButton(product_id: String, in_stock: bool) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let key = StoredValue::new(MutationKey::new(MutationKind::Add, product_id.clone()));
    let id = StoredValue::new(product_id);

    let in_cart = move || id.with_value(|id| store.cart().with(|s| s.cart.contains_product(id)));
    let pending = move || key.with_value(|key| store.cart().with(|s| s.is_in_flight(key)));
    let can_add = move || id.with_value(|id| store.cart().with(|s| s.can_add(id)));

    let add = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        if store.user().get_untracked().is_none() {
            ctx.navigate(Route::Login);
            return;
        }
        let product_id = id.get_value();
        spawn_local(async move {
            match cart_sync(store).add_to_cart(&product_id).await {
                MutationOutcome::Applied => ctx.success("Added to cart"),
                MutationOutcome::Skipped => ctx.toast(ToastKind::Info, "Already in your cart"),
                MutationOutcome::Joined | MutationOutcome::Failed(_) => {}
            }
        });
    };

    view! {
        <button
            class="add-to-cart-btn"
            disabled=move || !in_stock || !can_add()
            on:click=add
        >
            {move || {
                if !in_stock {
                    "Out of stock"
                } else if in_cart() {
                    "In cart"
                } else if pending() {
                    "Adding..."
                } else {
                    "Add to cart"
                }
            }}
        </button>
    }
}

#[component]
pub fn ProductCard(product: Product) -> impl IntoView {
    let ctx = use_app_context();

    let slug = product.slug.clone();
    let thumbnail = product.thumbnail().map(str::to_string);
    let rating = product
        .average_rating
        .map(|r| format!("★ {:.1} ({})", r, product.review_count));

    view! {
        <article
            class="product-card"
            on:click=move |_| ctx.navigate(Route::Product { slug: slug.clone() })
        >
            {thumbnail.map(|src| view! { <img class="product-thumb" src=src alt="" loading="lazy" /> })}
            <h4 class="product-name">{product.name.clone()}</h4>
            <p class="product-price">{format_price(product.price)}</p>
            {rating.map(|text| view! { <p class="product-rating">{text}</p> })}
            <AddToCartButton product_id=product.id.clone() in_stock=product.in_stock() />
        </article>
    }
}

#[component]
pub fn ProductGrid(#[prop(into)] products: Signal<Vec<Product>>) -> impl IntoView {
    view! {
        <div class="product-grid">
            <For
                each=move || products.get()
                key=|product| product.id.clone()
                children=move |product| view! { <ProductCard product=product /> }
            />
        </div>
        <Show when=move || products.with(|p| p.is_empty())>
            <p class="empty-state">"No products match these filters."</p>
        </Show>
    }
}
