//! Account Pages
//!
//! Profile editing and order history.

use leptos::prelude::*;
use leptos::task::spawn_local;
use storefront_core::models::{format_price, Address, Order};
use storefront_core::validation::{validate_address, ProfileForm};
use storefront_core::FieldErrors;

use crate::commands;
use crate::components::{AddressFields, FieldError};
use crate::context::use_app_context;
use crate::store::{store_set_user, use_app_store, AppStateStoreFields};

#[component]
pub fn AccountPage() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (first_name, set_first_name) = signal(String::new());
    let (last_name, set_last_name) = signal(String::new());
    let (phone, set_phone) = signal(String::new());
    let (address, set_address) = signal(Address::default());
    let (errors, set_errors) = signal(FieldErrors::new());
    let (saving, set_saving) = signal(false);

    let user_id = move || store.user().with(|u| u.as_ref().map(|u| u.id));

    // Fill the form from the freshest copy of the profile
    Effect::new(move |_| {
        let Some(id) = user_id() else { return };
        spawn_local(async move {
            match commands::get_user(id).await {
                Ok(user) => {
                    set_first_name.set(user.first_name.clone());
                    set_last_name.set(user.last_name.clone());
                    set_phone.set(user.phone.clone().unwrap_or_default());
                    set_address.set(user.address.clone().unwrap_or_default());
                }
                Err(err) => ctx.error(err.user_message()),
            }
        });
    });

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(id) = store.user().with_untracked(|u| u.as_ref().map(|u| u.id)) else {
            return;
        };
        let phone = phone.get_untracked();
        let address = address.get_untracked();
        let has_address = address != Address::default();
        let form = ProfileForm {
            first_name: first_name.get_untracked().trim().to_string(),
            last_name: last_name.get_untracked().trim().to_string(),
            phone: (!phone.trim().is_empty()).then(|| phone.trim().to_string()),
            address: has_address.then_some(address),
        };
        let mut invalid = form.validate();
        if let Some(address) = &form.address {
            invalid.merge(validate_address(address));
        }
        if !invalid.is_empty() {
            set_errors.set(invalid);
            return;
        }
        set_errors.set(FieldErrors::new());
        set_saving.set(true);
        spawn_local(async move {
            match commands::update_user(id, &form).await {
                Ok(user) => {
                    store_set_user(&store, Some(user));
                    ctx.success("Profile saved");
                }
                Err(err) => {
                    set_errors.set(err.field_errors());
                    ctx.error(err.user_message());
                }
            }
            set_saving.set(false);
        });
    };

    view! {
        <section class="account-page">
            <h1>"Your profile"</h1>
            <p class="account-email">{move || store.user().with(|u| u.as_ref().map(|u| u.email.clone()))}</p>
            <form class="profile-form" on:submit=save>
                <label class="form-field">
                    "First name"
                    <input
                        type="text"
                        prop:value=move || first_name.get()
                        on:input=move |ev| set_first_name.set(event_target_value(&ev))
                    />
                </label>
                <FieldError errors=errors field="firstName" />
                <label class="form-field">
                    "Last name"
                    <input
                        type="text"
                        prop:value=move || last_name.get()
                        on:input=move |ev| set_last_name.set(event_target_value(&ev))
                    />
                </label>
                <FieldError errors=errors field="lastName" />
                <label class="form-field">
                    "Phone"
                    <input
                        type="tel"
                        prop:value=move || phone.get()
                        on:input=move |ev| set_phone.set(event_target_value(&ev))
                    />
                </label>
                <FieldError errors=errors field="phone" />
                <h3>"Default shipping address"</h3>
                <AddressFields address=address set_address=set_address errors=errors />
                <button type="submit" disabled=move || saving.get()>"Save"</button>
            </form>
        </section>
    }
}

#[component]
fn OrderCard(order: Order) -> impl IntoView {
    view! {
        <article class="order-card">
            <header>
                <span class="order-id">{format!("#{}", order.id)}</span>
                <span class="order-date">{order.created_at.clone()}</span>
                <span class="order-status">{order.status.clone()}</span>
            </header>
            <ul>
                {order
                    .items
                    .iter()
                    .map(|line| {
                        view! {
                            <li>
                                {format!("{} × {}", line.quantity, line.product_name)}
                                <span>{format_price(line.unit_price * i64::from(line.quantity))}</span>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
            <p class="order-total">"Total " <strong>{format_price(order.total_price)}</strong></p>
        </article>
    }
}

#[component]
pub fn OrdersPage() -> impl IntoView {
    let (orders, set_orders) = signal::<Option<Vec<Order>>>(None);
    let (error, set_error) = signal::<Option<String>>(None);

    Effect::new(move |_| {
        spawn_local(async move {
            match commands::list_orders().await {
                Ok(loaded) => set_orders.set(Some(loaded)),
                Err(err) => {
                    log::warn!("[ORDERS] {}", err);
                    set_error.set(Some(err.user_message()));
                }
            }
        });
    });

    view! {
        <section class="orders-page">
            <h1>"Your orders"</h1>
            {move || error.get().map(|message| view! { <div class="error-banner">{message}</div> })}
            {move || match orders.get() {
                None => view! { <div class="loading">"Loading..."</div> }.into_any(),
                Some(list) if list.is_empty() => view! { <p class="empty-state">"No orders yet."</p> }.into_any(),
                Some(list) => list
                    .into_iter()
                    .map(|order| view! { <OrderCard order=order /> })
                    .collect_view()
                    .into_any(),
            }}
        </section>
    }
}
