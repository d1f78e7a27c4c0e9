use leptos::prelude::*;

use crate::context::use_app_context;
use crate::routes::Route;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    let ctx = use_app_context();

    view! {
        <section class="not-found">
            <h1>"Page not found"</h1>
            <p>"The page you are looking for does not exist or was removed."</p>
            <button on:click=move |_| ctx.navigate(Route::catalog())>"Back to the shop"</button>
        </section>
    }
}
