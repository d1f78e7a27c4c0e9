//! Catalog Page
//!
//! Filters come from the URL; every change of the applied filters refetches
//! the listing. Responses to superseded requests are dropped.

use leptos::prelude::*;
use leptos::task::spawn_local;
use storefront_core::filter::FilterState;
use storefront_core::models::{Page, Product};

use crate::commands;
use crate::components::{CategoryFilter, Pager, ProductGrid};
use crate::context::use_app_context;
use crate::routes::Route;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn CatalogPage(#[prop(into)] query: Signal<String>) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let (page_size, window) = ctx
        .config
        .with_value(|c| (c.catalog_page_size, c.pagination_window));

    let (page, set_page) = signal(Page::<Product>::default());
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let request_seq = StoredValue::new(0u64);

    // URL -> applied filters
    Effect::new(move |_| {
        let query = query.get();
        let mut filter = FilterState::from_query_string(&query);
        if !query.contains("pageSize=") {
            filter.page_size = page_size;
        }
        if store.applied_filter().with_untracked(|applied| *applied != filter) {
            store.applied_filter().set(filter);
        }
    });

    // applied filters -> listing
    Effect::new(move |_| {
        let filter = store.applied_filter().get();
        let seq = request_seq.get_value() + 1;
        request_seq.set_value(seq);
        set_loading.set(true);
        spawn_local(async move {
            let result = commands::list_products(&filter).await;
            if request_seq.get_value() != seq {
                log::debug!("[CATALOG] dropping response #{}", seq);
                return;
            }
            set_loading.set(false);
            match result {
                Ok(loaded) => {
                    log::info!("[CATALOG] {} of {} products", loaded.items.len(), loaded.total_items);
                    set_error.set(None);
                    set_page.set(loaded);
                }
                Err(err) => {
                    log::warn!("[CATALOG] listing failed: {}", err);
                    ctx.error(err.user_message());
                    set_error.set(Some(err.user_message()));
                }
            }
        });
    });

    let products = Signal::derive(move || page.with(|p| p.items.clone()));
    let current = Signal::derive(move || store.applied_filter().with(|f| f.page));
    let total_pages = Signal::derive(move || page.with(|p| p.total_pages));

    let select_page = Callback::new(move |number: u32| {
        let filter = FilterState {
            page: number,
            ..store.applied_filter().get_untracked()
        };
        ctx.navigate(Route::Catalog {
            query: filter.to_query_string(),
        });
    });

    view! {
        <div class="catalog-layout">
            <CategoryFilter />
            <section class="catalog-results">
                {move || {
                    let search = store.applied_filter().with(|f| f.search.clone());
                    (!search.is_empty()).then(|| view! { <h2>"Results for “" {search} "”"</h2> })
                }}
                <Show when=move || loading.get()>
                    <div class="loading">"Loading..."</div>
                </Show>
                {move || error.get().map(|message| view! { <div class="error-banner">{message}</div> })}
                <ProductGrid products=products />
                <Pager current=current total_pages=total_pages width=window on_select=select_page />
            </section>
        </div>
    }
}
