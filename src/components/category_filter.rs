//! Category Filter Sidebar
//!
//! Checkbox tree over the store's category reducer plus price and sort
//! inputs. Nothing is fetched until Apply; the applied filters travel in
//! the URL.

use leptos::prelude::*;
use storefront_core::category_tree::{
    derive_category_ids, flatten_tree, is_selectable, selection_state, FilterAction, SelectionState,
};
use storefront_core::filter::{FilterState, SortKey};
use storefront_core::models::{format_price, parse_price};
use storefront_core::FieldErrors;

use crate::components::FieldError;
use crate::context::use_app_context;
use crate::routes::Route;
use crate::store::{store_dispatch_filter, use_app_store, AppStateStoreFields};

/// One checkbox row; subcategories are indented
#[component]
fn CategoryRow(
    id: u32,
    name: String,
    depth: usize,
    checked: bool,
    selectable: bool,
    expandable: Option<bool>,
    state: SelectionState,
) -> impl IntoView {
    let store = use_app_store();
    let indent = depth * 16;

    let class = if selectable { "category-row" } else { "category-row inactive" };

    view! {
        <div class=class style=format!("margin-left: {}px;", indent)>
            {match expandable {
                Some(expanded) => view! {
                    <button
                        class="collapse-btn"
                        on:click=move |_| store_dispatch_filter(&store, FilterAction::ToggleExpanded(id))
                    >
                        {if expanded { "▼" } else { "▶" }}
                    </button>
                }
                .into_any(),
                None => view! { <span class="collapse-placeholder">"·"</span> }.into_any(),
            }}
            <label>
                <input
                    type="checkbox"
                    prop:checked=checked
                    prop:disabled=!selectable
                    prop:indeterminate={state == SelectionState::Partial}
                    on:change=move |_| store_dispatch_filter(&store, FilterAction::Toggle(id))
                />
                <span class="category-name">{name}</span>
            </label>
        </div>
    }
}

#[component]
pub fn CategoryFilter() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let applied = store.applied_filter().get_untracked();
    let (min_input, set_min_input) = signal(applied.min_price.map(format_price).unwrap_or_default());
    let (max_input, set_max_input) = signal(applied.max_price.map(format_price).unwrap_or_default());
    let (sort, set_sort) = signal(applied.sort);
    let (errors, set_errors) = signal(FieldErrors::new());

    // Keep inputs in step with back/forward navigation
    Effect::new(move |_| {
        let applied = store.applied_filter().get();
        set_min_input.set(applied.min_price.map(format_price).unwrap_or_default());
        set_max_input.set(applied.max_price.map(format_price).unwrap_or_default());
        set_sort.set(applied.sort);
    });

    let rows = move || {
        store.categories().with(|tree| {
            flatten_tree(tree)
                .into_iter()
                .map(|(category, depth)| {
                    let selectable = is_selectable(tree, category.id);
                    (category, depth, selectable)
                })
                .collect::<Vec<_>>()
        })
    };

    let apply = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let mut errors = FieldErrors::new();
        let min_price = parse_bound(&min_input.get_untracked(), "minPrice", &mut errors);
        let max_price = parse_bound(&max_input.get_untracked(), "maxPrice", &mut errors);

        let applied = store.applied_filter().get_untracked();
        let filter = FilterState {
            category_ids: store.categories().with_untracked(|tree| derive_category_ids(tree)),
            sort: sort.get_untracked(),
            min_price,
            max_price,
            page: 1,
            ..applied
        };
        errors.merge(filter.validate());
        if !errors.is_empty() {
            set_errors.set(errors);
            return;
        }
        set_errors.set(FieldErrors::new());
        log::info!("[FILTER] apply {:?}", filter.category_ids);
        ctx.navigate(Route::Catalog {
            query: filter.to_query_string(),
        });
    };

    let clear = move |_: web_sys::MouseEvent| {
        store_dispatch_filter(&store, FilterAction::ClearAll);
        set_errors.set(FieldErrors::new());
        let filter = FilterState::with_page_size(store.applied_filter().get_untracked().page_size);
        ctx.navigate(Route::Catalog {
            query: filter.to_query_string(),
        });
    };

    view! {
        <form class="filter-sidebar" on:submit=apply>
            <h3>"Categories"</h3>
            <div class="category-tree">
                <For
                    each=rows
                    key=|(category, depth, selectable)| {
                        (category.id, *depth, category.checked, category.expanded, *selectable)
                    }
                    children=move |(category, depth, selectable)| {
                        let expandable = (!category.sub_categories.is_empty()).then_some(category.expanded);
                        let state = selection_state(&category);
                        view! {
                            <CategoryRow
                                id=category.id
                                name=category.name.clone()
                                depth=depth
                                checked=category.checked
                                selectable=selectable
                                expandable=expandable
                                state=state
                            />
                        }
                    }
                />
            </div>

            <h3>"Price"</h3>
            <div class="price-range">
                <input
                    type="text"
                    inputmode="decimal"
                    placeholder="Min"
                    prop:value=move || min_input.get()
                    on:input=move |ev| set_min_input.set(event_target_value(&ev))
                />
                <span>"–"</span>
                <input
                    type="text"
                    inputmode="decimal"
                    placeholder="Max"
                    prop:value=move || max_input.get()
                    on:input=move |ev| set_max_input.set(event_target_value(&ev))
                />
            </div>
            <FieldError errors=errors field="minPrice" />
            <FieldError errors=errors field="maxPrice" />

            <h3>"Sort"</h3>
            <select on:change=move |ev| {
                if let Some(key) = SortKey::parse(&event_target_value(&ev)) {
                    set_sort.set(key);
                }
            }>
                {SortKey::ALL
                    .into_iter()
                    .map(|key| {
                        view! {
                            <option value=key.as_str() selected=move || sort.get() == key>
                                {key.label()}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>

            <div class="filter-actions">
                <button type="submit">"Apply"</button>
                <button type="button" class="secondary" on:click=clear>"Clear all"</button>
            </div>
        </form>
    }
}

/// Empty input means no bound
fn parse_bound(input: &str, field: &str, errors: &mut FieldErrors) -> Option<i64> {
    if input.trim().is_empty() {
        return None;
    }
    let cents = parse_price(input);
    if cents.is_none() {
        errors.add(field, "Enter an amount such as 19.99");
    }
    cents
}
