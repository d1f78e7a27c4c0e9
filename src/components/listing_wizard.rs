//! Seller Listing Wizard
//!
//! Step views over [`ListingWizard`]; all step logic lives in the core crate.

use leptos::prelude::*;
use leptos::task::spawn_local;
use storefront_core::category_tree::find_category;
use storefront_core::models::{format_price, parse_price, Category};
use storefront_core::wizard::{ListingWizard, WizardStep, MAX_IMAGES};
use storefront_core::FieldErrors;

use crate::commands;
use crate::components::FieldError;
use crate::context::use_app_context;
use crate::markdown::render_markdown;
use crate::routes::Route;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn ListingWizardPage() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let wizard = RwSignal::new(ListingWizard::new());
    let (submitting, set_submitting) = signal(false);
    let (errors, set_errors) = signal(FieldErrors::new());

    // mirror wizard errors into a plain signal for FieldError
    Effect::new(move |_| set_errors.set(wizard.with(|w| w.errors.clone())));

    let step = Memo::new(move |_| wizard.with(|w| w.step));

    let submit = move || {
        let listing = match wizard.with_untracked(|w| w.to_listing()) {
            Ok(listing) => listing,
            Err(errors) => {
                wizard.update(|w| w.apply_server_errors(errors));
                return;
            }
        };
        set_submitting.set(true);
        spawn_local(async move {
            match commands::create_product(&listing).await {
                Ok(product) => {
                    log::info!("[SELL] listed {}", product.slug);
                    ctx.success("Listing published");
                    wizard.update(|w| w.reset());
                    ctx.navigate(Route::Product { slug: product.slug });
                }
                Err(err) => {
                    log::warn!("[SELL] create failed: {}", err);
                    let field_errors = err.field_errors();
                    if field_errors.is_empty() {
                        ctx.error(err.user_message());
                    } else {
                        wizard.update(|w| w.apply_server_errors(field_errors));
                    }
                }
            }
            set_submitting.set(false);
        });
    };

    view! {
        <section class="listing-wizard">
            <h1>"Sell a product"</h1>
            <ol class="wizard-steps">
                {WizardStep::ALL
                    .into_iter()
                    .map(|target| {
                        view! {
                            <li
                                class=move || if step.get() == target { "wizard-step active" } else { "wizard-step" }
                                on:click=move |_| {
                                    wizard.update(|w| {
                                        w.go_to(target);
                                    });
                                }
                            >
                                {format!("{}. {}", target.index() + 1, target.title())}
                            </li>
                        }
                    })
                    .collect_view()}
            </ol>

            {move || match step.get() {
                WizardStep::Details => view! { <DetailsStep wizard=wizard errors=errors /> }.into_any(),
                WizardStep::Pricing => view! { <PricingStep wizard=wizard errors=errors /> }.into_any(),
                WizardStep::Images => view! { <ImagesStep wizard=wizard errors=errors /> }.into_any(),
                WizardStep::Review => {
                    let categories = store.categories().get_untracked();
                    view! { <ReviewStep wizard=wizard categories=categories errors=errors /> }.into_any()
                }
            }}

            <div class="wizard-nav">
                <button
                    type="button"
                    class="secondary"
                    disabled=move || step.get() == WizardStep::Details
                    on:click=move |_| wizard.update(|w| w.back())
                >
                    "Back"
                </button>
                <Show
                    when=move || wizard.with(|w| w.is_last_step())
                    fallback=move || view! {
                        <button type="button" on:click=move |_| {
                            wizard.update(|w| {
                                w.next();
                            });
                        }>"Next"</button>
                    }
                >
                    <button type="button" disabled=move || submitting.get() on:click=move |_| submit()>
                        {move || if submitting.get() { "Publishing..." } else { "Publish" }}
                    </button>
                </Show>
            </div>
        </section>
    }
}

#[component]
fn DetailsStep(wizard: RwSignal<ListingWizard>, errors: ReadSignal<FieldErrors>) -> impl IntoView {
    let store = use_app_store();

    // listings belong to subcategories
    let options = move || {
        store.categories().with(|tree| {
            tree.iter()
                .flat_map(|top| {
                    top.sub_categories
                        .iter()
                        .map(move |sub| (sub.id, format!("{} / {}", top.name, sub.name)))
                })
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="wizard-body">
            <label class="form-field">
                "Name"
                <input
                    type="text"
                    prop:value=move || wizard.with(|w| w.draft.name.clone())
                    on:input=move |ev| wizard.update(|w| w.draft.name = event_target_value(&ev))
                />
            </label>
            <FieldError errors=errors field="name" />
            <label class="form-field">
                "Description (markdown)"
                <textarea
                    rows="8"
                    prop:value=move || wizard.with(|w| w.draft.description.clone())
                    on:input=move |ev| wizard.update(|w| w.draft.description = event_target_value(&ev))
                ></textarea>
            </label>
            <FieldError errors=errors field="description" />
            <label class="form-field">
                "Category"
                <select on:change=move |ev| {
                    let id = event_target_value(&ev).parse().ok();
                    wizard.update(|w| w.draft.category_id = id);
                }>
                    <option value="" selected=move || wizard.with(|w| w.draft.category_id.is_none())>
                        "Choose..."
                    </option>
                    {move || {
                        options()
                            .into_iter()
                            .map(|(id, label)| {
                                view! {
                                    <option
                                        value=id.to_string()
                                        selected=move || wizard.with(|w| w.draft.category_id == Some(id))
                                    >
                                        {label}
                                    </option>
                                }
                            })
                            .collect_view()
                    }}
                </select>
            </label>
            <FieldError errors=errors field="categoryId" />
        </div>
    }
}

#[component]
fn PricingStep(wizard: RwSignal<ListingWizard>, errors: ReadSignal<FieldErrors>) -> impl IntoView {
    view! {
        <div class="wizard-body">
            <label class="form-field">
                "Price"
                <input
                    type="text"
                    inputmode="decimal"
                    placeholder="19.99"
                    prop:value=move || wizard.with(|w| w.draft.price_input.clone())
                    on:input=move |ev| wizard.update(|w| w.draft.price_input = event_target_value(&ev))
                />
            </label>
            <FieldError errors=errors field="price" />
            <label class="form-field">
                "Stock"
                <input
                    type="number"
                    min="0"
                    prop:value=move || wizard.with(|w| w.draft.stock_input.clone())
                    on:input=move |ev| wizard.update(|w| w.draft.stock_input = event_target_value(&ev))
                />
            </label>
            <FieldError errors=errors field="stock" />
        </div>
    }
}

#[component]
fn ImagesStep(wizard: RwSignal<ListingWizard>, errors: ReadSignal<FieldErrors>) -> impl IntoView {
    let (url, set_url) = signal(String::new());
    let (add_error, set_add_error) = signal::<Option<String>>(None);

    let add = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let mut result = Ok(());
        wizard.update(|w| result = w.add_image(&url.get_untracked()));
        match result {
            Ok(()) => {
                set_url.set(String::new());
                set_add_error.set(None);
            }
            Err(message) => set_add_error.set(Some(message)),
        }
    };

    let images = move || wizard.with(|w| w.draft.images.clone());

    view! {
        <div class="wizard-body">
            <form class="image-add" on:submit=add>
                <input
                    type="url"
                    placeholder="https://..."
                    prop:value=move || url.get()
                    on:input=move |ev| set_url.set(event_target_value(&ev))
                />
                <button type="submit">"Add image"</button>
            </form>
            {move || add_error.get().map(|message| view! { <p class="field-error">{message}</p> })}
            <FieldError errors=errors field="images" />
            <p class="hint">{move || format!("{} of {} images", images().len(), MAX_IMAGES)}</p>
            <ul class="image-list">
                {move || {
                    images()
                        .into_iter()
                        .enumerate()
                        .map(|(index, src)| {
                            view! {
                                <li>
                                    <img src=src alt="" />
                                    <button
                                        type="button"
                                        disabled={index == 0}
                                        on:click=move |_| wizard.update(|w| w.move_image_up(index))
                                    >
                                        "↑"
                                    </button>
                                    <button
                                        type="button"
                                        class="delete-btn"
                                        on:click=move |_| wizard.update(|w| w.remove_image(index))
                                    >
                                        "×"
                                    </button>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>
        </div>
    }
}

#[component]
fn ReviewStep(wizard: RwSignal<ListingWizard>, categories: Vec<Category>, errors: ReadSignal<FieldErrors>) -> impl IntoView {
    let draft = wizard.with_untracked(|w| w.draft.clone());
    let category = draft
        .category_id
        .and_then(|id| find_category(&categories, id))
        .map(|c| c.name.clone())
        .unwrap_or_default();
    let price = parse_price(&draft.price_input).map(format_price).unwrap_or_default();

    view! {
        <div class="wizard-body wizard-review">
            <dl>
                <dt>"Name"</dt>
                <dd>{draft.name.clone()}</dd>
                <dt>"Category"</dt>
                <dd>{category}</dd>
                <dt>"Price"</dt>
                <dd>{price}</dd>
                <dt>"Stock"</dt>
                <dd>{draft.stock_input.clone()}</dd>
                <dt>"Images"</dt>
                <dd>{draft.images.len()}</dd>
            </dl>
            <div class="product-description" inner_html=render_markdown(&draft.description)></div>
            <ul class="wizard-errors">
                {move || {
                    errors.with(|e| {
                        e.fields()
                            .flat_map(|field| e.get(field).iter().map(move |m| format!("{}: {}", field, m)))
                            .collect::<Vec<_>>()
                    })
                    .into_iter()
                    .map(|line| view! { <li class="field-error">{line}</li> })
                    .collect_view()
                }}
            </ul>
        </div>
    }
}
