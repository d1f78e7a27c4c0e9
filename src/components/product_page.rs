//! Product Detail Page
//!
//! Description, gallery, reviews and the viewer's recently seen products.

use leptos::prelude::*;
use leptos::task::spawn_local;
use storefront_core::api::NewReview;
use storefront_core::models::{format_price, Page, Product, Review};
use storefront_core::validation::ReviewForm;
use storefront_core::FieldErrors;

use crate::commands;
use crate::components::{AddToCartButton, FieldError, Pager, ProductGrid};
use crate::context::use_app_context;
use crate::markdown::{render_markdown, render_markdown_inline};
use crate::routes::Route;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn ProductPage(#[prop(into)] slug: Signal<String>) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (product, set_product) = signal::<Option<Product>>(None);
    let (recent, set_recent) = signal(Vec::<Product>::new());

    Effect::new(move |_| {
        let slug = slug.get();
        set_product.set(None);
        spawn_local(async move {
            match commands::get_product(&slug).await {
                Ok(loaded) => set_product.set(Some(loaded)),
                Err(err) if err.is_not_found() => {
                    log::info!("[PRODUCT] {} not found", slug);
                    ctx.navigate(Route::NotFound);
                }
                Err(err) => ctx.error(err.user_message()),
            }
        });
    });

    Effect::new(move |_| {
        // rerun after every product load
        let _ = product.with(|p| p.as_ref().map(|p| p.id.clone()));
        let Some(user_id) = store.user().with(|u| u.as_ref().map(|u| u.id)) else {
            set_recent.set(Vec::new());
            return;
        };
        spawn_local(async move {
            match commands::list_recent_products(user_id).await {
                Ok(products) => set_recent.set(products),
                Err(err) => log::warn!("[PRODUCT] recent products failed: {}", err),
            }
        });
    });

    let recent_others = Signal::derive(move || {
        let current = product.with(|p| p.as_ref().map(|p| p.id.clone()));
        recent.with(|r| {
            r.iter()
                .filter(|p| Some(&p.id) != current.as_ref())
                .cloned()
                .collect::<Vec<_>>()
        })
    });

    view! {
        {move || match product.get() {
            None => view! { <div class="loading">"Loading..."</div> }.into_any(),
            Some(product) => view! { <ProductDetail product=product /> }.into_any(),
        }}
        <Show when=move || recent_others.with(|r| !r.is_empty())>
            <section class="recent-products">
                <h3>"Recently viewed"</h3>
                <ProductGrid products=recent_others />
            </section>
        </Show>
    }
}

#[component]
fn ProductDetail(product: Product) -> impl IntoView {
    let (selected_image, set_selected_image) = signal(0usize);
    let images = StoredValue::new(product.images.clone());
    let description = render_markdown(&product.description);
    let category = product.category.as_ref().map(|c| c.name.clone());
    let stock_note = match product.stock {
        0 => "Out of stock".to_string(),
        1..=5 => format!("Only {} left", product.stock),
        _ => "In stock".to_string(),
    };

    view! {
        <article class="product-detail">
            <div class="gallery">
                {move || {
                    images.with_value(|imgs| imgs.get(selected_image.get()).cloned())
                        .map(|src| view! { <img class="gallery-main" src=src alt="" /> })
                }}
                <div class="gallery-thumbs">
                    {images
                        .get_value()
                        .into_iter()
                        .enumerate()
                        .map(|(index, src)| {
                            view! {
                                <img
                                    class=move || if selected_image.get() == index { "thumb active" } else { "thumb" }
                                    src=src
                                    alt=""
                                    on:click=move |_| set_selected_image.set(index)
                                />
                            }
                        })
                        .collect_view()}
                </div>
            </div>
            <div class="product-info">
                {category.map(|name| view! { <p class="product-category">{name}</p> })}
                <h1>{product.name.clone()}</h1>
                <p class="product-price">{format_price(product.price)}</p>
                <p class="stock-note">{stock_note}</p>
                <AddToCartButton product_id=product.id.clone() in_stock=product.in_stock() />
                <div class="product-description" inner_html=description></div>
            </div>
        </article>
        <Reviews product_id=product.id.clone() slug=product.slug.clone() />
    }
}

#[component]
fn Reviews(product_id: String, slug: String) -> impl IntoView {
    let ctx = use_app_context();
    let (page_size, window) = ctx
        .config
        .with_value(|c| (c.review_page_size, c.pagination_window));

    let slug = StoredValue::new(slug);
    let (page_number, set_page_number) = signal(1u32);
    let (reviews, set_reviews) = signal(Page::<Review>::default());
    let (reload, set_reload) = signal(0u32);

    Effect::new(move |_| {
        let _ = reload.get();
        let number = page_number.get();
        let slug = slug.get_value();
        spawn_local(async move {
            match commands::list_reviews(&slug, number, page_size).await {
                Ok(page) => set_reviews.set(page),
                Err(err) => log::warn!("[REVIEWS] {} page {} failed: {}", slug, number, err),
            }
        });
    });

    let total_pages = Signal::derive(move || reviews.with(|r| r.total_pages));

    view! {
        <section class="reviews">
            <h3>{move || format!("Reviews ({})", reviews.with(|r| r.total_items))}</h3>
            <For
                each=move || reviews.get().items
                key=|review| review.id
                children=|review| {
                    let stars = "★".repeat(review.rating as usize);
                    let comment = render_markdown_inline(&review.comment);
                    view! {
                        <div class="review">
                            <div class="review-head">
                                <span class="review-stars">{stars}</span>
                                <span class="review-author">{review.author_name}</span>
                                <span class="review-date">{review.created_at}</span>
                            </div>
                            <p class="review-comment" inner_html=comment></p>
                        </div>
                    }
                }
            />
            <Pager
                current=page_number
                total_pages=total_pages
                width=window
                on_select=Callback::new(move |n: u32| set_page_number.set(n))
            />
            <ReviewFormView
                product_id=product_id
                on_created=Callback::new(move |_: ()| {
                    set_page_number.set(1);
                    set_reload.update(|n| *n += 1);
                })
            />
        </section>
    }
}

#[component]
fn ReviewFormView(product_id: String, #[prop(into)] on_created: Callback<()>) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let product_id = StoredValue::new(product_id);
    let (rating, set_rating) = signal(0u8);
    let (comment, set_comment) = signal(String::new());
    let (errors, set_errors) = signal(FieldErrors::new());
    let (submitting, set_submitting) = signal(false);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = ReviewForm {
            rating: rating.get_untracked(),
            comment: comment.get_untracked(),
        };
        let invalid = form.validate();
        if !invalid.is_empty() {
            set_errors.set(invalid);
            return;
        }
        set_errors.set(FieldErrors::new());
        set_submitting.set(true);
        let review = NewReview {
            product_id: product_id.get_value(),
            rating: form.rating,
            comment: form.comment.trim().to_string(),
        };
        spawn_local(async move {
            match commands::create_review(&review).await {
                Ok(_) => {
                    set_rating.set(0);
                    set_comment.set(String::new());
                    ctx.success("Thanks for your review");
                    on_created.run(());
                }
                Err(err) => {
                    let mut server = err.field_errors();
                    if server.is_empty() {
                        server.add("comment", err.user_message());
                    }
                    set_errors.set(server);
                }
            }
            set_submitting.set(false);
        });
    };

    view! {
        <Show
            when=move || store.user().with(|u| u.is_some())
            fallback=move || view! {
                <p class="review-login">
                    <a href="/login" on:click=move |ev| {
                        ev.prevent_default();
                        ctx.navigate(Route::Login);
                    }>"Log in"</a>
                    " to write a review."
                </p>
            }
        >
            <form class="review-form" on:submit=submit>
                <div class="rating-input">
                    {(1..=5u8)
                        .map(|value| {
                            view! {
                                <button
                                    type="button"
                                    class=move || { if rating.get() >= value { "star active" } else { "star" } }
                                    on:click=move |_| set_rating.set(value)
                                >
                                    "★"
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
                <FieldError errors=errors field="rating" />
                <textarea
                    placeholder="Share your thoughts..."
                    prop:value=move || comment.get()
                    on:input=move |ev| set_comment.set(event_target_value(&ev))
                ></textarea>
                <FieldError errors=errors field="comment" />
                <button type="submit" disabled=move || submitting.get()>"Submit review"</button>
            </form>
        </Show>
    }
}
