use leptos::prelude::*;
use storefront_core::pagination::{has_next, has_previous, page_window, PageLink};

/// Numbered page links with prev/next
#[component]
pub fn Pager(
    #[prop(into)] current: Signal<u32>,
    #[prop(into)] total_pages: Signal<u32>,
    width: u32,
    #[prop(into)] on_select: Callback<u32>,
) -> impl IntoView {
    let links = move || page_window(current.get(), total_pages.get(), width);

    view! {
        <Show when=move || { total_pages.get() > 1 }>
            <nav class="pager">
                <button
                    disabled=move || !has_previous(current.get())
                    on:click=move |_| on_select.run(current.get_untracked().saturating_sub(1))
                >
                    "‹"
                </button>
                {move || {
                    links()
                        .into_iter()
                        .map(|link| match link {
                            PageLink::Page(page) => view! {
                                <button
                                    class=move || if current.get() == page { "page-btn active" } else { "page-btn" }
                                    on:click=move |_| on_select.run(page)
                                >
                                    {page}
                                </button>
                            }
                            .into_any(),
                            PageLink::Gap => view! { <span class="page-gap">"…"</span> }.into_any(),
                        })
                        .collect_view()
                }}
                <button
                    disabled=move || !has_next(current.get(), total_pages.get())
                    on:click=move |_| on_select.run(current.get_untracked() + 1)
                >
                    "›"
                </button>
            </nav>
        </Show>
    }
}
