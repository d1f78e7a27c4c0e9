use leptos::prelude::*;
use storefront_core::FieldErrors;

/// First message for `field`, if any
#[component]
pub fn FieldError(errors: ReadSignal<FieldErrors>, field: &'static str) -> impl IntoView {
    move || {
        errors
            .with(|e| e.first(field).map(str::to_string))
            .map(|message| view! { <p class="field-error">{message}</p> })
    }
}

/// Banner for a request-level error with a dismiss button
#[component]
pub fn ErrorBanner(
    #[prop(into)] message: Signal<Option<String>>,
    #[prop(into)] on_dismiss: Callback<()>,
) -> impl IntoView {
    move || {
        message.get().map(|text| {
            view! {
                <div class="error-banner" role="alert">
                    <span>{text}</span>
                    <button class="dismiss-btn" on:click=move |_| on_dismiss.run(())>"×"</button>
                </div>
            }
        })
    }
}
