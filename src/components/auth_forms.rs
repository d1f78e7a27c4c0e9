//! Auth Forms
//!
//! Login, registration and email verification. Client-side checks run
//! first; server field errors land on the same inline slots.

use leptos::prelude::*;
use leptos::task::spawn_local;
use storefront_core::models::User;
use storefront_core::validation::{LoginForm, OtpForm, RegisterForm};
use storefront_core::{ApiError, FieldErrors};

use crate::commands;
use crate::components::FieldError;
use crate::context::use_app_context;
use crate::routes::Route;
use crate::store::{cart_sync, store_set_user, use_app_store, AppStore};

/// Field errors from the server, or the summary under `form`
fn server_errors(err: &ApiError) -> FieldErrors {
    let mut errors = err.field_errors();
    if errors.is_empty() {
        errors.add("form", err.user_message());
    }
    errors
}

/// Signed in: remember the user and load their cart
fn start_session(store: AppStore, user: User) {
    log::info!("[AUTH] signed in as {}", user.email);
    store_set_user(&store, Some(user));
    spawn_local(async move {
        cart_sync(store).initialize_cart().await;
    });
}

#[component]
fn TextField(
    label: &'static str,
    field: &'static str,
    #[prop(default = "text")] input_type: &'static str,
    value: ReadSignal<String>,
    set_value: WriteSignal<String>,
    errors: ReadSignal<FieldErrors>,
) -> impl IntoView {
    view! {
        <label class="form-field">
            {label}
            <input
                type=input_type
                name=field
                prop:value=move || value.get()
                on:input=move |ev| set_value.set(event_target_value(&ev))
            />
        </label>
        <FieldError errors=errors field=field />
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (errors, set_errors) = signal(FieldErrors::new());
    let (pending, set_pending) = signal(false);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = LoginForm {
            email: email.get_untracked().trim().to_string(),
            password: password.get_untracked(),
        };
        let invalid = form.validate();
        if !invalid.is_empty() {
            set_errors.set(invalid);
            return;
        }
        set_errors.set(FieldErrors::new());
        set_pending.set(true);
        spawn_local(async move {
            match commands::login(&form).await {
                Ok(user) if !user.verified => {
                    ctx.navigate(Route::Verify { email: user.email });
                }
                Ok(user) => {
                    start_session(store, user);
                    ctx.navigate(Route::catalog());
                }
                Err(err) => {
                    log::warn!("[AUTH] login failed: {}", err);
                    set_errors.set(server_errors(&err));
                }
            }
            set_pending.set(false);
        });
    };

    view! {
        <form class="auth-form" on:submit=submit>
            <h1>"Log in"</h1>
            <FieldError errors=errors field="form" />
            <TextField label="Email" field="email" input_type="email" value=email set_value=set_email errors=errors />
            <TextField label="Password" field="password" input_type="password" value=password set_value=set_password errors=errors />
            <button type="submit" disabled=move || pending.get()>"Log in"</button>
            <p>
                "New here? "
                <a href="/register" on:click=move |ev| {
                    ev.prevent_default();
                    ctx.navigate(Route::Register);
                }>"Create an account"</a>
            </p>
        </form>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let ctx = use_app_context();

    let (first_name, set_first_name) = signal(String::new());
    let (last_name, set_last_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (errors, set_errors) = signal(FieldErrors::new());
    let (pending, set_pending) = signal(false);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = RegisterForm {
            first_name: first_name.get_untracked().trim().to_string(),
            last_name: last_name.get_untracked().trim().to_string(),
            email: email.get_untracked().trim().to_string(),
            password: password.get_untracked(),
            confirm_password: confirm.get_untracked(),
        };
        let invalid = form.validate();
        if !invalid.is_empty() {
            set_errors.set(invalid);
            return;
        }
        set_errors.set(FieldErrors::new());
        set_pending.set(true);
        spawn_local(async move {
            match commands::register(&form).await {
                Ok(user) => {
                    log::info!("[AUTH] registered {}", user.email);
                    ctx.success("Check your inbox for a verification code");
                    ctx.navigate(Route::Verify { email: user.email });
                }
                Err(err) => {
                    log::warn!("[AUTH] register failed: {}", err);
                    set_errors.set(server_errors(&err));
                }
            }
            set_pending.set(false);
        });
    };

    view! {
        <form class="auth-form" on:submit=submit>
            <h1>"Create an account"</h1>
            <FieldError errors=errors field="form" />
            <TextField label="First name" field="firstName" value=first_name set_value=set_first_name errors=errors />
            <TextField label="Last name" field="lastName" value=last_name set_value=set_last_name errors=errors />
            <TextField label="Email" field="email" input_type="email" value=email set_value=set_email errors=errors />
            <TextField label="Password" field="password" input_type="password" value=password set_value=set_password errors=errors />
            <TextField label="Confirm password" field="confirmPassword" input_type="password" value=confirm set_value=set_confirm errors=errors />
            <button type="submit" disabled=move || pending.get()>"Register"</button>
        </form>
    }
}

#[component]
pub fn VerifyPage(#[prop(into)] email: Signal<String>) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (otp, set_otp) = signal(String::new());
    let (errors, set_errors) = signal(FieldErrors::new());
    let (pending, set_pending) = signal(false);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = OtpForm {
            email: email.get_untracked(),
            otp: otp.get_untracked().trim().to_string(),
        };
        let invalid = form.validate();
        if !invalid.is_empty() {
            set_errors.set(invalid);
            return;
        }
        set_errors.set(FieldErrors::new());
        set_pending.set(true);
        spawn_local(async move {
            match commands::verify_email(&form).await {
                Ok(user) => {
                    ctx.success("Email verified");
                    start_session(store, user);
                    ctx.navigate(Route::catalog());
                }
                Err(err) => set_errors.set(server_errors(&err)),
            }
            set_pending.set(false);
        });
    };

    let resend = move |_: web_sys::MouseEvent| {
        let address = email.get_untracked();
        spawn_local(async move {
            match commands::resend_otp(&address).await {
                Ok(()) => ctx.success("A new code is on its way"),
                Err(err) => ctx.error(err.user_message()),
            }
        });
    };

    view! {
        <form class="auth-form" on:submit=submit>
            <h1>"Verify your email"</h1>
            <p>"Enter the 6-digit code sent to " <strong>{move || email.get()}</strong></p>
            <FieldError errors=errors field="form" />
            <FieldError errors=errors field="email" />
            <TextField label="Code" field="otp" value=otp set_value=set_otp errors=errors />
            <button type="submit" disabled=move || pending.get()>"Verify"</button>
            <button type="button" class="secondary" on:click=resend>"Resend code"</button>
        </form>
    }
}
