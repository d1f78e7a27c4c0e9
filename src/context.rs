//! Application Context
//!
//! Shared navigation and notification state provided via Leptos Context API.

use leptos::prelude::*;
use leptos::task::spawn_local;
use storefront_core::StorefrontConfig;

use crate::routes::Route;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub kind: ToastKind,
    pub message: String,
}

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Current page - read
    pub route: ReadSignal<Route>,
    /// Current page - write
    set_route: WriteSignal<Route>,
    /// Visible notifications - read
    pub toasts: ReadSignal<Vec<Toast>>,
    /// Visible notifications - write
    set_toasts: WriteSignal<Vec<Toast>>,
    next_toast_id: StoredValue<u32>,
    pub config: StoredValue<StorefrontConfig>,
}

impl AppContext {
    pub fn new(route: (ReadSignal<Route>, WriteSignal<Route>), config: StorefrontConfig) -> Self {
        let (toasts, set_toasts) = signal(Vec::<Toast>::new());
        Self {
            route: route.0,
            set_route: route.1,
            toasts,
            set_toasts,
            next_toast_id: StoredValue::new(0),
            config: StoredValue::new(config),
        }
    }

    /// Switch page and push the URL onto browser history
    pub fn navigate(&self, route: Route) {
        let url = route.to_url();
        if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
            if history
                .push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&url))
                .is_err()
            {
                log::warn!("[NAV] pushState failed for {}", url);
            }
        }
        log::debug!("[NAV] {}", url);
        self.set_route.set(route);
    }

    /// Switch page without touching history (back/forward)
    pub fn restore(&self, route: Route) {
        self.set_route.set(route);
    }

    /// Show a notification that expires after the configured timeout
    pub fn toast(&self, kind: ToastKind, message: impl Into<String>) {
        let id = self.next_toast_id.get_value() + 1;
        self.next_toast_id.set_value(id);
        let message = message.into();
        self.set_toasts.update(|toasts| toasts.push(Toast { id, kind, message }));

        let timeout = self.config.with_value(|c| c.toast_timeout_ms);
        let set_toasts = self.set_toasts;
        spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(timeout).await;
            set_toasts.update(|toasts| toasts.retain(|t| t.id != id));
        });
    }

    pub fn dismiss_toast(&self, id: u32) {
        self.set_toasts.update(|toasts| toasts.retain(|t| t.id != id));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.toast(ToastKind::Error, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.toast(ToastKind::Success, message);
    }
}

/// Get the app context
pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
