//! Storefront Frontend Entry Point

mod app;
mod commands;
mod components;
mod config;
mod context;
mod logger;
mod markdown;
mod routes;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let config = config::load_config();
    logger::init(config.log_level());
    commands::init(&config);
    log::info!("[APP] storefront starting, api at {}", config.api_base_url);

    mount_to_body(move || view! { <App config=config.clone() /> });
}
