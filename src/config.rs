//! Host Page Configuration
//!
//! Reads the optional `<script id="storefront-config" type="application/json">`
//! block and falls back to compiled-in defaults.

use storefront_core::StorefrontConfig;

const CONFIG_ELEMENT_ID: &str = "storefront-config";

pub fn load_config() -> StorefrontConfig {
    let Some(json) = config_block_text() else {
        return StorefrontConfig::default();
    };
    match StorefrontConfig::from_json(&json) {
        Ok(config) => config,
        Err(err) => {
            web_sys::console::warn_1(&format!("[CONFIG] {}, using defaults", err).into());
            StorefrontConfig::default()
        }
    }
}

fn config_block_text() -> Option<String> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
    element.text_content().filter(|text| !text.trim().is_empty())
}
