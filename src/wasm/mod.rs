use wasm_bindgen::prelude::*;
use web_sys::Document;

use crate::config::SiteConfig;
use crate::error::SiteError;

pub mod host;
mod net;
pub mod pages;
pub mod render;
pub mod view;

/// Optional `<script id="site-config" type="application/json">` override.
fn load_config(document: &Document) -> SiteConfig {
    let Some(text) = document
        .get_element_by_id("site-config")
        .and_then(|el| el.text_content())
    else {
        return SiteConfig::default();
    };
    match SiteConfig::from_json(&text) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("ignoring malformed site config: {err}");
            SiteConfig::default()
        }
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Trace).ok();

    let window = web_sys::window().ok_or(SiteError::NoWindow)?;
    let document = window.document().ok_or(SiteError::NoDocument)?;
    let config = load_config(&document);
    log::set_max_level(config.log_level().to_level_filter());
    log::info!("site starting");

    // Test harness pages have no #app; the module then only exposes its API.
    let Some(root) = document.get_element_by_id("app") else {
        log::warn!("no #app element, nothing mounted");
        return Ok(());
    };
    view::mount(root, config);
    Ok(())
}
