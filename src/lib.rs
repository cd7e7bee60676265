mod api;
mod app;
mod cache;
mod components;
mod form;
mod logging;
mod models;
mod notify;
mod pages;
mod state;
mod util;

#[cfg(test)]
mod testing;

use crate::api::EnvConfig;
use crate::app::App;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;


// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();

    let config = EnvConfig::new();
    logging::init_logging(&config.log_level);
    tracing::info!(api_url = %config.api_url, per_page = config.per_page, "starting notehub");

    mount_to_body(move || view! { <App config=config.clone() /> });
}
