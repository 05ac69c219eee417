pub mod api;
mod app;
mod components;
pub mod config;
mod editor;
pub mod error;
pub mod interaction;
mod logging;
pub mod models;
mod pages;
pub mod schema;
pub mod session;
mod state;

pub use crate::app::App;
use crate::config::EnvConfig;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init(&EnvConfig::from_window().log_level);
    mount_to_body(App);
}
