//! # mtj-web
//!
//! Leptos + WASM front end for the plant-health platform.
//!
//! The crate owns the pieces every page depends on: the navigation guard,
//! the API gateway with its unauthorized interceptor, the session record in
//! `sessionStorage`, and the one-shot AMap SDK loader. Pages render inside
//! the guarded router set up by [`app::App`].

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod routes;
pub mod state;
pub mod util;

/// Browser entry point.
///
/// Waits for the AMap SDK before mounting so map widgets find `window.AMap`
/// on first render. A failed SDK load only disables map features.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info });

    let _ = net::config::api_config();

    wasm_bindgen_futures::spawn_local(async {
        if let Err(e) = util::amap::load_amap(util::amap::KeyProfile::Geo, &[]).await {
            log::warn!("map features disabled: {e}");
        }
        leptos::mount::mount_to_body(app::App);
    });
}
