//! One-shot loader for the AMap JS API.
//!
//! SYSTEM CONTEXT
//! ==============
//! Map, geocoding and weather widgets all need `window.AMap`. Whoever asks
//! first triggers the script injection; everyone else shares that load.
//!
//! LIFECYCLE
//! =========
//! The loader moves forward only: idle, then in flight, then settled. The
//! pending handle is stored before the script element exists, so callers
//! arriving in the same tick join it instead of injecting a second tag. When
//! the SDK global is already on the page the load is skipped entirely and
//! the requested profile/plugins are ignored.
//!
//! A failed load stays cached: every later call in the same page lifetime
//! observes the same error and nothing retries. Reloading the page is the
//! recovery path.

#[cfg(test)]
#[path = "amap_test.rs"]
mod amap_test;

use std::cell::RefCell;

use futures::FutureExt;
use futures::future::{self, LocalBoxFuture, Shared};
use thiserror::Error;

use crate::net::query::encode_uri_component;

/// Script endpoint; query parameters are appended by [`script_url`].
pub const SDK_ENDPOINT: &str = "https://webapi.amap.com/maps";
pub const SDK_VERSION: &str = "2.0";

/// Which key/security-code pair the page loads the SDK with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyProfile {
    #[default]
    Geo,
    Weather,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPair {
    pub key: &'static str,
    pub security_code: &'static str,
}

impl KeyProfile {
    pub fn key_pair(self) -> KeyPair {
        match self {
            Self::Geo => KeyPair {
                key: "66317f0689da080e4773dec11b3cdaff",
                security_code: "cb247fd14327d62ae5dda83202a0446e",
            },
            Self::Weather => KeyPair {
                key: "8eab52d085719f6042d91ac3f9bae7c9",
                security_code: "8a814e5684333c593755d3115ad7909c",
            },
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("AMap JSAPI load failed")]
    ScriptFailed,
    #[error("AMap JSAPI loaded but window.AMap is missing")]
    GlobalMissing,
    #[error("no document to inject the AMap script into")]
    NoDocument,
}

/// Build the SDK script URL for `key` and `plugins`.
pub fn script_url(key: &str, plugins: &[&str]) -> String {
    let mut url = format!("{SDK_ENDPOINT}?v={SDK_VERSION}&key={}", encode_uri_component(key));
    if !plugins.is_empty() {
        let joined = plugins.iter().map(|p| encode_uri_component(p)).collect::<Vec<_>>().join(",");
        url.push_str("&plugin=");
        url.push_str(&joined);
    }
    url
}

/// Page operations the loader needs.
pub trait ScriptHost {
    /// The SDK global once it exists.
    type Handle: Clone + 'static;

    fn sdk_global(&self) -> Option<Self::Handle>;

    fn set_security_config(&self, security_code: &str);

    /// Append a script tag for `src`. The future settles on the tag's
    /// `load`/`error` event.
    fn inject_script(&self, src: &str) -> LocalBoxFuture<'static, Result<Self::Handle, LoadError>>;
}

/// Shared, single-resolution handle to a load.
pub type SdkLoad<H> = Shared<LocalBoxFuture<'static, Result<H, LoadError>>>;

/// Deduplicating loader over a [`ScriptHost`].
pub struct ScriptLoader<H: ScriptHost> {
    host: H,
    in_flight: RefCell<Option<SdkLoad<H::Handle>>>,
}

impl<H: ScriptHost> ScriptLoader<H> {
    pub fn new(host: H) -> Self {
        Self { host, in_flight: RefCell::new(None) }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Whether a load has been started (it may already have settled).
    pub fn is_started(&self) -> bool {
        self.in_flight.borrow().is_some()
    }

    /// Return a handle to the SDK, starting the load if nobody has.
    ///
    /// `profile` and `plugins` only apply to the call that starts the load.
    pub fn load(&self, profile: KeyProfile, plugins: &[&str]) -> SdkLoad<H::Handle> {
        if let Some(sdk) = self.host.sdk_global() {
            return future::ready(Ok(sdk)).boxed_local().shared();
        }
        if let Some(pending) = self.in_flight.borrow().as_ref() {
            return pending.clone();
        }

        let pair = profile.key_pair();
        self.host.set_security_config(pair.security_code);
        let src = script_url(pair.key, plugins);
        log::info!("loading AMap JSAPI ({profile:?}, plugins: {plugins:?})");

        let load = self
            .host
            .inject_script(&src)
            .inspect(|result| {
                if let Err(e) = result {
                    log::warn!("{e}");
                }
            })
            .boxed_local()
            .shared();
        *self.in_flight.borrow_mut() = Some(load.clone());
        load
    }
}

// =============================================================================
// Browser host
// =============================================================================

/// Handle to `window.AMap`.
#[derive(Clone, Debug)]
pub struct AmapSdk {
    #[cfg(feature = "csr")]
    pub global: wasm_bindgen::JsValue,
}

/// The real page: `window`, `document.head`, script elements.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserScriptHost;

#[cfg(feature = "csr")]
const SDK_GLOBAL: &str = "AMap";
#[cfg(feature = "csr")]
const SECURITY_CONFIG_GLOBAL: &str = "_AMapSecurityConfig";

#[cfg(feature = "csr")]
fn window_global(name: &str) -> Option<wasm_bindgen::JsValue> {
    let window = web_sys::window()?;
    let value = js_sys::Reflect::get(&window, &name.into()).ok()?;
    (!value.is_undefined() && !value.is_null()).then_some(value)
}

impl ScriptHost for BrowserScriptHost {
    type Handle = AmapSdk;

    fn sdk_global(&self) -> Option<AmapSdk> {
        #[cfg(feature = "csr")]
        {
            window_global(SDK_GLOBAL).map(|global| AmapSdk { global })
        }
        #[cfg(not(feature = "csr"))]
        {
            None
        }
    }

    fn set_security_config(&self, security_code: &str) {
        #[cfg(feature = "csr")]
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let config = js_sys::Object::new();
            let _ = js_sys::Reflect::set(&config, &"securityJsCode".into(), &security_code.into());
            let _ = js_sys::Reflect::set(&window, &SECURITY_CONFIG_GLOBAL.into(), &config);
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = security_code;
        }
    }

    fn inject_script(&self, src: &str) -> LocalBoxFuture<'static, Result<AmapSdk, LoadError>> {
        #[cfg(feature = "csr")]
        {
            inject_browser_script(src)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = src;
            future::ready(Err(LoadError::NoDocument)).boxed_local()
        }
    }
}

#[cfg(feature = "csr")]
fn inject_browser_script(src: &str) -> LocalBoxFuture<'static, Result<AmapSdk, LoadError>> {
    use std::rc::Rc;

    use futures::channel::oneshot;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return future::ready(Err(LoadError::NoDocument)).boxed_local();
    };
    let script = match document.create_element("script") {
        Ok(el) => match el.dyn_into::<web_sys::HtmlScriptElement>() {
            Ok(script) => script,
            Err(_) => return future::ready(Err(LoadError::NoDocument)).boxed_local(),
        },
        Err(_) => return future::ready(Err(LoadError::NoDocument)).boxed_local(),
    };
    let Some(head) = document.head() else {
        return future::ready(Err(LoadError::NoDocument)).boxed_local();
    };

    let (tx, rx) = oneshot::channel::<bool>();
    let tx = Rc::new(RefCell::new(Some(tx)));
    let settle = move |loaded: bool| {
        if let Some(tx) = tx.borrow_mut().take() {
            let _ = tx.send(loaded);
        }
    };
    let on_error = settle.clone();
    let onload = Closure::once_into_js(move || settle(true));
    let onerror = Closure::once_into_js(move || on_error(false));

    script.set_src(src);
    script.set_async(true);
    script.set_onload(Some(onload.unchecked_ref()));
    script.set_onerror(Some(onerror.unchecked_ref()));
    if head.append_child(&script).is_err() {
        return future::ready(Err(LoadError::NoDocument)).boxed_local();
    }

    async move {
        match rx.await {
            Ok(true) => window_global(SDK_GLOBAL)
                .map(|global| AmapSdk { global })
                .ok_or(LoadError::GlobalMissing),
            Ok(false) | Err(_) => Err(LoadError::ScriptFailed),
        }
    }
    .boxed_local()
}

thread_local! {
    static AMAP_LOADER: ScriptLoader<BrowserScriptHost> = ScriptLoader::new(BrowserScriptHost);
}

/// Load the AMap SDK through the page-wide loader.
pub fn load_amap(profile: KeyProfile, plugins: &[&str]) -> SdkLoad<AmapSdk> {
    AMAP_LOADER.with(|loader| loader.load(profile, plugins))
}
