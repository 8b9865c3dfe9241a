//! API base URL resolution.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every outgoing request is prefixed with one base URL that is fixed for the
//! page lifetime. The base depends on how the bundle was built and where the
//! page is served from:
//!
//! 1. `MTJ_API_BASE` set and non-blank: used as-is, trailing `/` stripped.
//! 2. Debug build with the dev proxy enabled: relative `/api`.
//! 3. Otherwise `<protocol>//<hostname>:<MTJ_API_PORT>/api`.
//!
//! `MTJ_USE_DEV_PROXY` is tri-state: a non-blank value enables the proxy only
//! when it reads `true`; unset defers to the build mode.
//!
//! Configuration problems never raise; every input has a computed default.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::sync::OnceLock;

/// Port used for the fallback origin when `MTJ_API_PORT` is unset or blank.
pub const DEFAULT_API_PORT: &str = "8099";

/// Relative prefix served by the dev-server proxy.
pub const DEV_PROXY_BASE: &str = "/api";

/// Path prefix of files served from the backend upload directory.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Raw build-time configuration inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiEnv {
    pub base_override: Option<String>,
    pub fallback_port: Option<String>,
    pub dev_proxy: Option<String>,
    pub dev_mode: bool,
}

impl ApiEnv {
    /// Read the values baked in at compile time.
    pub fn from_build_env() -> Self {
        Self {
            base_override: option_env!("MTJ_API_BASE").map(str::to_owned),
            fallback_port: option_env!("MTJ_API_PORT").map(str::to_owned),
            dev_proxy: option_env!("MTJ_USE_DEV_PROXY").map(str::to_owned),
            dev_mode: cfg!(debug_assertions),
        }
    }

    fn port(&self) -> &str {
        self.fallback_port
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_API_PORT)
    }

    fn use_dev_proxy(&self) -> bool {
        match self.dev_proxy.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.eq_ignore_ascii_case("true"),
            _ => self.dev_mode,
        }
    }
}

/// The parts of `window.location` that feed the fallback origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageLocation {
    /// Scheme including the trailing colon, e.g. `https:`.
    pub protocol: String,
    pub hostname: String,
}

impl PageLocation {
    /// Read the current page location; `None` outside a browser.
    pub fn current() -> Option<Self> {
        #[cfg(feature = "csr")]
        {
            let location = web_sys::window()?.location();
            Some(Self {
                protocol: location.protocol().ok()?,
                hostname: location.hostname().ok()?,
            })
        }
        #[cfg(not(feature = "csr"))]
        {
            None
        }
    }
}

/// Resolved, immutable URL configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    base: String,
    origin: String,
}

impl ApiConfig {
    pub fn resolve(env: &ApiEnv, location: Option<&PageLocation>) -> Self {
        let fallback_origin = match location {
            Some(loc) => format!("{}//{}:{}", loc.protocol, loc.hostname, env.port()),
            None => format!("http://localhost:{}", env.port()),
        };

        let override_base = env.base_override.as_deref().map(str::trim).filter(|b| !b.is_empty());
        let base = if let Some(base) = override_base {
            base.trim_end_matches('/').to_owned()
        } else if env.dev_mode && env.use_dev_proxy() {
            DEV_PROXY_BASE.to_owned()
        } else {
            format!("{fallback_origin}/api")
        };

        let origin = if is_absolute_http(&base) {
            base.strip_suffix("/api").unwrap_or(&base).to_owned()
        } else if location.is_some() {
            fallback_origin
        } else {
            String::new()
        };

        Self { base, origin }
    }

    /// Base prefix for API calls (no trailing slash).
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Backend origin used for asset links only.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Join `path` onto the base, inserting the leading `/` when missing.
    pub fn api_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base)
        } else {
            format!("{}/{path}", self.base)
        }
    }

    /// Resolve an asset reference for use in `src`/`href` attributes.
    ///
    /// Absolute URLs pass through, upload paths are rebased onto the backend
    /// origin, anything else is returned verbatim.
    pub fn asset_url(&self, url: Option<&str>) -> String {
        match url {
            None | Some("") => String::new(),
            Some(url) if is_absolute_http(url) => url.to_owned(),
            Some(url) if url.starts_with(UPLOADS_PREFIX) => format!("{}{url}", self.origin),
            Some(url) => url.to_owned(),
        }
    }
}

fn is_absolute_http(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

static API_CONFIG: OnceLock<ApiConfig> = OnceLock::new();

/// Process-wide configuration, resolved on first use from the build
/// environment and the current page location.
pub fn api_config() -> &'static ApiConfig {
    API_CONFIG.get_or_init(|| {
        let config = ApiConfig::resolve(&ApiEnv::from_build_env(), PageLocation::current().as_ref());
        log::info!("api base resolved to {:?} (origin {:?})", config.base(), config.origin());
        config
    })
}

/// [`ApiConfig::api_url`] on the process-wide configuration.
pub fn api_url(path: &str) -> String {
    api_config().api_url(path)
}

/// [`ApiConfig::asset_url`] on the process-wide configuration.
pub fn asset_url(url: Option<&str>) -> String {
    api_config().asset_url(url)
}
