//! API gateway: every backend request goes through [`ApiGateway::fetch`].
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages never build backend URLs or call the HTTP client directly. The
//! gateway resolves the URL against the process-wide [`ApiConfig`], appends
//! query parameters, and enforces the system-wide contract that a 401 from
//! any endpoint forces re-login.
//!
//! UNAUTHORIZED HANDLING
//! =====================
//! On a 401 the session record is cleared (failures ignored) and, unless the
//! page is already the login or registration page, the browser performs a
//! full-page navigation to `/login`. Concurrent 401s each repeat this; both
//! steps are idempotent. The response is handed back untouched so callers
//! can still read its body.
//!
//! ERROR HANDLING
//! ==============
//! Only transport failures become [`ApiError`]. Non-2xx statuses are data,
//! not errors; callers interpret them.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::future::Future;

use serde::Serialize;
use thiserror::Error;

use super::config::ApiConfig;
use super::query::form_encode;
use crate::routes::{LOGIN_PATH, is_auth_page};
use crate::util::session::{SessionStorage, SessionStore};

/// Status that triggers the re-login side effect.
pub const UNAUTHORIZED: u16 = 401;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("request could not be built: {0}")]
    Request(String),
    #[error("network error: {0}")]
    Transport(String),
    #[error("response body unreadable: {0}")]
    Body(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// Caller-facing request options. `params` is a gateway-level extension and
/// is never forwarded to the transport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub params: Option<Vec<(String, String)>>,
}

impl FetchOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self { method: Method::Post, ..Self::default() }
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.get_or_insert_with(Vec::new).push((name.into(), value.into()));
        self
    }

    /// Attach a JSON body and matching `Content-Type`.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized.
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_string(value).map_err(|e| ApiError::Request(e.to_string()))?;
        self.body = Some(body);
        Ok(self.header("Content-Type", "application/json"))
    }
}

/// What the transport actually receives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestInit {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// Build the final URL and transport options for `path`.
pub fn prepare_request(config: &ApiConfig, path: &str, options: FetchOptions) -> (String, RequestInit) {
    let FetchOptions { method, headers, body, params } = options;
    let mut url = config.api_url(path);
    if let Some(params) = params {
        let query = form_encode(&params);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
    }
    (url, RequestInit { method, headers, body })
}

/// Response surface the gateway and its callers rely on.
pub trait HttpResponse {
    fn status(&self) -> u16;

    fn ok(&self) -> bool {
        (200..300).contains(&self.status())
    }

    fn text(self) -> impl Future<Output = Result<String, ApiError>>;
}

/// The network primitive underneath the gateway.
pub trait Transport {
    type Response: HttpResponse;

    fn send(&self, url: &str, init: RequestInit) -> impl Future<Output = Result<Self::Response, ApiError>>;
}

/// Page location access needed by the unauthorized interceptor.
pub trait PageNavigator {
    fn current_path(&self) -> String;

    /// Full-page navigation (not a client-side route change).
    fn redirect(&self, path: &str);
}

/// Request dispatcher bound to one URL configuration, transport, session
/// store and navigator.
pub struct ApiGateway<T, S, N> {
    config: ApiConfig,
    transport: T,
    session: SessionStore<S>,
    navigator: N,
}

impl<T, S, N> ApiGateway<T, S, N>
where
    T: Transport,
    S: SessionStorage,
    N: PageNavigator,
{
    pub fn new(config: ApiConfig, transport: T, session: SessionStore<S>, navigator: N) -> Self {
        Self { config, transport, session, navigator }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn api_url(&self, path: &str) -> String {
        self.config.api_url(path)
    }

    /// Send a request to `path` and return the response unmodified.
    ///
    /// # Errors
    ///
    /// Returns an error only when the transport fails; HTTP error statuses
    /// are returned as responses.
    pub async fn fetch(&self, path: &str, options: FetchOptions) -> Result<T::Response, ApiError> {
        let (url, init) = prepare_request(&self.config, path, options);
        log::debug!("{} {url}", init.method.as_str());
        let resp = self.transport.send(&url, init).await?;
        if resp.status() == UNAUTHORIZED {
            self.on_unauthorized();
        }
        Ok(resp)
    }

    fn on_unauthorized(&self) {
        if let Err(e) = self.session.clear() {
            log::debug!("session clear after 401 failed: {e}");
        }
        let path = self.navigator.current_path();
        if is_auth_page(&path) {
            return;
        }
        log::warn!("unauthorized response on {path}; redirecting to login");
        self.navigator.redirect(LOGIN_PATH);
    }
}

// =============================================================================
// Browser bindings
// =============================================================================

/// `fetch` via `gloo-net`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

/// `window.location`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl PageNavigator for BrowserNavigator {
    fn current_path(&self) -> String {
        #[cfg(feature = "csr")]
        {
            web_sys::window()
                .and_then(|w| w.location().pathname().ok())
                .unwrap_or_default()
        }
        #[cfg(not(feature = "csr"))]
        {
            String::new()
        }
    }

    fn redirect(&self, path: &str) {
        #[cfg(feature = "csr")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href(path);
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = path;
        }
    }
}

#[cfg(feature = "csr")]
impl HttpResponse for gloo_net::http::Response {
    fn status(&self) -> u16 {
        gloo_net::http::Response::status(self)
    }

    async fn text(self) -> Result<String, ApiError> {
        gloo_net::http::Response::text(&self)
            .await
            .map_err(|e| ApiError::Body(e.to_string()))
    }
}

#[cfg(feature = "csr")]
impl Transport for GlooTransport {
    type Response = gloo_net::http::Response;

    async fn send(&self, url: &str, init: RequestInit) -> Result<Self::Response, ApiError> {
        use gloo_net::http::{Method as GlooMethod, RequestBuilder};

        let method = match init.method {
            Method::Get => GlooMethod::GET,
            Method::Post => GlooMethod::POST,
            Method::Put => GlooMethod::PUT,
            Method::Patch => GlooMethod::PATCH,
            Method::Delete => GlooMethod::DELETE,
        };
        let mut builder = RequestBuilder::new(url).method(method);
        for (name, value) in &init.headers {
            builder = builder.header(name, value);
        }
        let request = match init.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Request(e.to_string()))?;
        request.send().await.map_err(|e| ApiError::Transport(e.to_string()))
    }
}

/// Gateway wired to the browser: `fetch`, `sessionStorage`, `window.location`.
pub type BrowserGateway = ApiGateway<GlooTransport, crate::util::session::BrowserSessionStorage, BrowserNavigator>;

/// Process-wide browser gateway.
#[cfg(feature = "csr")]
pub fn gateway() -> &'static BrowserGateway {
    static GATEWAY: std::sync::OnceLock<BrowserGateway> = std::sync::OnceLock::new();
    GATEWAY.get_or_init(|| {
        ApiGateway::new(
            super::config::api_config().clone(),
            GlooTransport,
            crate::util::session::browser_session(),
            BrowserNavigator,
        )
    })
}

/// [`ApiGateway::fetch`] on the process-wide gateway.
///
/// # Errors
///
/// Returns an error when the network request fails.
#[cfg(feature = "csr")]
pub async fn api_fetch(path: &str, options: FetchOptions) -> Result<gloo_net::http::Response, ApiError> {
    gateway().fetch(path, options).await
}
