use futures::executor::block_on;
use futures::future::join;

use super::*;
use crate::net::config::ApiEnv;
use crate::net::mock::{MockNavigator, MockResponse, MockTransport};
use crate::util::session::{MemorySessionStorage, SessionState};

type TestGateway = ApiGateway<MockTransport, MemorySessionStorage, MockNavigator>;

fn config() -> ApiConfig {
    ApiConfig::resolve(&ApiEnv { base_override: Some("https://api.test/api".to_owned()), ..ApiEnv::default() }, None)
}

fn gateway(responses: Vec<Result<MockResponse, ApiError>>, path: &str, session_raw: Option<&str>) -> TestGateway {
    let storage = session_raw.map_or_else(MemorySessionStorage::new, MemorySessionStorage::with_raw);
    ApiGateway::new(
        config(),
        MockTransport::replying(responses),
        SessionStore::new(storage),
        MockNavigator::at(path),
    )
}

const USER: &str = r#"{"role":"user","username":"20240001"}"#;

// =============================================================
// Request preparation
// =============================================================

#[test]
fn prepare_request_appends_encoded_params_and_drops_them() {
    let options = FetchOptions::get().param("keyword", "leaf spot").param("page", "2");
    let (url, init) = prepare_request(&config(), "knowledge/search", options);
    assert_eq!(url, "https://api.test/api/knowledge/search?keyword=leaf+spot&page=2");
    assert_eq!(init, RequestInit::default());
}

#[test]
fn prepare_request_skips_empty_query() {
    let options = FetchOptions { params: Some(Vec::new()), ..FetchOptions::get() };
    let (url, _) = prepare_request(&config(), "/news", options);
    assert_eq!(url, "https://api.test/api/news");
}

#[test]
fn json_sets_body_and_content_type() {
    let options = FetchOptions::post().json(&serde_json::json!({"a": 1})).expect("json");
    assert_eq!(options.method, Method::Post);
    assert_eq!(options.body.as_deref(), Some(r#"{"a":1}"#));
    assert_eq!(options.headers, vec![("Content-Type".to_owned(), "application/json".to_owned())]);
}

#[test]
fn method_names_are_uppercase() {
    assert_eq!(Method::Get.as_str(), "GET");
    assert_eq!(Method::Delete.as_str(), "DELETE");
    assert_eq!(FetchOptions::get().method(Method::Put).method, Method::Put);
}

// =============================================================
// Dispatch
// =============================================================

#[test]
fn fetch_forwards_method_headers_and_body() {
    let gw = gateway(vec![], "/home", Some(USER));
    let options = FetchOptions::post().header("X-Trace", "1").json(&serde_json::json!({"id": 3})).expect("json");
    block_on(gw.fetch("cart", options)).expect("fetch");

    let sent = gw.transport().sent();
    assert_eq!(sent.len(), 1);
    let (url, init) = &sent[0];
    assert_eq!(url, "https://api.test/api/cart");
    assert_eq!(init.method, Method::Post);
    assert_eq!(init.headers.len(), 2);
    assert_eq!(init.body.as_deref(), Some(r#"{"id":3}"#));
}

#[test]
fn non_401_errors_pass_through_without_side_effects() {
    let gw = gateway(vec![Ok(MockResponse::new(403, "forbidden")), Ok(MockResponse::new(500, "boom"))], "/home", Some(USER));
    let first = block_on(gw.fetch("admin/users", FetchOptions::get())).expect("fetch");
    let second = block_on(gw.fetch("admin/users", FetchOptions::get())).expect("fetch");
    assert_eq!(first.status(), 403);
    assert!(!second.ok());
    assert!(gw.session().state().is_authenticated());
    assert!(gw.navigator().redirects().is_empty());
}

#[test]
fn transport_failure_is_an_error_without_side_effects() {
    let gw = gateway(vec![Err(ApiError::Transport("offline".to_owned()))], "/home", Some(USER));
    let err = block_on(gw.fetch("news", FetchOptions::get())).expect_err("transport error");
    assert_eq!(err, ApiError::Transport("offline".to_owned()));
    assert!(gw.session().state().is_authenticated());
}

// =============================================================
// Unauthorized interception
// =============================================================

#[test]
fn unauthorized_on_home_clears_session_and_redirects() {
    let gw = gateway(vec![Ok(MockResponse::new(401, r#"{"success":false}"#))], "/home", Some(USER));
    let resp = block_on(gw.fetch("history", FetchOptions::get())).expect("fetch");

    assert_eq!(gw.session().state(), SessionState::Absent);
    assert_eq!(gw.navigator().redirects(), vec!["/login".to_owned()]);
    assert_eq!(resp.status(), 401);
    assert_eq!(block_on(resp.text()).expect("body"), r#"{"success":false}"#);
}

#[test]
fn unauthorized_on_login_clears_without_navigation() {
    let gw = gateway(vec![Ok(MockResponse::new(401, ""))], "/login", Some(USER));
    block_on(gw.fetch("login", FetchOptions::post())).expect("fetch");
    assert_eq!(gw.session().state(), SessionState::Absent);
    assert!(gw.navigator().redirects().is_empty());
}

#[test]
fn unauthorized_on_register_does_not_navigate() {
    let gw = gateway(vec![Ok(MockResponse::new(401, ""))], "/register", None);
    block_on(gw.fetch("register", FetchOptions::post())).expect("fetch");
    assert!(gw.navigator().redirects().is_empty());
}

#[test]
fn concurrent_unauthorized_responses_are_idempotent() {
    let gw = gateway(
        vec![Ok(MockResponse::new(401, "")), Ok(MockResponse::new(401, ""))],
        "/detect",
        Some(USER),
    );
    let (a, b) = block_on(join(gw.fetch("detect/history", FetchOptions::get()), gw.fetch("news", FetchOptions::get())));
    assert_eq!(a.expect("a").status(), 401);
    assert_eq!(b.expect("b").status(), 401);
    assert_eq!(gw.session().state(), SessionState::Absent);
    // The first redirect moves the page to /login, so the second is suppressed.
    assert_eq!(gw.navigator().redirects(), vec!["/login".to_owned()]);
}

#[test]
fn unauthorized_without_session_still_redirects() {
    let gw = gateway(vec![Ok(MockResponse::new(401, ""))], "/orders", None);
    block_on(gw.fetch("orders", FetchOptions::get())).expect("fetch");
    assert_eq!(gw.navigator().redirects(), vec!["/login".to_owned()]);
}

#[test]
fn api_url_matches_config() {
    let gw = gateway(vec![], "/", None);
    assert_eq!(gw.api_url("foo"), gw.api_url("/foo"));
    assert_eq!(gw.config().origin(), "https://api.test");
}
