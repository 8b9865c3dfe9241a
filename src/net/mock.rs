//! In-memory doubles for the gateway's browser seams.

use std::cell::RefCell;
use std::collections::VecDeque;

use super::api::{ApiError, HttpResponse, PageNavigator, RequestInit, Transport};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
}

impl MockResponse {
    pub fn new(status: u16, body: &str) -> Self {
        Self { status, body: body.to_owned() }
    }
}

impl HttpResponse for MockResponse {
    fn status(&self) -> u16 {
        self.status
    }

    async fn text(self) -> Result<String, ApiError> {
        Ok(self.body)
    }
}

/// Replays queued responses (default `200` with empty body) and records
/// every request it receives.
#[derive(Debug, Default)]
pub struct MockTransport {
    queued: RefCell<VecDeque<Result<MockResponse, ApiError>>>,
    sent: RefCell<Vec<(String, RequestInit)>>,
}

impl MockTransport {
    pub fn replying(responses: Vec<Result<MockResponse, ApiError>>) -> Self {
        Self { queued: RefCell::new(responses.into()), sent: RefCell::default() }
    }

    pub fn sent(&self) -> Vec<(String, RequestInit)> {
        self.sent.borrow().clone()
    }
}

impl Transport for MockTransport {
    type Response = MockResponse;

    async fn send(&self, url: &str, init: RequestInit) -> Result<MockResponse, ApiError> {
        self.sent.borrow_mut().push((url.to_owned(), init));
        self.queued
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(MockResponse::new(200, "")))
    }
}

/// Tracks the current path; a redirect moves it.
#[derive(Debug, Default)]
pub struct MockNavigator {
    path: RefCell<String>,
    redirects: RefCell<Vec<String>>,
}

impl MockNavigator {
    pub fn at(path: &str) -> Self {
        Self { path: RefCell::new(path.to_owned()), redirects: RefCell::default() }
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.borrow().clone()
    }
}

impl PageNavigator for MockNavigator {
    fn current_path(&self) -> String {
        self.path.borrow().clone()
    }

    fn redirect(&self, path: &str) {
        self.redirects.borrow_mut().push(path.to_owned());
        *self.path.borrow_mut() = path.to_owned();
    }
}
