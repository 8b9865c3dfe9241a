//! Networking modules for the backend REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `config` fixes the API base URL for the page lifetime, `api` is the single
//! dispatch point with the unauthorized interceptor, `auth` layers login and
//! logout on top, and `query` holds the URL encoders both `api` and the map
//! loader use.

pub mod api;
pub mod auth;
pub mod config;
#[cfg(test)]
pub(crate) mod mock;
pub mod query;
