//! Login/logout calls and their session-record side effects.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend answers with a `{ success, message, data }` envelope. A
//! successful login stores `data` as the session record that the navigation
//! guard reads; logout clears it whether or not the server call succeeds.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::api::{ApiError, ApiGateway, FetchOptions, HttpResponse, PageNavigator, Transport};
use crate::util::session::{SessionError, SessionRecord, SessionStorage};

pub const LOGIN_ENDPOINT: &str = "/login";
pub const LOGOUT_ENDPOINT: &str = "/logout";

/// Standard backend response wrapper.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T: DeserializeOwned> ApiEnvelope<T> {
    /// # Errors
    ///
    /// Returns an error if `body` is not an envelope around `T`.
    pub fn parse(body: &str) -> Result<Self, AuthError> {
        serde_json::from_str(body).map_err(|e| AuthError::Decode(e.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("{0}")]
    Rejected(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(serde::Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

fn rejection_message(message: String, status: u16) -> String {
    if message.is_empty() {
        format!("login failed: {status}")
    } else {
        message
    }
}

impl<T, S, N> ApiGateway<T, S, N>
where
    T: Transport,
    S: SessionStorage,
    N: PageNavigator,
{
    /// Authenticate with an account id (or phone number) and password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Rejected`] with the server message when the
    /// credentials are refused, or a transport/decode/storage error.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionRecord, AuthError> {
        let options = FetchOptions::post().json(&LoginRequest { username: username.trim(), password })?;
        let resp = self.fetch(LOGIN_ENDPOINT, options).await?;
        let status = resp.status();
        let body = resp.text().await?;

        let envelope = match ApiEnvelope::<SessionRecord>::parse(&body) {
            Ok(envelope) => envelope,
            Err(_) if !(200..300).contains(&status) => {
                return Err(AuthError::Rejected(rejection_message(String::new(), status)));
            }
            Err(e) => return Err(e),
        };
        match envelope {
            ApiEnvelope { success: true, data: Some(record), .. } => {
                self.session().write(&record)?;
                log::info!("logged in as {} ({})", record.username, record.role);
                Ok(record)
            }
            ApiEnvelope { message, .. } => Err(AuthError::Rejected(rejection_message(message, status))),
        }
    }

    /// End the server session and drop the local record.
    ///
    /// # Errors
    ///
    /// Returns the transport error, after the local record is cleared.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let result = self.fetch(LOGOUT_ENDPOINT, FetchOptions::post()).await;
        if let Err(e) = self.session().clear() {
            log::debug!("session clear on logout failed: {e}");
        }
        result.map(|_| ()).map_err(AuthError::from)
    }
}
