//! Tab-scoped session record storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session record is the client-side proof of login. The navigation guard
//! reads it before every route renders and the API gateway clears it on any
//! unauthorized response. All access goes through [`SessionStore`] so no
//! module touches `sessionStorage` directly.
//!
//! ERROR HANDLING
//! ==============
//! Reads use parse-or-null semantics: malformed stored text is reported as
//! [`SessionState::Malformed`] and never surfaces as an error. Only writes
//! can fail, and callers on the unauthorized path ignore clear failures.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage key holding the JSON-serialized session record.
pub const SESSION_KEY: &str = "user";

/// Role value that unlocks the admin route.
pub const ADMIN_ROLE: &str = "admin";

/// Logged-in user as returned by the login endpoint.
///
/// `role` is the only required field; a stored record without it fails
/// schema validation and counts as malformed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub role: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub user_type: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub phone: String,
    /// Remaining server-provided fields (`createdAt`, ...), kept so a
    /// rewrite does not drop them.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SessionRecord {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// Result of inspecting the stored session.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionState {
    /// Nothing stored (or an empty string).
    Absent,
    /// Text is stored but does not deserialize into a [`SessionRecord`].
    Malformed,
    Present(SessionRecord),
}

impl SessionState {
    /// Parse raw stored text.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => Self::Absent,
            Some(text) => match serde_json::from_str::<SessionRecord>(text) {
                Ok(record) => Self::Present(record),
                Err(e) => {
                    log::debug!("session record rejected: {e}");
                    Self::Malformed
                }
            },
        }
    }

    /// Only a parseable record counts as authenticated.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn record(&self) -> Option<&SessionRecord> {
        match self {
            Self::Present(record) => Some(record),
            Self::Absent | Self::Malformed => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage unavailable")]
    Unavailable,
    #[error("session storage rejected write: {0}")]
    Storage(String),
    #[error("failed to encode session record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Minimal key/value surface of the browser `Storage` object.
pub trait SessionStorage {
    fn get_item(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns an error if the backing storage is unavailable or full.
    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// # Errors
    ///
    /// Returns an error if the backing storage is unavailable.
    fn remove_item(&self, key: &str) -> Result<(), SessionError>;
}

impl<S: SessionStorage + ?Sized> SessionStorage for &S {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), SessionError> {
        (**self).remove_item(key)
    }
}

/// `window.sessionStorage`. Every call re-resolves the storage object, so
/// a missing window simply reads as empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSessionStorage;

#[cfg(feature = "csr")]
fn browser_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.session_storage().ok().flatten())
}

impl SessionStorage for BrowserSessionStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        #[cfg(feature = "csr")]
        {
            browser_storage()?.get_item(key).ok().flatten()
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            None
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError> {
        #[cfg(feature = "csr")]
        {
            let storage = browser_storage().ok_or(SessionError::Unavailable)?;
            storage
                .set_item(key, value)
                .map_err(|e| SessionError::Storage(format!("{e:?}")))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (key, value);
            Err(SessionError::Unavailable)
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), SessionError> {
        #[cfg(feature = "csr")]
        {
            let storage = browser_storage().ok_or(SessionError::Unavailable)?;
            storage
                .remove_item(key)
                .map_err(|e| SessionError::Storage(format!("{e:?}")))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            Err(SessionError::Unavailable)
        }
    }
}

/// In-memory storage used off-browser and in tests.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with raw text under [`SESSION_KEY`].
    pub fn with_raw(raw: &str) -> Self {
        let storage = Self::new();
        storage.items.borrow_mut().insert(SESSION_KEY.to_owned(), raw.to_owned());
        storage
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), SessionError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Typed access to the session record under [`SESSION_KEY`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: SessionStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn state(&self) -> SessionState {
        SessionState::from_raw(self.storage.get_item(SESSION_KEY).as_deref())
    }

    /// Current record, or `None` when absent or malformed.
    pub fn read(&self) -> Option<SessionRecord> {
        match self.state() {
            SessionState::Present(record) => Some(record),
            SessionState::Absent | SessionState::Malformed => None,
        }
    }

    /// # Errors
    ///
    /// Returns an error if the record cannot be encoded or stored.
    pub fn write(&self, record: &SessionRecord) -> Result<(), SessionError> {
        let raw = serde_json::to_string(record)?;
        self.storage.set_item(SESSION_KEY, &raw)
    }

    /// Remove the record. Clearing an absent record is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage is unavailable.
    pub fn clear(&self) -> Result<(), SessionError> {
        self.storage.remove_item(SESSION_KEY)
    }
}

/// Session store over the current tab's `sessionStorage`.
pub fn browser_session() -> SessionStore<BrowserSessionStorage> {
    SessionStore::new(BrowserSessionStorage)
}
