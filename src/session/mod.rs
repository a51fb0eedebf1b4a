//! Signed, cookie-backed sessions.
//!
//! Nothing is stored server-side: the cookie carries the user id and an
//! expiry, signed with HMAC-SHA256. Handlers `load` a [`Session`] from the
//! request headers, mutate it, and must include the [`SessionCookie`]
//! returned by `save` in their response for the change to reach the client.

pub mod cookie;

use axum::http::header::InvalidHeaderValue;
use thiserror::Error;

pub use cookie::{SessionCookie, SessionManager};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to encode session payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("session signing key rejected")]
    InvalidKey,

    #[error("session cookie is not a valid header value: {0}")]
    Header(#[from] InvalidHeaderValue),
}

/// Per-request view of the client's session.
#[must_use]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<i64>,
}

impl Session {
    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Bind the session to `user_id`, replacing any previous user.
    pub fn authenticate(&mut self, user_id: i64) {
        self.user_id = Some(user_id);
    }

    /// Drop every value. Saving a cleared session expires the cookie.
    pub fn clear(&mut self) {
        self.user_id = None;
    }
}
