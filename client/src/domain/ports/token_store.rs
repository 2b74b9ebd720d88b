//! Driven port for persisting the session token.
//!
//! The token is the only persisted credential. Its storage format belongs to
//! the adapter; the domain only loads, saves, and clears it.

use std::sync::{Mutex, PoisonError};

use crate::domain::SessionToken;

/// Port for the opaque credential store.
#[cfg_attr(test, mockall::automock)]
pub trait TokenStore: Send + Sync {
    /// Return the stored token, if any.
    fn load(&self) -> Option<SessionToken>;

    /// Replace the stored token.
    fn save(&self, token: SessionToken);

    /// Forget the stored token.
    fn clear(&self);
}

/// Process-local token store; the token does not survive a restart.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    token: Mutex<Option<SessionToken>>,
}

impl TokenStore for InMemoryTokenStore {
    fn load(&self) -> Option<SessionToken> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, token: SessionToken) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    fn clear(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
