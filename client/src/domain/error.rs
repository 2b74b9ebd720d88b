//! Errors returned directly to the caller of a store dispatch.
//!
//! Every dispatch resolves to an [`ActionResult`]; nothing escapes a store as
//! a panic. The same failure is also recorded in the store's error slot so
//! presentation code that only reads selectors still sees it once.

use crate::domain::ports::RemoteError;

/// Result of one store dispatch.
pub type ActionResult<T> = Result<T, ActionError>;

/// Why a dispatch did not change canonical state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// The remote call failed; `message` is the normalised display text.
    #[error("{message}")]
    Remote {
        /// Normalised display message, as stored in the error slot.
        message: String,
        /// Underlying port error.
        #[source]
        source: RemoteError,
    },
    /// The invocation's cancellation token fired before its result was
    /// applied.
    #[error("the request was cancelled before its result was applied")]
    Cancelled,
    /// A newer response for the same target had already been applied.
    #[error("a newer {operation} response was already applied")]
    Stale {
        /// Operation whose response was discarded.
        operation: &'static str,
    },
    /// The dispatch needs an authenticated actor and there is none.
    #[error("no actor is signed in")]
    NotAuthenticated,
}

impl ActionError {
    /// Wrap a port error, normalising its display message.
    pub fn remote(source: RemoteError) -> Self {
        Self::Remote {
            message: source.user_message(),
            source,
        }
    }

    /// Display text suitable for presentation.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Whether the dispatch reached the service and was refused or failed.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_errors_display_the_normalised_message() {
        let error = ActionError::remote(RemoteError::rejected("Invalid credentials"));
        assert_eq!(error.user_message(), "Invalid credentials");
        assert!(error.is_remote());
    }

    #[test]
    fn stale_errors_name_the_operation() {
        let error = ActionError::Stale { operation: "edit" };
        assert_eq!(error.to_string(), "a newer edit response was already applied");
        assert!(!error.is_remote());
    }
}
