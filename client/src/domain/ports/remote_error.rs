//! Failures reported by driven ports that talk to the remote data service.
//!
//! Transport failures and server-reported business errors are both folded
//! into [`RemoteError`]; stores only ever show [`RemoteError::user_message`].

use super::define_port_error;

/// Message shown when no better human-readable text is available.
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Message shown when the service could not be reached at all.
pub const UNREACHABLE_MESSAGE: &str = "Unable to reach the service. Please try again.";

define_port_error! {
    /// Errors surfaced while calling the remote data service.
    pub enum RemoteError {
        /// Network transport failed before a response arrived.
        Transport => "remote transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout => "remote call timed out: {message}",
        /// The session token was missing, expired, or rejected.
        Unauthorized => "remote call unauthorised: {message}",
        /// The service answered with a business error (`success: false`,
        /// an `error` field, or a non-2xx status).
        Rejected => "remote call rejected: {message}",
        /// The response body could not be decoded.
        Decode => "remote response decode failed: {message}",
    }
}

impl RemoteError {
    /// Normalise the error into the single string stored in a store's error
    /// slot.
    ///
    /// Server-provided text is passed through; transport and decode detail is
    /// replaced by a generic message.
    ///
    /// # Examples
    /// ```
    /// use shopdesk::domain::ports::{RemoteError, UNREACHABLE_MESSAGE};
    ///
    /// assert_eq!(RemoteError::rejected("Invalid credentials").user_message(), "Invalid credentials");
    /// assert_eq!(RemoteError::transport("dns failure").user_message(), UNREACHABLE_MESSAGE);
    /// ```
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message } | Self::Unauthorized { message } => {
                non_blank_or_default(message)
            }
            Self::Transport { .. } | Self::Timeout { .. } => UNREACHABLE_MESSAGE.to_owned(),
            Self::Decode { .. } => DEFAULT_ERROR_MESSAGE.to_owned(),
        }
    }
}

fn non_blank_or_default(message: &str) -> String {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        DEFAULT_ERROR_MESSAGE.to_owned()
    } else {
        trimmed.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(RemoteError::rejected("Shop name taken"), "Shop name taken")]
    #[case(RemoteError::rejected("   "), DEFAULT_ERROR_MESSAGE)]
    #[case(RemoteError::unauthorized("Session expired"), "Session expired")]
    #[case(RemoteError::timeout("30s elapsed"), UNREACHABLE_MESSAGE)]
    #[case(RemoteError::transport("connection refused"), UNREACHABLE_MESSAGE)]
    #[case(RemoteError::decode("expected object"), DEFAULT_ERROR_MESSAGE)]
    fn user_message_normalises_every_variant(#[case] error: RemoteError, #[case] expected: &str) {
        assert_eq!(error.user_message(), expected);
    }
}
