//! The request lifecycle machine behind every asynchronous store action.
//!
//! ```text
//! idle ──begin──▶ loading ──succeed──▶ succeeded ──begin──▶ loading …
//!                    │
//!                    ├──fail──▶ idle (or failed, see FailureMode) + error
//!                    └──abandon──▶ idle (cancelled or stale, no error)
//! ```
//!
//! One [`RequestState`] exists per action per store and is never shared
//! across unrelated actions. Overlapping invocations are not de-duplicated:
//! whichever completes last decides the final status. Abandoning is the one
//! exception, since a discarded completion only releases `loading` when it
//! belongs to the most recently issued invocation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Observable status of one action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RequestStatus {
    /// Never attempted, or settled without a retained outcome.
    #[default]
    Idle,
    /// A call is in flight.
    Loading,
    /// The most recent completion succeeded.
    Succeeded,
    /// The most recent completion failed and [`FailureMode::Retain`] is set.
    Failed,
}

impl RequestStatus {
    /// Stable lowercase name used in logs and rendered output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status an action takes after a failed completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// Return to `idle`; only the error slot records the failure.
    #[default]
    ResetToIdle,
    /// Move to `failed` until the next invocation.
    Retain,
}

/// Monotonic stamp identifying one invocation within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InvocationId(u64);

impl InvocationId {
    /// Raw sequence number.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source of strictly increasing [`InvocationId`]s.
#[derive(Debug, Default)]
pub struct InvocationCounter(AtomicU64);

impl InvocationCounter {
    /// Issue the next stamp.
    pub fn next(&self) -> InvocationId {
        InvocationId(self.0.fetch_add(1, Ordering::Relaxed).saturating_add(1))
    }
}

/// State of one action: status, pending error, and the retained payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestState<T> {
    status: RequestStatus,
    error: Option<String>,
    last_result: Option<T>,
    last_invocation: Option<InvocationId>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            status: RequestStatus::Idle,
            error: None,
            last_result: None,
            last_invocation: None,
        }
    }
}

impl<T> RequestState<T> {
    /// Current status.
    pub fn status(&self) -> RequestStatus {
        self.status
    }

    /// Pending, unacknowledged error message.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Payload of the most recent successful completion.
    pub fn last_result(&self) -> Option<&T> {
        self.last_result.as_ref()
    }

    /// Stamp of the most recently issued invocation.
    pub fn last_invocation(&self) -> Option<InvocationId> {
        self.last_invocation
    }

    /// Whether a call is in flight.
    pub fn is_loading(&self) -> bool {
        self.status == RequestStatus::Loading
    }

    /// `idle|succeeded|failed → loading`. A pending error stays until it is
    /// acknowledged or a later call succeeds.
    pub fn begin(&mut self, invocation: InvocationId) {
        self.status = RequestStatus::Loading;
        self.last_invocation = Some(invocation);
    }

    /// `loading → succeeded`, clearing the error and retaining the payload.
    pub fn succeed(&mut self, payload: T) {
        self.status = RequestStatus::Succeeded;
        self.error = None;
        self.last_result = Some(payload);
    }

    /// `loading → idle|failed` with `message` recorded.
    pub fn fail(&mut self, message: impl Into<String>, mode: FailureMode) {
        self.status = match mode {
            FailureMode::ResetToIdle => RequestStatus::Idle,
            FailureMode::Retain => RequestStatus::Failed,
        };
        self.error = Some(message.into());
    }

    /// `loading → idle` without an error, for discarded completions.
    ///
    /// A no-op unless `invocation` is the latest one issued; an older call
    /// being dropped must not hide a newer call that is still in flight.
    pub fn abandon(&mut self, invocation: InvocationId) {
        if self.status == RequestStatus::Loading && self.last_invocation == Some(invocation) {
            self.status = RequestStatus::Idle;
        }
    }

    /// Consume the pending error so it surfaces exactly once.
    pub fn take_error(&mut self) -> Option<String> {
        self.error.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn counter() -> InvocationCounter {
        InvocationCounter::default()
    }

    #[rstest]
    fn stamps_increase_strictly(counter: InvocationCounter) {
        let first = counter.next();
        let second = counter.next();
        assert!(second > first);
        assert_eq!(first.get(), 1);
    }

    #[rstest]
    fn success_clears_error_and_retains_payload(counter: InvocationCounter) {
        let mut state = RequestState::<u32>::default();
        state.begin(counter.next());
        state.fail("offline", FailureMode::ResetToIdle);
        state.begin(counter.next());
        assert!(state.is_loading());
        assert_eq!(state.error(), Some("offline"));

        state.succeed(7);

        assert_eq!(state.status(), RequestStatus::Succeeded);
        assert_eq!(state.error(), None);
        assert_eq!(state.last_result(), Some(&7));
    }

    #[rstest]
    #[case(FailureMode::ResetToIdle, RequestStatus::Idle)]
    #[case(FailureMode::Retain, RequestStatus::Failed)]
    fn failure_status_follows_mode(
        counter: InvocationCounter,
        #[case] mode: FailureMode,
        #[case] expected: RequestStatus,
    ) {
        let mut state = RequestState::<u32>::default();
        state.begin(counter.next());
        state.fail("Invalid credentials", mode);

        assert_eq!(state.status(), expected);
        assert_eq!(state.error(), Some("Invalid credentials"));
        assert_eq!(state.last_result(), None);
    }

    #[rstest]
    fn errors_surface_exactly_once(counter: InvocationCounter) {
        let mut state = RequestState::<u32>::default();
        state.begin(counter.next());
        state.fail("boom", FailureMode::ResetToIdle);

        assert_eq!(state.take_error().as_deref(), Some("boom"));
        assert_eq!(state.take_error(), None);
    }

    #[rstest]
    fn abandon_only_leaves_loading(counter: InvocationCounter) {
        let mut state = RequestState::<u32>::default();
        let first = counter.next();
        state.begin(first);
        state.succeed(1);
        state.abandon(first);
        assert_eq!(state.status(), RequestStatus::Succeeded);

        let second = counter.next();
        state.begin(second);
        state.abandon(second);
        assert_eq!(state.status(), RequestStatus::Idle);
        assert_eq!(state.error(), None);
    }

    #[rstest]
    fn abandoning_an_older_call_keeps_the_newer_one_loading(counter: InvocationCounter) {
        let mut state = RequestState::<u32>::default();
        let older = counter.next();
        let newer = counter.next();
        state.begin(older);
        state.begin(newer);

        state.abandon(older);
        assert!(state.is_loading());

        state.abandon(newer);
        assert_eq!(state.status(), RequestStatus::Idle);
    }
}
