//! Ordering policy for overlapping completions within one store.

use std::collections::HashMap;

use crate::domain::{EntityId, InvocationId};

/// How a store treats a completion that resolves after a newer one for the
/// same target has already been applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MutationOrdering {
    /// Apply completions in the order they resolve; the last to resolve wins.
    #[default]
    LastResolvedWins,
    /// Discard completions older than the newest already applied to the same
    /// entity (or to the list).
    RejectStale,
}

/// What a completion writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum StampTarget {
    /// The canonical list as a whole.
    List,
    /// One entity, shared by the detail slot and its list element.
    Entity(EntityId),
}

/// Newest applied invocation per target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct StampLedger {
    applied: HashMap<StampTarget, InvocationId>,
}

impl StampLedger {
    /// Record `invocation` for `target` unless a newer one was applied.
    ///
    /// Returns `false` when the completion is stale. Under
    /// [`MutationOrdering::LastResolvedWins`] every completion is admitted
    /// and nothing is recorded.
    pub(crate) fn admit(
        &mut self,
        ordering: MutationOrdering,
        target: StampTarget,
        invocation: InvocationId,
    ) -> bool {
        if ordering != MutationOrdering::RejectStale {
            return true;
        }
        if self
            .applied
            .get(&target)
            .is_some_and(|newest| *newest > invocation)
        {
            return false;
        }
        self.applied.insert(target, invocation);
        true
    }
}
