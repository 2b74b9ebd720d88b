//! Driving ports: the read/write contract presentation code holds against a
//! resource store.
//!
//! Selectors are synchronous and return owned copies; dispatches are async,
//! take a cancellation token, and report their outcome directly.

use std::fmt;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::domain::resources::Resource;
use crate::domain::store::ResourceState;
use crate::domain::{ActionResult, Actor, EntityId, RequestStatus};

/// The four asynchronous actions every resource store exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Replace the canonical list.
    FetchList,
    /// Load the detail slot.
    FetchById,
    /// Append a confirmed entity.
    Create,
    /// Replace an entity in place.
    Edit,
}

impl ActionKind {
    /// Stable lowercase name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FetchList => "fetch_list",
            Self::FetchById => "fetch_by_id",
            Self::Create => "create",
            Self::Edit => "edit",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read side of a resource store.
pub trait ResourceSelectors<R: Resource>: Send + Sync {
    /// Canonical list in application order.
    fn items(&self) -> Vec<R>;

    /// Entity held in the detail slot.
    fn detail(&self) -> Option<R>;

    /// Status of one action.
    fn status(&self, action: ActionKind) -> RequestStatus;

    /// Pending, unacknowledged error message.
    fn error(&self) -> Option<String>;

    /// Canonical list restricted to what `actor` may see.
    fn visible_items(&self, actor: &Actor) -> Vec<R>;

    /// Observe every state transition.
    fn subscribe(&self) -> watch::Receiver<ResourceState<R>>;
}

/// Write side of a resource store.
#[async_trait]
pub trait ResourceDispatch<R: Resource>: Send + Sync {
    /// Replace the canonical list with the server's list.
    async fn fetch_list(&self, cancel: &CancellationToken) -> ActionResult<Vec<R>>;

    /// Load one entity into the detail slot.
    async fn fetch_by_id(&self, id: EntityId, cancel: &CancellationToken) -> ActionResult<R>;

    /// Create an entity and append the confirmed record.
    async fn create(&self, draft: R::Draft, cancel: &CancellationToken) -> ActionResult<R>;

    /// Edit an entity and replace it in the list and detail slot.
    async fn edit(
        &self,
        id: EntityId,
        patch: R::Patch,
        cancel: &CancellationToken,
    ) -> ActionResult<R>;

    /// Consume the pending error so presentation shows it once.
    fn acknowledge_error(&self) -> Option<String>;
}
