//! Generic domain store owning one resource's canonical state.
//!
//! A [`ResourceStore`] wraps four lifecycle machines (fetch list, fetch by
//! id, create, edit), the canonical list, and the detail slot. State lives
//! in a `tokio::sync::watch` channel so every transition is observable, and
//! is mutated only by the store's own dispatches.
//!
//! Completion handling follows one path for every action:
//!
//! 1. issue an [`InvocationId`] and move the action to `loading`;
//! 2. await the gateway call;
//! 3. if the caller's token or the session's root token fired, leave
//!    canonical state untouched and return [`ActionError::Cancelled`];
//! 4. on failure, record the normalised message and return it;
//! 5. on success, consult the [`MutationOrdering`] and apply the merge rule.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::ports::{
    ActionKind, RemoteError, ResourceDispatch, ResourceGateway, ResourceSelectors,
};
use crate::domain::resources::{
    Attendance, Expense, Resource, SaleSheet, Shop, WarehousePayment,
};
use crate::domain::{
    ActionError, ActionResult, Actor, EntityId, FailureMode, InvocationCounter, InvocationId,
    RequestState, RequestStatus, SessionContext, visibility,
};

mod merge;
mod ordering;

use merge::Insertion;
pub use ordering::MutationOrdering;
use ordering::{StampLedger, StampTarget};

/// Behaviour switches shared by every store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreSettings {
    /// Status an action takes after a failed completion.
    pub failure_mode: FailureMode,
    /// Treatment of completions that resolve out of order.
    pub ordering: MutationOrdering,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingError {
    action: ActionKind,
    message: String,
}

/// Observable state of one resource store.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<R: Resource> {
    items: Vec<R>,
    detail: Option<R>,
    error: Option<PendingError>,
    fetch_list: RequestState<Vec<R>>,
    fetch_by_id: RequestState<R>,
    create: RequestState<R>,
    edit: RequestState<R>,
    ledger: StampLedger,
}

impl<R: Resource> Default for ResourceState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            detail: None,
            error: None,
            fetch_list: RequestState::default(),
            fetch_by_id: RequestState::default(),
            create: RequestState::default(),
            edit: RequestState::default(),
            ledger: StampLedger::default(),
        }
    }
}

impl<R: Resource> ResourceState<R> {
    /// Canonical list in application order.
    pub fn items(&self) -> &[R] {
        &self.items
    }

    /// Entity held in the detail slot.
    pub fn detail(&self) -> Option<&R> {
        self.detail.as_ref()
    }

    /// Pending store-level error.
    pub fn error(&self) -> Option<&str> {
        self.error.as_ref().map(|pending| pending.message.as_str())
    }

    /// Status of one action.
    pub fn status(&self, action: ActionKind) -> RequestStatus {
        match action {
            ActionKind::FetchList => self.fetch_list.status(),
            ActionKind::FetchById => self.fetch_by_id.status(),
            ActionKind::Create => self.create.status(),
            ActionKind::Edit => self.edit.status(),
        }
    }

    /// Lifecycle of the fetch-list action.
    pub fn fetch_list_request(&self) -> &RequestState<Vec<R>> {
        &self.fetch_list
    }

    /// Lifecycle of the fetch-by-id action.
    pub fn fetch_by_id_request(&self) -> &RequestState<R> {
        &self.fetch_by_id
    }

    /// Lifecycle of the create action.
    pub fn create_request(&self) -> &RequestState<R> {
        &self.create
    }

    /// Lifecycle of the edit action.
    pub fn edit_request(&self) -> &RequestState<R> {
        &self.edit
    }

    fn take_error(&mut self) -> Option<String> {
        self.fetch_list.take_error();
        self.fetch_by_id.take_error();
        self.create.take_error();
        self.edit.take_error();
        self.error.take().map(|pending| pending.message)
    }
}

type Slot<R, T> = fn(&mut ResourceState<R>) -> &mut RequestState<T>;

const fn fetch_list_slot<R: Resource>(state: &mut ResourceState<R>) -> &mut RequestState<Vec<R>> {
    &mut state.fetch_list
}

const fn fetch_by_id_slot<R: Resource>(state: &mut ResourceState<R>) -> &mut RequestState<R> {
    &mut state.fetch_by_id
}

const fn create_slot<R: Resource>(state: &mut ResourceState<R>) -> &mut RequestState<R> {
    &mut state.create
}

const fn edit_slot<R: Resource>(state: &mut ResourceState<R>) -> &mut RequestState<R> {
    &mut state.edit
}

/// One dispatch in flight: which action, which lifecycle slot, and which
/// ordering target its completion writes to.
struct Dispatch<R: Resource, T> {
    action: ActionKind,
    slot: Slot<R, T>,
    target: Option<StampTarget>,
}

/// Store for resource `R`, backed by gateway `G`.
pub struct ResourceStore<R: Resource, G> {
    gateway: Arc<G>,
    session: SessionContext,
    settings: StoreSettings,
    state: watch::Sender<ResourceState<R>>,
    invocations: InvocationCounter,
}

/// Store of shops.
pub type ShopStore<G> = ResourceStore<Shop, G>;
/// Store of expenses.
pub type ExpenseStore<G> = ResourceStore<Expense, G>;
/// Store of warehouse payments.
pub type WarehousePaymentStore<G> = ResourceStore<WarehousePayment, G>;
/// Store of attendance records.
pub type AttendanceStore<G> = ResourceStore<Attendance, G>;
/// Store of sale sheets.
pub type SaleSheetStore<G> = ResourceStore<SaleSheet, G>;

impl<R, G> ResourceStore<R, G>
where
    R: Resource,
    G: ResourceGateway<R>,
{
    /// Create an empty store.
    pub fn new(gateway: Arc<G>, session: SessionContext, settings: StoreSettings) -> Self {
        let (state, _) = watch::channel(ResourceState::default());
        Self {
            gateway,
            session,
            settings,
            state,
            invocations: InvocationCounter::default(),
        }
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> ResourceState<R> {
        self.state.borrow().clone()
    }

    /// Forget canonical state and every request state.
    pub fn reset(&self) {
        self.state.send_replace(ResourceState::default());
        debug!(resource = %R::KIND, "store reset");
    }

    async fn run<T, F, A>(
        &self,
        dispatch: Dispatch<R, T>,
        cancel: &CancellationToken,
        call: F,
        apply: A,
    ) -> ActionResult<T>
    where
        T: Clone,
        F: Future<Output = Result<T, RemoteError>>,
        A: FnOnce(&mut ResourceState<R>, &T),
    {
        let Dispatch {
            action,
            slot,
            target,
        } = dispatch;
        let session_cancel = self.session.cancellation();
        let invocation = self.invocations.next();
        self.state.send_modify(|state| slot(state).begin(invocation));
        debug!(resource = %R::KIND, %action, %invocation, "dispatch started");

        let outcome = call.await;

        if cancel.is_cancelled() || session_cancel.is_cancelled() {
            self.state.send_modify(|state| slot(state).abandon(invocation));
            warn!(resource = %R::KIND, %action, %invocation, "discarded cancelled completion");
            return Err(ActionError::Cancelled);
        }

        match outcome {
            Ok(value) => self.settle_success(action, slot, target, invocation, value, apply),
            Err(source) => Err(self.settle_failure(action, slot, invocation, source)),
        }
    }

    fn settle_success<T, A>(
        &self,
        action: ActionKind,
        slot: Slot<R, T>,
        target: Option<StampTarget>,
        invocation: InvocationId,
        value: T,
        apply: A,
    ) -> ActionResult<T>
    where
        T: Clone,
        A: FnOnce(&mut ResourceState<R>, &T),
    {
        let ordering = self.settings.ordering;
        let mut admitted = true;
        self.state.send_modify(|state| {
            if let Some(stamp) = target {
                admitted = state.ledger.admit(ordering, stamp, invocation);
            }
            if !admitted {
                slot(state).abandon(invocation);
                return;
            }
            apply(state, &value);
            slot(state).succeed(value.clone());
            if state
                .error
                .as_ref()
                .is_some_and(|pending| pending.action == action)
            {
                state.error = None;
            }
        });

        if admitted {
            debug!(resource = %R::KIND, %action, %invocation, "dispatch succeeded");
            Ok(value)
        } else {
            warn!(resource = %R::KIND, %action, %invocation, "discarded stale completion");
            Err(ActionError::Stale {
                operation: action.as_str(),
            })
        }
    }

    fn settle_failure<T>(
        &self,
        action: ActionKind,
        slot: Slot<R, T>,
        invocation: InvocationId,
        source: RemoteError,
    ) -> ActionError {
        warn!(
            resource = %R::KIND,
            %action,
            %invocation,
            error = %source,
            "dispatch failed"
        );
        let error = ActionError::remote(source);
        let message = error.user_message();
        let mode = self.settings.failure_mode;
        self.state.send_modify(|state| {
            slot(state).fail(message.clone(), mode);
            state.error = Some(PendingError { action, message });
        });
        error
    }
}

impl<R, G> ResourceSelectors<R> for ResourceStore<R, G>
where
    R: Resource,
    G: ResourceGateway<R>,
{
    fn items(&self) -> Vec<R> {
        self.state.borrow().items.clone()
    }

    fn detail(&self) -> Option<R> {
        self.state.borrow().detail.clone()
    }

    fn status(&self, action: ActionKind) -> RequestStatus {
        self.state.borrow().status(action)
    }

    fn error(&self) -> Option<String> {
        self.state.borrow().error().map(str::to_owned)
    }

    fn visible_items(&self, actor: &Actor) -> Vec<R> {
        visibility::visible(&self.state.borrow().items, actor)
    }

    fn subscribe(&self) -> watch::Receiver<ResourceState<R>> {
        self.state.subscribe()
    }
}

#[async_trait]
impl<R, G> ResourceDispatch<R> for ResourceStore<R, G>
where
    R: Resource,
    G: ResourceGateway<R> + 'static,
{
    async fn fetch_list(&self, cancel: &CancellationToken) -> ActionResult<Vec<R>> {
        let dispatch = Dispatch {
            action: ActionKind::FetchList,
            slot: fetch_list_slot,
            target: Some(StampTarget::List),
        };
        self.run(dispatch, cancel, self.gateway.list(), |state, fetched| {
            let outcome = merge::replace_list(&mut state.items, fetched.clone());
            if !outcome.duplicates.is_empty() {
                warn!(
                    resource = %R::KIND,
                    duplicates = ?outcome.duplicates,
                    "fetched list repeated ids; kept first occurrences"
                );
            }
        })
        .await
    }

    async fn fetch_by_id(&self, id: EntityId, cancel: &CancellationToken) -> ActionResult<R> {
        let dispatch = Dispatch {
            action: ActionKind::FetchById,
            slot: fetch_by_id_slot,
            target: Some(StampTarget::Entity(id)),
        };
        self.run(dispatch, cancel, self.gateway.get(id), |state, entity| {
            state.detail = Some(entity.clone());
        })
        .await
    }

    async fn create(&self, draft: R::Draft, cancel: &CancellationToken) -> ActionResult<R> {
        let dispatch = Dispatch {
            action: ActionKind::Create,
            slot: create_slot,
            target: None,
        };
        self.run(dispatch, cancel, self.gateway.create(&draft), |state, created| {
            if merge::append_created(&mut state.items, created.clone()) == Insertion::Replaced {
                warn!(
                    resource = %R::KIND,
                    id = %created.id(),
                    "created entity collided with an existing id; replaced in place"
                );
            }
        })
        .await
    }

    async fn edit(
        &self,
        id: EntityId,
        patch: R::Patch,
        cancel: &CancellationToken,
    ) -> ActionResult<R> {
        let dispatch = Dispatch {
            action: ActionKind::Edit,
            slot: edit_slot,
            target: Some(StampTarget::Entity(id)),
        };
        self.run(dispatch, cancel, self.gateway.edit(id, &patch), |state, edited| {
            if !merge::replace_edited(&mut state.items, id, edited) {
                debug!(resource = %R::KIND, %id, "edited entity is not in the list");
            }
            merge::sync_detail(&mut state.detail, id, edited);
        })
        .await
    }

    fn acknowledge_error(&self) -> Option<String> {
        let mut taken = None;
        self.state.send_if_modified(|state| {
            taken = state.take_error();
            taken.is_some()
        });
        taken
    }
}
