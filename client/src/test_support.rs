//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`).
//!
//! Only compiled for tests or with the `test-support` feature.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, Utc};
use mockable::Clock;
use tokio::sync::oneshot;

use crate::domain::ports::{
    AuthGateway, LoginGrant, RemoteError, ResourceGateway, ShopMetricsQuery,
};
use crate::domain::resources::{Resource, Shop};
use crate::domain::{Actor, Amount, EntityId, LoginCredentials, Role};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Build an id, panicking on zero. Test input only.
///
/// # Panics
/// Panics when `raw` is zero.
pub fn id(raw: u64) -> EntityId {
    match EntityId::new(raw) {
        Ok(id) => id,
        Err(error) => panic!("test id {raw}: {error}"),
    }
}

/// A shop with an empty address.
pub fn shop(raw: u64, name: &str) -> Shop {
    Shop {
        id: id(raw),
        name: name.to_owned(),
        address: String::new(),
        phone: None,
    }
}

/// An actor with the given role and assignment.
pub fn actor(raw: u64, role: Role, assigned: &[u64]) -> Actor {
    Actor::new(
        id(raw),
        format!("actor-{raw}"),
        format!("actor-{raw}@example.com"),
        role,
        assigned.iter().copied().map(id),
    )
}

/// One call observed by a scripted gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// `list()`.
    List,
    /// `get(id)`.
    Get(EntityId),
    /// `create(draft)`.
    Create,
    /// `edit(id, patch)`.
    Edit(EntityId),
}

enum Reply<T> {
    Ready(Result<T, RemoteError>),
    Deferred(oneshot::Receiver<Result<T, RemoteError>>),
}

impl<T> Reply<T> {
    async fn resolve(self) -> Result<T, RemoteError> {
        match self {
            Self::Ready(outcome) => outcome,
            Self::Deferred(receiver) => receiver
                .await
                .unwrap_or_else(|_| Err(RemoteError::transport("scripted reply dropped"))),
        }
    }
}

/// Resource gateway answering from a script, in call order.
///
/// List replies and entity replies are queued separately. Deferred replies
/// resolve only when the test sends on the returned channel, which lets a
/// test choose the completion order of overlapping calls.
pub struct ScriptedResourceGateway<R: Resource> {
    lists: Mutex<VecDeque<Reply<Vec<R>>>>,
    entities: Mutex<VecDeque<Reply<R>>>,
    calls: Mutex<Vec<GatewayCall>>,
}

impl<R: Resource> Default for ScriptedResourceGateway<R> {
    fn default() -> Self {
        Self {
            lists: Mutex::new(VecDeque::new()),
            entities: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl<R: Resource> ScriptedResourceGateway<R> {
    /// Create a gateway with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an immediate reply for the next `list()`.
    pub fn push_list(&self, outcome: Result<Vec<R>, RemoteError>) {
        lock(&self.lists).push_back(Reply::Ready(outcome));
    }

    /// Queue an immediate reply for the next `get`, `create`, or `edit`.
    pub fn push_entity(&self, outcome: Result<R, RemoteError>) {
        lock(&self.entities).push_back(Reply::Ready(outcome));
    }

    /// Queue a `list()` reply resolved through the returned sender.
    pub fn defer_list(&self) -> oneshot::Sender<Result<Vec<R>, RemoteError>> {
        let (sender, receiver) = oneshot::channel();
        lock(&self.lists).push_back(Reply::Deferred(receiver));
        sender
    }

    /// Queue an entity reply resolved through the returned sender.
    pub fn defer_entity(&self) -> oneshot::Sender<Result<R, RemoteError>> {
        let (sender, receiver) = oneshot::channel();
        lock(&self.entities).push_back(Reply::Deferred(receiver));
        sender
    }

    /// Calls observed so far, in order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        lock(&self.calls).clone()
    }

    fn next_list(&self, call: GatewayCall) -> Reply<Vec<R>> {
        lock(&self.calls).push(call);
        lock(&self.lists)
            .pop_front()
            .unwrap_or_else(|| Reply::Ready(Err(RemoteError::transport("no scripted list reply"))))
    }

    fn next_entity(&self, call: GatewayCall) -> Reply<R> {
        lock(&self.calls).push(call);
        lock(&self.entities)
            .pop_front()
            .unwrap_or_else(|| Reply::Ready(Err(RemoteError::transport("no scripted entity reply"))))
    }
}

#[async_trait]
impl<R: Resource> ResourceGateway<R> for ScriptedResourceGateway<R> {
    async fn list(&self) -> Result<Vec<R>, RemoteError> {
        self.next_list(GatewayCall::List).resolve().await
    }

    async fn get(&self, id: EntityId) -> Result<R, RemoteError> {
        self.next_entity(GatewayCall::Get(id)).resolve().await
    }

    async fn create(&self, _draft: &R::Draft) -> Result<R, RemoteError> {
        self.next_entity(GatewayCall::Create).resolve().await
    }

    async fn edit(&self, id: EntityId, _patch: &R::Patch) -> Result<R, RemoteError> {
        self.next_entity(GatewayCall::Edit(id)).resolve().await
    }
}

/// Authentication gateway answering from fixed replies.
#[derive(Default)]
pub struct StubAuthGateway {
    logins: Mutex<VecDeque<Result<LoginGrant, RemoteError>>>,
    profile: Mutex<Option<Result<Actor, RemoteError>>>,
    directory: Mutex<Vec<Actor>>,
}

impl StubAuthGateway {
    /// Create a gateway that rejects every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next login.
    pub fn push_login(&self, outcome: Result<LoginGrant, RemoteError>) {
        lock(&self.logins).push_back(outcome);
    }

    /// Set the profile returned by `current_actor`.
    pub fn set_profile(&self, outcome: Result<Actor, RemoteError>) {
        *lock(&self.profile) = Some(outcome);
    }

    /// Set the directory returned by `list_actors`.
    pub fn set_directory(&self, actors: Vec<Actor>) {
        *lock(&self.directory) = actors;
    }
}

#[async_trait]
impl AuthGateway for StubAuthGateway {
    async fn login(&self, _credentials: &LoginCredentials) -> Result<LoginGrant, RemoteError> {
        lock(&self.logins)
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::rejected("Invalid credentials")))
    }

    async fn current_actor(&self) -> Result<Actor, RemoteError> {
        lock(&self.profile)
            .clone()
            .unwrap_or_else(|| Err(RemoteError::unauthorized("no profile scripted")))
    }

    async fn list_actors(&self, role: Option<Role>) -> Result<Vec<Actor>, RemoteError> {
        Ok(lock(&self.directory)
            .iter()
            .filter(|actor| role.is_none_or(|wanted| actor.role() == wanted))
            .cloned()
            .collect())
    }
}

/// Per-shop metric replies; unscripted shops fail with a transport error.
#[derive(Default)]
pub struct StubShopMetricsQuery {
    expenses: Mutex<HashMap<EntityId, Result<Amount, RemoteError>>>,
    sales: Mutex<HashMap<EntityId, Result<Amount, RemoteError>>>,
    requested_dates: Mutex<Vec<NaiveDate>>,
}

impl StubShopMetricsQuery {
    /// Create an empty stub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the expense total for `shop_id`.
    pub fn set_expense(&self, shop_id: EntityId, outcome: Result<Amount, RemoteError>) {
        lock(&self.expenses).insert(shop_id, outcome);
    }

    /// Script the latest sale for `shop_id`.
    pub fn set_sale(&self, shop_id: EntityId, outcome: Result<Amount, RemoteError>) {
        lock(&self.sales).insert(shop_id, outcome);
    }

    /// Sale dates passed to `expense_total`, in call order.
    pub fn requested_dates(&self) -> Vec<NaiveDate> {
        lock(&self.requested_dates).clone()
    }
}

#[async_trait]
impl ShopMetricsQuery for StubShopMetricsQuery {
    async fn expense_total(
        &self,
        shop_id: EntityId,
        sale_date: NaiveDate,
    ) -> Result<Amount, RemoteError> {
        lock(&self.requested_dates).push(sale_date);
        lock(&self.expenses)
            .get(&shop_id)
            .cloned()
            .unwrap_or_else(|| Err(RemoteError::transport("no scripted expense")))
    }

    async fn latest_sale(&self, shop_id: EntityId) -> Result<Amount, RemoteError> {
        lock(&self.sales)
            .get(&shop_id)
            .cloned()
            .unwrap_or_else(|| Err(RemoteError::transport("no scripted sale")))
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}
