//! Actor/session store: login, profile refresh, actor directory, logout.
//!
//! The authenticated actor itself lives in the [`SessionContext`]; this store
//! owns the lifecycle of the calls that change it.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::ports::{AuthGateway, RemoteError};
use super::{
    ActionError, ActionResult, Actor, FailureMode, InvocationCounter, LoginCredentials,
    RequestState, Role, SessionContext,
};

/// Observable state of the session store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    login: RequestState<Actor>,
    profile: RequestState<Actor>,
    directory: RequestState<Vec<Actor>>,
    error: Option<String>,
}

impl SessionState {
    /// Lifecycle of the login action.
    pub fn login(&self) -> &RequestState<Actor> {
        &self.login
    }

    /// Lifecycle of the profile refresh.
    pub fn profile(&self) -> &RequestState<Actor> {
        &self.profile
    }

    /// Lifecycle of the directory listing; its last result is the directory.
    pub fn directory(&self) -> &RequestState<Vec<Actor>> {
        &self.directory
    }

    /// Pending store-level error.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

type Slot<T> = fn(&mut SessionState) -> &mut RequestState<T>;

/// Store driving authentication against an [`AuthGateway`].
pub struct SessionStore<A> {
    gateway: Arc<A>,
    session: SessionContext,
    failure_mode: FailureMode,
    state: watch::Sender<SessionState>,
    invocations: InvocationCounter,
}

impl<A: AuthGateway> SessionStore<A> {
    /// Create a store bound to `session`.
    pub fn new(gateway: Arc<A>, session: SessionContext, failure_mode: FailureMode) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            gateway,
            session,
            failure_mode,
            state,
            invocations: InvocationCounter::default(),
        }
    }

    /// The authenticated actor, or `None` before login and after logout.
    pub fn actor(&self) -> Option<Actor> {
        self.session.actor()
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Observe every transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Pending error message.
    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Consume the pending error so it surfaces once.
    pub fn acknowledge_error(&self) -> Option<String> {
        let mut taken = None;
        self.state.send_if_modified(|state| {
            state.login.take_error();
            state.profile.take_error();
            state.directory.take_error();
            taken = state.error.take();
            taken.is_some()
        });
        taken
    }

    /// Exchange credentials for a session.
    ///
    /// On failure the actor stays as it was and the message lands in the
    /// error slot.
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
        cancel: &CancellationToken,
    ) -> ActionResult<Actor> {
        let session_cancel = self.session.cancellation();
        let invocation = self.invocations.next();
        self.state
            .send_modify(|state| state.login.begin(invocation));
        debug!(%invocation, "login started");

        let outcome = self.gateway.login(credentials).await;
        if cancel.is_cancelled() || session_cancel.is_cancelled() {
            self.state.send_modify(|state| state.login.abandon(invocation));
            warn!(%invocation, "discarded cancelled login");
            return Err(ActionError::Cancelled);
        }

        let grant = outcome.map_err(|source| self.fail(login_slot, "login", source))?;
        let actor = grant.actor.clone();
        self.session.establish(grant.token, grant.actor);
        self.succeed(login_slot, actor.clone());
        info!(actor_id = %actor.id(), role = %actor.role(), "signed in");
        Ok(actor)
    }

    /// Reload the current actor's profile with the stored token.
    pub async fn refresh_profile(&self, cancel: &CancellationToken) -> ActionResult<Actor> {
        if self.session.token().is_none() {
            return Err(ActionError::NotAuthenticated);
        }
        let session_cancel = self.session.cancellation();
        let invocation = self.invocations.next();
        self.state
            .send_modify(|state| state.profile.begin(invocation));
        debug!(%invocation, "profile refresh started");

        let outcome = self.gateway.current_actor().await;
        if cancel.is_cancelled() || session_cancel.is_cancelled() {
            self.state.send_modify(|state| state.profile.abandon(invocation));
            return Err(ActionError::Cancelled);
        }

        let actor = outcome.map_err(|source| self.fail(profile_slot, "profile", source))?;
        self.session.replace_actor(Some(actor.clone()));
        self.succeed(profile_slot, actor.clone());
        Ok(actor)
    }

    /// List actors, optionally restricted to `role`.
    pub async fn list_actors(
        &self,
        role: Option<Role>,
        cancel: &CancellationToken,
    ) -> ActionResult<Vec<Actor>> {
        let session_cancel = self.session.cancellation();
        let invocation = self.invocations.next();
        self.state
            .send_modify(|state| state.directory.begin(invocation));
        debug!(%invocation, role = ?role, "actor directory requested");

        let outcome = self.gateway.list_actors(role).await;
        if cancel.is_cancelled() || session_cancel.is_cancelled() {
            self.state.send_modify(|state| state.directory.abandon(invocation));
            return Err(ActionError::Cancelled);
        }

        let actors = outcome.map_err(|source| self.fail(directory_slot, "directory", source))?;
        self.succeed(directory_slot, actors.clone());
        Ok(actors)
    }

    /// End the session: cancel in-flight work, forget actor and token, and
    /// reset this store.
    pub fn logout(&self) {
        let actor_id = self.session.actor().map(|actor| actor.id());
        self.session.teardown();
        self.state.send_replace(SessionState::default());
        info!(actor_id = ?actor_id, "signed out");
    }

    fn succeed<T>(&self, slot: Slot<T>, payload: T) {
        self.state.send_modify(|state| {
            slot(state).succeed(payload);
            state.error = None;
        });
    }

    fn fail<T>(&self, slot: Slot<T>, action: &'static str, source: RemoteError) -> ActionError {
        warn!(action, error = %source, "session action failed");
        let error = ActionError::remote(source);
        let message = error.user_message();
        let mode = self.failure_mode;
        self.state.send_modify(|state| {
            slot(state).fail(message.clone(), mode);
            state.error = Some(message);
        });
        error
    }
}

const fn login_slot(state: &mut SessionState) -> &mut RequestState<Actor> {
    &mut state.login
}

const fn profile_slot(state: &mut SessionState) -> &mut RequestState<Actor> {
    &mut state.profile
}

const fn directory_slot(state: &mut SessionState) -> &mut RequestState<Vec<Actor>> {
    &mut state.directory
}
