//! Explicit session context shared by every store.
//!
//! The current actor, the credential store, and the root cancellation token
//! travel together in one handle created at start-up. Nothing reads session
//! state from a global; stores receive a clone of the handle instead.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::ports::TokenStore;
use super::{Actor, SessionToken};

struct SessionInner {
    tokens: Arc<dyn TokenStore>,
    actor: watch::Sender<Option<Actor>>,
    epoch: AtomicU64,
    root: Mutex<CancellationToken>,
}

/// Cheap-to-clone handle to the authenticated session.
///
/// ## Invariants
/// - `actor_epoch` changes whenever the actor is replaced or cleared.
/// - After [`SessionContext::teardown`], every token handed out earlier by
///   [`SessionContext::cancellation`] is cancelled.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<SessionInner>,
}

impl SessionContext {
    /// Create an unauthenticated session backed by `tokens`.
    pub fn new(tokens: Arc<dyn TokenStore>) -> Self {
        let (actor, _) = watch::channel(None);
        Self {
            inner: Arc::new(SessionInner {
                tokens,
                actor,
                epoch: AtomicU64::new(0),
                root: Mutex::new(CancellationToken::new()),
            }),
        }
    }

    /// The authenticated actor, if any.
    pub fn actor(&self) -> Option<Actor> {
        self.inner.actor.borrow().clone()
    }

    /// Observe actor changes.
    pub fn subscribe_actor(&self) -> watch::Receiver<Option<Actor>> {
        self.inner.actor.subscribe()
    }

    /// Counter bumped on every actor change.
    pub fn actor_epoch(&self) -> u64 {
        self.inner.epoch.load(Ordering::Acquire)
    }

    /// Stored bearer token, if any.
    pub fn token(&self) -> Option<SessionToken> {
        self.inner.tokens.load()
    }

    /// Whether both a token and an actor are present.
    pub fn is_authenticated(&self) -> bool {
        self.actor().is_some() && self.token().is_some()
    }

    /// Record a successful login.
    pub fn establish(&self, token: SessionToken, actor: Actor) {
        self.inner.tokens.save(token);
        self.replace_actor(Some(actor));
    }

    /// Replace the actor, bumping the epoch when it differs.
    pub fn replace_actor(&self, actor: Option<Actor>) {
        let changed = self.inner.actor.send_if_modified(|current| {
            if *current == actor {
                return false;
            }
            *current = actor;
            true
        });
        if changed {
            self.inner.epoch.fetch_add(1, Ordering::AcqRel);
        }
    }

    /// Root token for work belonging to this session.
    ///
    /// The returned token is cancelled by the next
    /// [`SessionContext::teardown`].
    pub fn cancellation(&self) -> CancellationToken {
        self.inner
            .root
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// End the session: cancel in-flight work, then forget the actor and
    /// token.
    pub fn teardown(&self) {
        let previous = {
            let mut root = self.inner.root.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *root, CancellationToken::new())
        };
        previous.cancel();
        self.inner.tokens.clear();
        self.replace_actor(None);
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("actor", &self.actor().map(|actor| actor.id()))
            .field("epoch", &self.actor_epoch())
            .finish_non_exhaustive()
    }
}
