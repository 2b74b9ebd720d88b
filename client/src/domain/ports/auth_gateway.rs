//! Driven port for authentication and actor lookups.

use async_trait::async_trait;

use super::RemoteError;
use crate::domain::{Actor, LoginCredentials, Role, SessionToken};

/// Successful login payload: the credential plus the authenticated actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
    /// Bearer token attached to every later call.
    pub token: SessionToken,
    /// Identity of the authenticated actor.
    pub actor: Actor,
}

/// Port for `POST /user/login`, `GET /user/me`, and `GET /user?role=`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for a token and actor profile.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginGrant, RemoteError>;

    /// Fetch the profile of the actor owning the stored token.
    async fn current_actor(&self) -> Result<Actor, RemoteError>;

    /// List actors, optionally restricted to one role.
    async fn list_actors(&self, role: Option<Role>) -> Result<Vec<Actor>, RemoteError>;
}
