//! Driven port for the list/detail/create/edit endpoints of one resource.

use async_trait::async_trait;

use super::RemoteError;
use crate::domain::EntityId;
use crate::domain::resources::Resource;

/// Port for the CRUD endpoints of resource `R`.
///
/// Implementations return exactly what the service answered; merge rules
/// live in the store.
#[async_trait]
pub trait ResourceGateway<R: Resource>: Send + Sync {
    /// Fetch the full list.
    async fn list(&self) -> Result<Vec<R>, RemoteError>;

    /// Fetch one entity.
    async fn get(&self, id: EntityId) -> Result<R, RemoteError>;

    /// Create an entity and return the stored record.
    async fn create(&self, draft: &R::Draft) -> Result<R, RemoteError>;

    /// Apply a partial update and return the stored record.
    async fn edit(&self, id: EntityId, patch: &R::Patch) -> Result<R, RemoteError>;
}
