//! Domain layer: entities, the request lifecycle, stores, and derived views.
//!
//! Nothing here knows about HTTP or the command line. Remote calls go through
//! the driven ports in [`ports`]; presentation code reads and dispatches
//! through the driving ports in the same module.

pub mod accounting;
pub mod overview;
pub mod ports;
pub mod resources;
pub mod session_store;
pub mod store;
pub mod visibility;

mod actor;
mod auth;
mod error;
mod ids;
mod lifecycle;
mod money;
mod session;

pub use self::actor::{Actor, Role, UnknownRole};
pub use self::auth::{LoginCredentials, LoginValidationError, SessionToken};
pub use self::error::{ActionError, ActionResult};
pub use self::ids::{EntityId, EntityIdError};
pub use self::lifecycle::{
    FailureMode, InvocationCounter, InvocationId, RequestState, RequestStatus,
};
pub use self::money::Amount;
pub use self::session::SessionContext;
pub use self::session_store::{SessionState, SessionStore};
pub use self::store::{MutationOrdering, ResourceStore, StoreSettings};
