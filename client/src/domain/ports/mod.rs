//! Domain ports and supporting types.
//!
//! Driven ports describe what the domain needs from the remote service and
//! the credential store. Driving ports describe what presentation code may
//! read from and dispatch to a store.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_gateway;
mod remote_error;
mod resource_gateway;
mod shop_metrics_query;
mod store_contract;
mod token_store;

#[cfg(test)]
pub use auth_gateway::MockAuthGateway;
pub use auth_gateway::{AuthGateway, LoginGrant};
pub use remote_error::{DEFAULT_ERROR_MESSAGE, RemoteError, UNREACHABLE_MESSAGE};
pub use resource_gateway::ResourceGateway;
#[cfg(test)]
pub use shop_metrics_query::MockShopMetricsQuery;
pub use shop_metrics_query::{FixtureShopMetricsQuery, ShopMetricsQuery};
pub use store_contract::{ActionKind, ResourceDispatch, ResourceSelectors};
#[cfg(test)]
pub use token_store::MockTokenStore;
pub use token_store::{InMemoryTokenStore, TokenStore};
