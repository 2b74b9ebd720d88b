//! Reqwest adapter for the remote data service.
//!
//! One [`HttpRemote`] implements every driven port: [`AuthGateway`],
//! [`ShopMetricsQuery`], and [`ResourceGateway`] for each resource.
//!
//! [`AuthGateway`]: crate::domain::ports::AuthGateway
//! [`ShopMetricsQuery`]: crate::domain::ports::ShopMetricsQuery
//! [`ResourceGateway`]: crate::domain::ports::ResourceGateway

mod client;
mod dto;
mod endpoints;

pub use client::{HttpRemote, HttpRemoteBuildError};
