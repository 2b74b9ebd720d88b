//! Shopdesk client library.
//!
//! The domain layer keeps remote retail data (shops, expenses, warehouse
//! payments, attendance, sale sheets) in observable client-side stores. Each
//! store runs a request lifecycle per action, merges completions into its
//! canonical list, and exposes role-filtered views. The shop overview fans
//! out per-shop metric fetches and folds them into a keyed map.
//!
//! - [`domain`]: entities, lifecycle, stores, and ports.
//! - [`outbound`]: the reqwest adapter for the remote service.
//! - [`inbound`]: the command-line presentation adapter.
//! - [`app`]: composition root.
//! - [`config`]: layered settings.

pub mod app;
pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use app::{AppBuildError, ShopdeskApp};
pub use config::{ClientSettings, SettingsError};
