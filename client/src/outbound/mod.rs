//! Outbound adapters implementing the domain's driven ports.
//!
//! - **http**: reqwest-backed client for the remote data service, covering
//!   authentication, resource CRUD, and shop metrics.
//!
//! Adapters translate between wire payloads and domain types; merge rules and
//! lifecycle state stay in the domain.

pub mod http;
