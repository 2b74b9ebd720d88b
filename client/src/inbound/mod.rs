//! Inbound adapters translating user input into store dispatches.
//!
//! - **cli**: command-line screens rendering selectors as JSON.

pub mod cli;
