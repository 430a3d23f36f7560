//! Shared tracing setup for binaries and tests that drive the client.
//!
//! The library crates only emit `tracing` events; installing a subscriber is left to
//! whoever owns the process.

pub mod tracing;

pub use crate::tracing::{init, init_for_tests, DEFAULT_FILTER};
