//! Transport failures.

use thiserror::Error;

/// Failure raised by a request executor.
///
/// The client core treats these as opaque and passes them to the caller unchanged.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Credentials were missing or rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// No response could be obtained (connection, timeout, ...).
    #[error("request failed: {0}")]
    Unavailable(String),

    /// A scripted executor had nothing queued for the request.
    #[error("no scripted response for {method} {path}")]
    Unscripted { method: String, path: String },

    /// The executor's internal state was poisoned by a panic.
    #[error("executor state poisoned")]
    Poisoned,
}

impl From<TransportError> for thingkit_core::ThingError {
    fn from(err: TransportError) -> Self {
        thingkit_core::ThingError::transport(err)
    }
}
