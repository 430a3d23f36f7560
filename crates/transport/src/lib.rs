//! Request execution seam.
//!
//! The client core never speaks HTTP itself. It hands a path plus parameters to a
//! [`RequestExecutor`] and receives parsed JSON back. Authentication, rate limiting and
//! retries live entirely behind that trait.

pub mod error;
pub mod executor;
pub mod in_memory;
pub mod request;

pub use error::TransportError;
pub use executor::{params, Method, Params, RequestExecutor};
pub use in_memory::ScriptedExecutor;
pub use request::RecordedRequest;
