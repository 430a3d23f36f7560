//! `thingkit-core` — identity, error and lazy-loading primitives.
//!
//! This crate contains **no IO**: identifiers, the error taxonomy, the attribute store
//! and the fetch state machine shared by the transport and models crates.

pub mod attributes;
pub mod entity;
pub mod error;
pub mod fetch;
pub mod id;
pub mod value_object;

pub use attributes::AttributeStore;
pub use entity::Entity;
pub use error::{ErrorItem, RedditApiError, ThingError, ThingResult, TransportFailure};
pub use fetch::FetchState;
pub use id::{Fullname, ThingId};
pub use value_object::ValueObject;
