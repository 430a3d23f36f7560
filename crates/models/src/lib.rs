//! `thingkit-models` — objectification and lazily fetched things.
//!
//! A [`Reddit`] handle owns the request executor and the [`Objector`] that turns raw JSON
//! into typed values. Entities built by the caller start shallow and fetch themselves
//! the first time an uncached attribute is read; entities built from payloads start
//! fetched. Everything here is single threaded: handles are `Rc` based and `!Send`.

pub mod comment;
pub mod comment_forest;
pub mod config;
pub mod generator;
pub mod lazy;
pub mod listing;
pub mod message;
pub mod more;
pub mod objector;
pub mod paths;
pub mod reddit;
pub mod redditor;
pub mod submission;
pub mod subreddit;
pub mod thing;
pub mod value;

pub use comment::{Comment, CommentInit, CommentModeration, CommentParent};
pub use comment_forest::{CommentForest, ForestNode};
pub use config::{Config, Kinds, ThingKind};
pub use generator::ListingGenerator;
pub use lazy::{EntityCore, LazyEntity};
pub use listing::{Listing, ListingKind};
pub use message::{Message, Trophy};
pub use more::MoreComments;
pub use objector::Objector;
pub use reddit::Reddit;
pub use redditor::{Redditor, RedditorInit};
pub use submission::{Submission, SubmissionInit};
pub use subreddit::Subreddit;
pub use thing::Thing;
pub use value::{Record, Value};

/// Traits needed to read entity attributes.
pub mod prelude {
    pub use crate::lazy::LazyEntity;
    pub use thingkit_core::{Entity, ThingError, ThingResult};
}
