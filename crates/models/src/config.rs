//! Client configuration.
//!
//! A [`Config`] is owned by each [`Reddit`](crate::Reddit) handle, so independent
//! clients in one process can use different kind tables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thingkit_core::{ThingError, ThingResult};

/// Environment variable overriding [`Config::comment_context`].
pub const ENV_COMMENT_CONTEXT: &str = "THINGKIT_COMMENT_CONTEXT";
/// Environment variable overriding [`Config::listing_page_size`].
pub const ENV_PAGE_SIZE: &str = "THINGKIT_PAGE_SIZE";

/// Server-side type of a tagged payload.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThingKind {
    Comment,
    Redditor,
    Submission,
    Message,
    Subreddit,
    Trophy,
    MoreComments,
    Listing,
    TrophyList,
    UserList,
}

impl ThingKind {
    pub const ALL: [ThingKind; 10] = [
        ThingKind::Comment,
        ThingKind::Redditor,
        ThingKind::Submission,
        ThingKind::Message,
        ThingKind::Subreddit,
        ThingKind::Trophy,
        ThingKind::MoreComments,
        ThingKind::Listing,
        ThingKind::TrophyList,
        ThingKind::UserList,
    ];
}

/// Tag used on the wire for each [`ThingKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Kinds {
    pub comment: String,
    pub redditor: String,
    pub submission: String,
    pub message: String,
    pub subreddit: String,
    pub trophy: String,
    pub more: String,
    pub listing: String,
    pub trophy_list: String,
    pub user_list: String,
}

impl Default for Kinds {
    fn default() -> Self {
        Self {
            comment: "t1".into(),
            redditor: "t2".into(),
            submission: "t3".into(),
            message: "t4".into(),
            subreddit: "t5".into(),
            trophy: "t6".into(),
            more: "more".into(),
            listing: "Listing".into(),
            trophy_list: "TrophyList".into(),
            user_list: "UserList".into(),
        }
    }
}

impl Kinds {
    pub fn tag(&self, kind: ThingKind) -> &str {
        match kind {
            ThingKind::Comment => &self.comment,
            ThingKind::Redditor => &self.redditor,
            ThingKind::Submission => &self.submission,
            ThingKind::Message => &self.message,
            ThingKind::Subreddit => &self.subreddit,
            ThingKind::Trophy => &self.trophy,
            ThingKind::MoreComments => &self.more,
            ThingKind::Listing => &self.listing,
            ThingKind::TrophyList => &self.trophy_list,
            ThingKind::UserList => &self.user_list,
        }
    }

    /// Tag → kind lookup used by the objector.
    ///
    /// Fails if two kinds share a tag, which would make dispatch ambiguous.
    pub fn dispatch_table(&self) -> ThingResult<HashMap<String, ThingKind>> {
        let mut table = HashMap::with_capacity(ThingKind::ALL.len());
        for kind in ThingKind::ALL {
            let tag = self.tag(kind);
            if let Some(previous) = table.insert(tag.to_string(), kind) {
                return Err(ThingError::invalid_config(format!(
                    "kind tag {tag:?} is used by both {previous:?} and {kind:?}"
                )));
            }
        }
        Ok(table)
    }
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub kinds: Kinds,
    /// `context` parameter sent when refreshing a comment. The server caps context at
    /// 8 levels; asking for more is harmless.
    pub comment_context: u32,
    /// Items requested per listing page.
    pub listing_page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kinds: Kinds::default(),
            comment_context: 100,
            listing_page_size: 100,
        }
    }
}

impl Config {
    /// Defaults overlaid with `THINGKIT_*` environment variables.
    pub fn from_env() -> ThingResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup` (keys are the `ENV_*` names).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ThingResult<Self> {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_COMMENT_CONTEXT) {
            config.comment_context = parse_positive(ENV_COMMENT_CONTEXT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            config.listing_page_size = parse_positive(ENV_PAGE_SIZE, &raw)?;
        }
        Ok(config)
    }
}

fn parse_positive(key: &str, raw: &str) -> ThingResult<u32> {
    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ThingError::invalid_config(format!(
            "{key} must be a positive integer, got {raw:?}"
        ))),
    }
}
