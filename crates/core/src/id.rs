//! Identifiers for remote things.
//!
//! The API treats identifiers case-insensitively for comparison while preserving case
//! for display. [`ThingId`] carries that rule; [`Fullname`] is the type-prefixed global
//! form (`t1_abc123`).

use core::fmt;
use core::hash::{Hash, Hasher};
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ThingError, ThingResult};

/// Case-insensitive identifier (compares and hashes case-folded, displays as given).
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThingId(String);

impl ThingId {
    /// Build an identifier, rejecting empty strings.
    pub fn new(raw: impl Into<String>) -> ThingResult<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(ThingError::invalid_id("identifier cannot be empty"));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-folded comparison key.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn eq_str(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.to_lowercase()
    }
}

impl PartialEq for ThingId {
    fn eq(&self, other: &Self) -> bool {
        self.eq_str(&other.0)
    }
}

impl Eq for ThingId {}

impl Hash for ThingId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl PartialEq<str> for ThingId {
    fn eq(&self, other: &str) -> bool {
        self.eq_str(other)
    }
}

impl PartialEq<&str> for ThingId {
    fn eq(&self, other: &&str) -> bool {
        self.eq_str(other)
    }
}

impl fmt::Debug for ThingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ThingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ThingId {
    type Err = ThingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Type-prefixed global identifier: `<kind>_<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fullname {
    kind: String,
    id: ThingId,
}

impl Fullname {
    pub fn new(kind: impl Into<String>, id: ThingId) -> Self {
        Self {
            kind: kind.into(),
            id,
        }
    }

    /// Split `t1_abc` into kind `t1` and id `abc`.
    pub fn parse(raw: &str) -> ThingResult<Self> {
        let (kind, id) = raw
            .split_once('_')
            .ok_or_else(|| ThingError::invalid_id(format!("not a fullname: {raw:?}")))?;
        if kind.is_empty() {
            return Err(ThingError::invalid_id(format!("fullname has no kind: {raw:?}")));
        }
        Ok(Self::new(kind, ThingId::new(id)?))
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn id(&self) -> &ThingId {
        &self.id
    }

    pub fn has_kind(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Fullname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind, self.id)
    }
}

impl FromStr for Fullname {
    type Err = ThingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Kind prefix of a fullname string (`t1` for `t1_abc`), without validating the rest.
pub fn kind_prefix(fullname: &str) -> &str {
    fullname.split_once('_').map_or(fullname, |(kind, _)| kind)
}

/// Path segments of an absolute URL, trailing `/` removed.
///
/// The leading empty segment is kept so positions match the raw path
/// (`/comments/x` → `["", "comments", "x"]`). URLs without a host are rejected.
pub fn url_parts(url: &str) -> ThingResult<Vec<String>> {
    let parsed = Url::parse(url).map_err(|_| ThingError::invalid_url(url))?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(ThingError::invalid_url(url)),
    }
    Ok(parsed
        .path()
        .trim_end_matches('/')
        .split('/')
        .map(str::to_owned)
        .collect())
}

/// Comment id from a permalink such as `https://reddit.com/comments/2gmzqe/_/cklhv0f/`.
///
/// The `comments` segment must sit exactly four segments from the end.
pub fn comment_id_from_url(url: &str) -> ThingResult<String> {
    let parts = url_parts(url)?;
    let comment_index = parts
        .iter()
        .position(|part| part == "comments")
        .ok_or_else(|| ThingError::invalid_url(url))?;

    if parts.len().checked_sub(4) != Some(comment_index) {
        return Err(ThingError::invalid_url(url));
    }
    parts
        .last()
        .filter(|id| !id.is_empty())
        .cloned()
        .ok_or_else(|| ThingError::invalid_url(url))
}

/// Submission id from a comments page, gallery or short link URL.
///
/// A `gallery` segment wins over `comments` when both are present.
pub fn submission_id_from_url(url: &str) -> ThingResult<String> {
    const NOT_SUBMISSION: &str = "Invalid URL (subreddit, not submission): {}";
    const NO_SUBMISSION_ID: &str = "Invalid URL (submission id not present): {}";

    let parts = url_parts(url)?;
    let position = |segment: &str| parts.iter().position(|part| part == segment);

    let submission_id = if let Some(index) = position("gallery") {
        parts
            .get(index + 1)
            .cloned()
            .ok_or_else(|| ThingError::invalid_url(url))?
    } else if let Some(index) = position("comments") {
        if parts.last().is_some_and(|last| last == "comments") {
            return Err(ThingError::invalid_url_with(url, NO_SUBMISSION_ID));
        }
        parts
            .get(index + 1)
            .cloned()
            .ok_or_else(|| ThingError::invalid_url(url))?
    } else {
        if position("r").is_some() {
            return Err(ThingError::invalid_url_with(url, NOT_SUBMISSION));
        }
        parts.last().cloned().unwrap_or_default()
    };

    if submission_id.is_empty() || !submission_id.chars().all(char::is_alphanumeric) {
        return Err(ThingError::invalid_url(url));
    }
    Ok(submission_id)
}
