//! Redditors (`t2`).

use core::cell::RefCell;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value as JsonValue};
use thingkit_core::{AttributeStore, Entity, Fullname, ThingError, ThingId, ThingResult};
use thingkit_transport::{params, Method, Params};
use tracing::debug;

use crate::generator::ListingGenerator;
use crate::lazy::{data_object, EntityCore, LazyEntity};
use crate::listing::ListingKind;
use crate::message::Trophy;
use crate::paths;
use crate::reddit::Reddit;
use crate::thing::Thing;
use crate::value::Value;

/// Author name the API reports for deleted accounts.
pub const DELETED: &str = "[deleted]";

/// Identity inputs for [`Redditor::new`]; exactly one must be set.
#[derive(Debug, Clone, Default)]
pub struct RedditorInit {
    pub name: Option<String>,
    pub fullname: Option<String>,
    pub data: Option<Map<String, JsonValue>>,
}

impl RedditorInit {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn fullname(fullname: impl Into<String>) -> Self {
        Self {
            fullname: Some(fullname.into()),
            ..Self::default()
        }
    }

    pub fn data(data: Map<String, JsonValue>) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }
}

/// A redditor handle. Clones share the same cache.
///
/// Identity is whatever the handle was built from: the name, or the fullname for
/// redditors built by fullname. Fetching never changes it, so a handle can sit in a
/// hash set across fetches.
#[derive(Clone)]
pub struct Redditor {
    inner: Rc<RedditorShared>,
}

struct RedditorShared {
    reddit: Reddit,
    /// Name or fullname given at construction.
    initial: ThingId,
    core: RefCell<EntityCore>,
}

impl Redditor {
    pub fn new(reddit: &Reddit, init: RedditorInit) -> ThingResult<Self> {
        let provided = [init.name.is_some(), init.fullname.is_some(), init.data.is_some()]
            .into_iter()
            .filter(|set| *set)
            .count();
        if provided != 1 {
            return Err(ThingError::usage(
                "exactly one of `name`, `fullname`, or `data` must be provided",
            ));
        }

        let mut attributes = AttributeStore::new();
        let initial = match init {
            RedditorInit { data: Some(data), .. } => return Self::from_json_data(reddit, data),
            RedditorInit { name: Some(name), .. } => {
                let name = ThingId::new(name)?;
                attributes.set("name", Value::from(name.as_str()));
                name
            }
            RedditorInit { fullname: Some(fullname), .. } => {
                let fullname = Fullname::parse(&fullname)?.to_string();
                attributes.set("_fullname", Value::from(fullname.as_str()));
                ThingId::new(fullname)?
            }
            RedditorInit { .. } => return Err(ThingError::usage("redditor identity missing")),
        };
        Ok(Self::build(reddit, initial, EntityCore::unfetched(attributes)))
    }

    /// Redditor from a raw author member: `None` for the deleted sentinel or null.
    pub fn from_data(reddit: &Reddit, raw: JsonValue) -> ThingResult<Option<Self>> {
        match raw {
            JsonValue::Null => Ok(None),
            JsonValue::String(name) if name == DELETED => Ok(None),
            JsonValue::String(name) => Self::new(reddit, RedditorInit::name(name)).map(Some),
            JsonValue::Object(data) => Self::from_json_data(reddit, data).map(Some),
            other => Err(ThingError::unexpected_shape(format!(
                "cannot build a redditor from {other}"
            ))),
        }
    }

    /// Like [`Redditor::from_data`] for an already objectified value.
    pub fn from_value(reddit: &Reddit, value: Value) -> ThingResult<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::String(name) if name == DELETED => Ok(None),
            Value::String(name) => Self::new(reddit, RedditorInit::name(name)).map(Some),
            Value::Thing(Thing::Redditor(redditor)) => Ok(Some(redditor)),
            Value::Object(record) => Self::from_attributes(reddit, record.into_attributes()).map(Some),
            other => Err(ThingError::unexpected_shape(format!(
                "cannot build a redditor from {}",
                other.type_label()
            ))),
        }
    }

    pub(crate) fn from_json_data(reddit: &Reddit, data: Map<String, JsonValue>) -> ThingResult<Self> {
        let attributes = reddit.objector().objectify_members(reddit, data)?;
        Self::from_attributes(reddit, attributes)
    }

    /// Full redditor from objectified `data` members, which must include `name`.
    pub(crate) fn from_attributes(reddit: &Reddit, attributes: AttributeStore<Value>) -> ThingResult<Self> {
        let name = attributes
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| ThingError::invalid_id("redditor data must include a `name`"))
            .and_then(ThingId::new)?;
        Ok(Self::build(reddit, name, EntityCore::fetched(attributes)))
    }

    fn build(reddit: &Reddit, initial: ThingId, core: EntityCore) -> Self {
        Self {
            inner: Rc::new(RedditorShared {
                reddit: reddit.clone(),
                initial,
                core: RefCell::new(core),
            }),
        }
    }

    /// Name, fetching it first for redditors built from a fullname.
    pub fn name(&self) -> ThingResult<String> {
        self.get_string("name")
    }

    /// `t2_<id>`.
    pub fn fullname(&self) -> ThingResult<String> {
        if let Some(fullname) = self.cached("_fullname").as_ref().and_then(Value::as_str) {
            return Ok(fullname.to_string());
        }
        let id = self.get_string("id")?;
        Ok(format!("{}_{id}", self.inner.reddit.kinds().redditor))
    }

    pub fn link_karma(&self) -> ThingResult<i64> {
        self.get_i64("link_karma")
    }

    pub fn comment_karma(&self) -> ThingResult<i64> {
        self.get_i64("comment_karma")
    }

    pub fn created(&self) -> ThingResult<DateTime<Utc>> {
        self.get_timestamp("created_utc")
    }

    pub fn block(&self) -> ThingResult<()> {
        let name = self.name()?;
        self.inner.reddit.post(paths::BLOCK_USER, &params([("name", name)]))?;
        Ok(())
    }

    /// Removes the block; needs the authenticated user's fullname.
    pub fn unblock(&self) -> ThingResult<()> {
        let container = self.inner.reddit.me()?.fullname()?;
        let data = params([
            ("container", container),
            ("name", self.name()?),
            ("type", "enemy".to_string()),
        ]);
        self.inner.reddit.post(&paths::unfriend("all"), &data)?;
        Ok(())
    }

    /// Add as friend; calling again updates the note.
    pub fn friend(&self, note: Option<&str>) -> ThingResult<()> {
        let body = match note {
            Some(note) => json!({"note": note}),
            None => json!({}),
        };
        self.friend_request(Method::Put, &body)
    }

    pub fn unfriend(&self) -> ThingResult<()> {
        let body = json!({"id": self.name()?});
        self.friend_request(Method::Delete, &body)
    }

    /// Redditor carrying friendship attributes (`date`, `id`, maybe `note`).
    pub fn friend_info(&self) -> ThingResult<Redditor> {
        let value = self
            .inner
            .reddit
            .get(&paths::friend_v1(&self.name()?), &Params::new())?;
        Self::from_value(&self.inner.reddit, value)?
            .ok_or_else(|| ThingError::unexpected_shape("friend info returned no redditor"))
    }

    pub fn trust(&self) -> ThingResult<()> {
        let name = self.name()?;
        self.inner.reddit.post(paths::ADD_WHITELISTED, &params([("name", name)]))?;
        Ok(())
    }

    pub fn distrust(&self) -> ThingResult<()> {
        let name = self.name()?;
        self.inner.reddit.post(paths::REMOVE_WHITELISTED, &params([("name", name)]))?;
        Ok(())
    }

    /// Subreddits this redditor moderates; empty when there are none.
    pub fn moderated(&self) -> ThingResult<Vec<Value>> {
        let value = self
            .inner
            .reddit
            .get(&paths::moderated(&self.name()?), &Params::new())?;
        Ok(match value {
            Value::Array(items) => items,
            Value::Listing(listing) => listing.into_children(),
            Value::Object(record) => record
                .get("data")
                .and_then(Value::as_array)
                .map(<[Value]>::to_vec)
                .unwrap_or_default(),
            _ => Vec::new(),
        })
    }

    pub fn multireddits(&self) -> ThingResult<Value> {
        self.inner
            .reddit
            .get(&paths::multireddit_user(&self.name()?), &Params::new())
    }

    pub fn trophies(&self) -> ThingResult<Vec<Trophy>> {
        let value = self
            .inner
            .reddit
            .get(&paths::trophies(&self.name()?), &Params::new())?;
        Ok(value
            .into_array()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| match item {
                Value::Thing(Thing::Trophy(trophy)) => Some(trophy),
                _ => None,
            })
            .collect())
    }

    /// Comments by this redditor, newest first.
    pub fn comments(&self) -> ThingResult<ListingGenerator> {
        self.listing("comments")
    }

    pub fn submissions(&self) -> ThingResult<ListingGenerator> {
        self.listing("submitted")
    }

    /// Moderator notes about this redditor in `subreddit`, newest first.
    pub fn notes(&self, subreddit: &str) -> ThingResult<ListingGenerator> {
        Ok(self
            .inner
            .reddit
            .listing(paths::MOD_NOTES, ListingKind::ModNote)
            .param("subreddit", subreddit)
            .param("user", self.name()?))
    }

    fn listing(&self, section: &str) -> ThingResult<ListingGenerator> {
        let path = paths::user_listing(&self.name()?, section);
        Ok(self.inner.reddit.listing(path, ListingKind::Standard))
    }

    fn friend_request(&self, method: Method, body: &JsonValue) -> ThingResult<()> {
        let path = paths::friend_v1(&self.name()?);
        self.inner.reddit.request(method, &path, Some(body))?;
        Ok(())
    }

    fn resolve_name(&self, fullname: &str) -> ThingResult<String> {
        debug!(%fullname, "resolving redditor name");
        let raw = self
            .inner
            .reddit
            .get_json(paths::USER_BY_FULLNAME, &params([("ids", fullname)]))?;
        raw.get(fullname)
            .and_then(|user| user.get("name"))
            .and_then(JsonValue::as_str)
            .map(str::to_owned)
            .ok_or_else(|| ThingError::unexpected_shape(format!("no user data for {fullname}")))
    }
}

/// Replace a raw `author` member by a [`Redditor`], or null for deleted authors.
pub(crate) fn objectify_author(reddit: &Reddit, attributes: &mut AttributeStore<Value>) -> ThingResult<()> {
    if let Some(author) = attributes.remove("author") {
        let value = match Redditor::from_value(reddit, author)? {
            Some(redditor) => Value::Thing(Thing::Redditor(redditor)),
            None => Value::Null,
        };
        attributes.set("author", value);
    }
    Ok(())
}

impl Entity for Redditor {
    type Id = ThingId;

    /// Name or fullname given at construction.
    fn id(&self) -> ThingId {
        self.inner.initial.clone()
    }

    fn type_name(&self) -> &'static str {
        "Redditor"
    }
}

impl LazyEntity for Redditor {
    fn reddit(&self) -> &Reddit {
        &self.inner.reddit
    }

    fn core(&self) -> &RefCell<EntityCore> {
        &self.inner.core
    }

    fn identity_attributes(&self) -> &'static [&'static str] {
        &["name", "_fullname"]
    }

    /// `GET user/<name>/about/`, resolving the name from the fullname first if needed.
    fn load(&self) -> ThingResult<AttributeStore<Value>> {
        let known = self.cached("name").and_then(|name| name.as_str().map(str::to_owned));
        let name = match known {
            Some(name) => name,
            None => {
                let fullname = self
                    .cached("_fullname")
                    .and_then(|fullname| fullname.as_str().map(str::to_owned))
                    .ok_or_else(|| ThingError::unexpected_shape("redditor has no name or fullname"))?;
                self.resolve_name(&fullname)?
            }
        };

        let reddit = &self.inner.reddit;
        let raw = reddit.get_json(&paths::user_about(&name), &Params::new())?;
        let data = data_object(raw, "user about")?;
        let mut attributes = reddit.objector().objectify_members(reddit, data)?;
        if !attributes.contains("name") {
            attributes.set("name", Value::from(name));
        }
        Ok(attributes)
    }
}

impl PartialEq for Redditor {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Redditor {}

impl Hash for Redditor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Display for Redditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner.initial, f)
    }
}

impl fmt::Debug for Redditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Redditor(name={:?})", self.inner.initial.as_str())
    }
}
