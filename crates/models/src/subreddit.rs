//! Subreddits (`t5`).

use core::cell::RefCell;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::rc::Rc;

use thingkit_core::{AttributeStore, Entity, ThingError, ThingId, ThingResult};
use thingkit_transport::Params;

use crate::generator::ListingGenerator;
use crate::lazy::{EntityCore, LazyEntity};
use crate::listing::ListingKind;
use crate::paths;
use crate::reddit::Reddit;
use crate::redditor::Redditor;
use crate::thing::Thing;
use crate::value::Value;

/// A subreddit handle, identified by its display name.
#[derive(Clone)]
pub struct Subreddit {
    inner: Rc<SubredditShared>,
}

struct SubredditShared {
    reddit: Reddit,
    display_name: ThingId,
    core: RefCell<EntityCore>,
}

impl Subreddit {
    /// Shallow subreddit; `r/` prefixes are stripped.
    pub fn from_name(reddit: &Reddit, display_name: &str) -> ThingResult<Self> {
        let display_name = display_name
            .strip_prefix("/r/")
            .or_else(|| display_name.strip_prefix("r/"))
            .unwrap_or(display_name);
        let display_name = ThingId::new(display_name)?;
        let mut attributes = AttributeStore::new();
        attributes.set("display_name", Value::from(display_name.as_str()));
        Ok(Self::build(reddit, display_name, EntityCore::unfetched(attributes)))
    }

    pub(crate) fn from_attributes(reddit: &Reddit, attributes: AttributeStore<Value>) -> ThingResult<Self> {
        let display_name = attributes
            .get("display_name")
            .and_then(Value::as_str)
            .ok_or_else(|| ThingError::unexpected_shape("subreddit data has no `display_name`"))
            .and_then(ThingId::new)?;
        Ok(Self::build(reddit, display_name, EntityCore::fetched(attributes)))
    }

    fn build(reddit: &Reddit, display_name: ThingId, core: EntityCore) -> Self {
        Self {
            inner: Rc::new(SubredditShared {
                reddit: reddit.clone(),
                display_name,
                core: RefCell::new(core),
            }),
        }
    }

    pub fn display_name(&self) -> &str {
        self.inner.display_name.as_str()
    }

    /// `t5_<id>`.
    pub fn fullname(&self) -> ThingResult<String> {
        let id = self.get_string("id")?;
        Ok(format!("{}_{id}", self.inner.reddit.kinds().subreddit))
    }

    pub fn title(&self) -> ThingResult<String> {
        self.get_string("title")
    }

    pub fn subscribers(&self) -> ThingResult<i64> {
        self.get_i64("subscribers")
    }

    pub fn hot(&self) -> ListingGenerator {
        self.listing("hot")
    }

    pub fn new(&self) -> ListingGenerator {
        self.listing("new")
    }

    /// Newest comments across the subreddit.
    pub fn comments(&self) -> ListingGenerator {
        self.listing("comments")
    }

    pub fn moderators(&self) -> ThingResult<Vec<Redditor>> {
        let reddit = &self.inner.reddit;
        let raw = reddit.get_json(&paths::subreddit_moderators(self.display_name()), &Params::new())?;
        let items = if raw.get(ListingKind::Moderator.child_field()).is_some() {
            reddit
                .objector()
                .objectify_listing(reddit, raw, ListingKind::Moderator)?
                .into_children()
        } else {
            match reddit.objectify(raw)? {
                Value::Array(items) => items,
                Value::Listing(listing) => listing.into_children(),
                other => {
                    return Err(ThingError::unexpected_shape(format!(
                        "moderators: unexpected {}",
                        other.type_label()
                    )));
                }
            }
        };
        let mut moderators = Vec::with_capacity(items.len());
        for item in items {
            if let Some(redditor) = Redditor::from_value(reddit, item)? {
                moderators.push(redditor);
            }
        }
        Ok(moderators)
    }

    fn listing(&self, sort: &str) -> ListingGenerator {
        let path = paths::subreddit_listing(self.display_name(), sort);
        self.inner.reddit.listing(path, ListingKind::Standard)
    }
}

/// Replace a raw `subreddit` name member by a [`Subreddit`].
pub(crate) fn objectify_subreddit(reddit: &Reddit, attributes: &mut AttributeStore<Value>) -> ThingResult<()> {
    let name = match attributes.get("subreddit") {
        Some(Value::String(name)) => name.clone(),
        _ => return Ok(()),
    };
    let subreddit = Subreddit::from_name(reddit, &name)?;
    attributes.set("subreddit", Value::Thing(Thing::Subreddit(subreddit)));
    Ok(())
}

/// `subreddit` member as a [`Subreddit`], whichever form it was cached in.
pub(crate) fn expect_subreddit(reddit: &Reddit, value: Value) -> ThingResult<Subreddit> {
    match value {
        Value::Thing(Thing::Subreddit(subreddit)) => Ok(subreddit),
        Value::String(name) => Subreddit::from_name(reddit, &name),
        other => Err(ThingError::unexpected_shape(format!(
            "expected a subreddit, found {}",
            other.type_label()
        ))),
    }
}

impl Entity for Subreddit {
    type Id = ThingId;

    fn id(&self) -> ThingId {
        self.inner.display_name.clone()
    }

    fn type_name(&self) -> &'static str {
        "Subreddit"
    }
}

impl LazyEntity for Subreddit {
    fn reddit(&self) -> &Reddit {
        &self.inner.reddit
    }

    fn core(&self) -> &RefCell<EntityCore> {
        &self.inner.core
    }

    fn identity_attributes(&self) -> &'static [&'static str] {
        &["display_name"]
    }

    fn load(&self) -> ThingResult<AttributeStore<Value>> {
        let path = paths::subreddit_about(self.display_name());
        match self.inner.reddit.get(&path, &Params::new())? {
            Value::Thing(Thing::Subreddit(other)) => Ok(other.attributes()),
            other => Err(ThingError::unexpected_shape(format!(
                "{path}: expected a subreddit, got {}",
                other.type_label()
            ))),
        }
    }
}

impl PartialEq for Subreddit {
    fn eq(&self, other: &Self) -> bool {
        self.inner.display_name == other.inner.display_name
    }
}

impl Eq for Subreddit {}

impl Hash for Subreddit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.display_name.hash(state);
    }
}

impl fmt::Display for Subreddit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl fmt::Debug for Subreddit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Subreddit(display_name={:?})", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use thingkit_core::FetchState;
    use thingkit_transport::ScriptedExecutor;

    fn client() -> (Arc<ScriptedExecutor>, Reddit) {
        let executor = Arc::new(ScriptedExecutor::new());
        let reddit = Reddit::with_executor(executor.clone()).unwrap();
        (executor, reddit)
    }

    #[test]
    fn prefix_is_stripped_and_case_ignored() {
        let (_, reddit) = client();
        let a = reddit.subreddit("r/RedditDev").unwrap();
        let b = reddit.subreddit("redditdev").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "RedditDev");
        assert!(reddit.subreddit("").unwrap_err().is_malformed_identity());
    }

    #[test]
    fn fetches_about_once() {
        let (executor, reddit) = client();
        executor.respond_get(
            "r/redditdev/about/",
            json!({"kind": "t5", "data": {"display_name": "redditdev", "id": "2qizd", "subscribers": 40000}}),
        );
        let subreddit = reddit.subreddit("redditdev").unwrap();
        assert_eq!(subreddit.subscribers().unwrap(), 40000);
        assert_eq!(subreddit.fullname().unwrap(), "t5_2qizd");
        assert_eq!(subreddit.fetch_state(), FetchState::Fetched);
        assert_eq!(executor.call_count(), 1);
    }

    #[test]
    fn moderators_from_user_list() {
        let (executor, reddit) = client();
        executor.respond_get(
            "r/redditdev/about/moderators/",
            json!({"kind": "UserList", "data": {"children": [
                {"date": 1.0, "id": "t2_a", "name": "bboe", "mod_permissions": ["all"]},
                {"date": 2.0, "id": "t2_b", "name": "spez", "mod_permissions": []},
            ]}}),
        );
        let names: Vec<_> = reddit
            .subreddit("redditdev")
            .unwrap()
            .moderators()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, ["bboe", "spez"]);
    }

    #[test]
    fn moderators_from_moderator_listing() {
        let (executor, reddit) = client();
        executor.respond_get(
            "r/redditdev/about/moderators/",
            json!({"moderators": [{"date": 1.0, "id": "t2_a", "name": "bboe"}], "after": null}),
        );
        let moderators = reddit.subreddit("redditdev").unwrap().moderators().unwrap();
        assert_eq!(moderators.len(), 1);
        assert_eq!(moderators[0], reddit.redditor("BBOE").unwrap());
    }

    #[test]
    fn hot_walks_the_sorted_listing() {
        let (executor, reddit) = client();
        executor.respond_get(
            "r/redditdev/hot/",
            json!({"kind": "Listing", "data": {"after": null, "children": [
                {"kind": "t3", "data": {"id": "abc", "title": "hello", "subreddit": "redditdev"}},
            ]}}),
        );
        let items: Vec<_> = reddit.subreddit("redditdev").unwrap().hot().collect();
        let submission = items[0].as_ref().unwrap().as_submission().unwrap().clone();
        assert_eq!(submission.subreddit().unwrap(), reddit.subreddit("redditdev").unwrap());
    }
}
