//! Submissions (`t3`) and their comment index.

use core::cell::RefCell;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use chrono::{DateTime, Utc};
use serde_json::{Map, Value as JsonValue};
use thingkit_core::id::submission_id_from_url;
use thingkit_core::{AttributeStore, Entity, ThingError, ThingId, ThingResult};
use thingkit_transport::Params;

use crate::comment::Comment;
use crate::comment_forest::CommentForest;
use crate::lazy::{EntityCore, LazyEntity};
use crate::paths;
use crate::reddit::Reddit;
use crate::redditor::{self, Redditor};
use crate::subreddit::{self, Subreddit};
use crate::thing::Thing;
use crate::value::Value;

/// Identity inputs for [`Submission::new`]; exactly one must be set.
#[derive(Debug, Clone, Default)]
pub struct SubmissionInit {
    pub id: Option<String>,
    pub url: Option<String>,
    pub data: Option<Map<String, JsonValue>>,
}

impl SubmissionInit {
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
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

/// A submission handle. Clones share the cache, the forest and the comment index.
#[derive(Clone)]
pub struct Submission {
    inner: Rc<SubmissionShared>,
}

pub(crate) struct SubmissionShared {
    reddit: Reddit,
    id: ThingId,
    core: RefCell<EntityCore>,
    forest: RefCell<Option<CommentForest>>,
    /// Case-folded fullname → comment; holds the tree's comments strongly.
    comments_by_fullname: RefCell<HashMap<String, Comment>>,
}

/// Non-owning link from a comment back to its submission.
#[derive(Clone)]
pub(crate) struct WeakSubmission(Weak<SubmissionShared>);

impl WeakSubmission {
    pub(crate) fn upgrade(&self) -> Option<Submission> {
        self.0.upgrade().map(|inner| Submission { inner })
    }
}

impl Submission {
    pub fn new(reddit: &Reddit, init: SubmissionInit) -> ThingResult<Self> {
        let provided = [init.id.is_some(), init.url.is_some(), init.data.is_some()]
            .into_iter()
            .filter(|set| *set)
            .count();
        if provided != 1 {
            return Err(ThingError::usage(
                "exactly one of `id`, `url`, or `data` must be provided",
            ));
        }

        let id = match init {
            SubmissionInit { data: Some(data), .. } => {
                let attributes = reddit.objector().objectify_members(reddit, data)?;
                return Self::from_attributes(reddit, attributes);
            }
            SubmissionInit { id: Some(id), .. } => ThingId::new(id)?,
            SubmissionInit { url: Some(url), .. } => ThingId::new(submission_id_from_url(&url)?)?,
            SubmissionInit { .. } => return Err(ThingError::usage("submission identity missing")),
        };
        let mut attributes = AttributeStore::new();
        attributes.set("id", Value::from(id.as_str()));
        Ok(Self::build(reddit, id, EntityCore::unfetched(attributes)))
    }

    pub(crate) fn from_attributes(
        reddit: &Reddit,
        mut attributes: AttributeStore<Value>,
    ) -> ThingResult<Self> {
        let id = attributes
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| ThingError::unexpected_shape("submission data has no `id`"))
            .and_then(ThingId::new)?;
        redditor::objectify_author(reddit, &mut attributes)?;
        subreddit::objectify_subreddit(reddit, &mut attributes)?;
        Ok(Self::build(reddit, id, EntityCore::fetched(attributes)))
    }

    fn build(reddit: &Reddit, id: ThingId, core: EntityCore) -> Self {
        Self {
            inner: Rc::new(SubmissionShared {
                reddit: reddit.clone(),
                id,
                core: RefCell::new(core),
                forest: RefCell::new(None),
                comments_by_fullname: RefCell::new(HashMap::new()),
            }),
        }
    }

    /// Submission id from a comments page, gallery or short link URL.
    pub fn id_from_url(url: &str) -> ThingResult<String> {
        submission_id_from_url(url)
    }

    pub fn id_str(&self) -> &str {
        self.inner.id.as_str()
    }

    /// `t3_<id>`.
    pub fn fullname(&self) -> String {
        format!("{}_{}", self.inner.reddit.kinds().submission, self.inner.id)
    }

    /// Top-level comments, fetching the comments page the first time.
    pub fn comments(&self) -> ThingResult<CommentForest> {
        if self.inner.forest.borrow().is_none() {
            self.fetch()?;
        }
        Ok(self.inner.forest.borrow().clone().unwrap_or_default())
    }

    /// Comment of this submission's tree already materialised under `fullname`.
    pub fn comment_by_fullname(&self, fullname: &str) -> Option<Comment> {
        self.inner
            .comments_by_fullname
            .borrow()
            .get(&fullname.to_lowercase())
            .cloned()
    }

    /// Number of indexed comments.
    pub fn indexed_comments(&self) -> usize {
        self.inner.comments_by_fullname.borrow().len()
    }

    pub(crate) fn register_comment(&self, fullname: String, comment: Comment) {
        self.inner
            .comments_by_fullname
            .borrow_mut()
            .insert(fullname.to_lowercase(), comment);
    }

    pub(crate) fn downgrade(&self) -> WeakSubmission {
        WeakSubmission(Rc::downgrade(&self.inner))
    }

    pub fn title(&self) -> ThingResult<String> {
        self.get_string("title")
    }

    pub fn selftext(&self) -> ThingResult<String> {
        self.get_string("selftext")
    }

    pub fn score(&self) -> ThingResult<i64> {
        self.get_i64("score")
    }

    pub fn num_comments(&self) -> ThingResult<i64> {
        self.get_i64("num_comments")
    }

    pub fn permalink(&self) -> ThingResult<String> {
        self.get_string("permalink")
    }

    /// `None` for deleted authors.
    pub fn author(&self) -> ThingResult<Option<Redditor>> {
        Redditor::from_value(&self.inner.reddit, self.get_attribute("author")?)
    }

    pub fn subreddit(&self) -> ThingResult<Subreddit> {
        subreddit::expect_subreddit(&self.inner.reddit, self.get_attribute("subreddit")?)
    }

    pub fn created(&self) -> ThingResult<DateTime<Utc>> {
        self.get_timestamp("created_utc")
    }

    fn install_forest(&self, forest: CommentForest) {
        self.inner.comments_by_fullname.borrow_mut().clear();
        *self.inner.forest.borrow_mut() = Some(forest.clone());
        for comment in forest.comments() {
            comment.attach_to(self);
        }
    }
}

impl Entity for Submission {
    type Id = ThingId;

    fn id(&self) -> ThingId {
        self.inner.id.clone()
    }

    fn type_name(&self) -> &'static str {
        "Submission"
    }
}

impl LazyEntity for Submission {
    fn reddit(&self) -> &Reddit {
        &self.inner.reddit
    }

    fn core(&self) -> &RefCell<EntityCore> {
        &self.inner.core
    }

    fn identity_attributes(&self) -> &'static [&'static str] {
        &["id"]
    }

    /// `GET comments/<id>/` answers `[submission listing, comment listing]`.
    fn load(&self) -> ThingResult<AttributeStore<Value>> {
        let path = paths::submission(self.id_str());
        let response = self.inner.reddit.get(&path, &Params::new())?;

        let shape_error = || ThingError::unexpected_shape(format!("{path}: expected two listings"));
        let mut pages = response
            .into_array()
            .filter(|pages| pages.len() >= 2)
            .ok_or_else(shape_error)?
            .into_iter()
            .map(Value::into_listing);
        let submission_page = pages.next().flatten().ok_or_else(shape_error)?;
        let comment_page = pages.next().flatten().ok_or_else(shape_error)?;

        let other = submission_page
            .into_children()
            .into_iter()
            .find_map(|value| match value {
                Value::Thing(Thing::Submission(submission)) => Some(submission),
                _ => None,
            })
            .ok_or_else(shape_error)?;

        self.install_forest(CommentForest::from_values(comment_page.into_children()));
        let attributes = other.attributes();
        Ok(attributes)
    }
}

impl PartialEq for Submission {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Submission {}

impl Hash for Submission {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Display for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner.id, f)
    }
}

impl fmt::Debug for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Submission(id={:?})", self.inner.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use thingkit_transport::ScriptedExecutor;

    fn reddit() -> Reddit {
        Reddit::with_executor(Arc::new(ScriptedExecutor::new())).unwrap()
    }

    #[test]
    fn construction_requires_exactly_one_input() {
        let reddit = reddit();
        let both = SubmissionInit {
            id: Some("2gmzqe".into()),
            url: Some("https://redd.it/2gmzqe".into()),
            data: None,
        };
        assert!(Submission::new(&reddit, both).unwrap_err().is_usage());
        assert!(Submission::new(&reddit, SubmissionInit::default()).unwrap_err().is_usage());
    }

    #[test]
    fn construct_from_url() {
        let submission = reddit().submission_from_url("https://www.reddit.com/gallery/2gmzqe").unwrap();
        assert_eq!(submission.to_string(), "2gmzqe");
        assert_eq!(submission.fullname(), "t3_2gmzqe");

        let err = reddit().submission_from_url("https://www.reddit.com/r/redditdev").unwrap_err();
        assert!(err.is_malformed_identity());
    }

    #[test]
    fn comments_are_indexed_with_weak_back_links() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.respond_get(
            "comments/2gmzqe/",
            json!([
                {"kind": "Listing", "data": {"after": null, "children": [
                    {"kind": "t3", "data": {"id": "2gmzqe", "title": "PRAW HTTPS"}},
                ]}},
                {"kind": "Listing", "data": {"after": null, "children": [
                    {"kind": "t1", "data": {"id": "c1", "parent_id": "t3_2gmzqe", "replies":
                        {"kind": "Listing", "data": {"after": null, "children": [
                            {"kind": "t1", "data": {"id": "c2", "parent_id": "t1_c1", "replies": ""}},
                        ]}}}},
                    {"kind": "more", "data": {"count": 4, "children": ["c3"]}},
                ]}},
            ]),
        );
        let reddit = Reddit::with_executor(executor.clone()).unwrap();
        let submission = reddit.submission("2gmzqe").unwrap();

        let forest = submission.comments().unwrap();
        assert_eq!(forest.len(), 2);
        assert_eq!(submission.title().unwrap(), "PRAW HTTPS");
        assert_eq!(submission.indexed_comments(), 2);
        assert_eq!(executor.call_count(), 1);

        let child = submission.comment_by_fullname("T1_C2").unwrap();
        assert_eq!(child.submission().unwrap(), submission);
        assert_eq!(Rc::strong_count(&submission.inner), 1);

        submission.comments().unwrap();
        assert_eq!(executor.call_count(), 1);
    }
}
