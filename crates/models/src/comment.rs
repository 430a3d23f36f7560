//! Comments (`t1`).

use core::cell::RefCell;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::mem;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value as JsonValue};
use thingkit_core::id::{comment_id_from_url, kind_prefix};
use thingkit_core::{AttributeStore, Entity, ThingError, ThingId, ThingResult};
use thingkit_transport::params;
use tracing::debug;

use crate::comment_forest::CommentForest;
use crate::lazy::{data_object, EntityCore, LazyEntity};
use crate::listing::Listing;
use crate::paths;
use crate::reddit::Reddit;
use crate::redditor::{self, Redditor};
use crate::submission::{Submission, WeakSubmission};
use crate::subreddit::{self, Subreddit};
use crate::thing::Thing;
use crate::value::Value;

const MISSING_COMMENT: &str = "This comment does not appear to be in the comment tree";

/// Identity inputs for [`Comment::new`]; exactly one must be set.
#[derive(Debug, Clone, Default)]
pub struct CommentInit {
    pub id: Option<String>,
    pub url: Option<String>,
    pub data: Option<Map<String, JsonValue>>,
}

impl CommentInit {
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

    fn provided(&self) -> usize {
        [self.id.is_some(), self.url.is_some(), self.data.is_some()]
            .into_iter()
            .filter(|set| *set)
            .count()
    }
}

/// What [`Comment::parent`] resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentParent {
    Submission(Submission),
    Comment(Comment),
}

/// A comment handle. Clones share the same cache.
#[derive(Clone)]
pub struct Comment {
    inner: Rc<CommentShared>,
}

struct CommentShared {
    reddit: Reddit,
    id: ThingId,
    core: RefCell<EntityCore>,
    replies: RefCell<Replies>,
    submission: RefCell<SubmissionLink>,
}

#[derive(Clone)]
enum Replies {
    Pending(Vec<Value>),
    Ready(CommentForest),
}

/// Back-reference to the owning submission.
///
/// Comments inside a submission's tree hold a weak link; the submission's index holds
/// them strongly. A comment that built its submission itself owns it and is never
/// indexed by it.
enum SubmissionLink {
    Unset,
    Owned(Submission),
    Shared(WeakSubmission),
}

impl Comment {
    pub fn new(reddit: &Reddit, init: CommentInit) -> ThingResult<Self> {
        if init.provided() != 1 {
            return Err(ThingError::usage(
                "exactly one of `id`, `url`, or `data` must be provided",
            ));
        }
        let CommentInit { id, url, data } = init;
        if let Some(data) = data {
            let attributes = reddit.objector().objectify_members(reddit, data)?;
            return Self::from_attributes(reddit, attributes);
        }
        let id = match (id, url) {
            (Some(id), _) => ThingId::new(id)?,
            (_, Some(url)) => ThingId::new(comment_id_from_url(&url)?)?,
            _ => return Err(ThingError::usage("comment identity missing")),
        };

        let mut attributes = AttributeStore::new();
        attributes.set("id", Value::from(id.as_str()));
        Ok(Self::build(reddit, id, EntityCore::unfetched(attributes), Vec::new()))
    }

    /// Full comment from objectified `data` members.
    pub(crate) fn from_attributes(
        reddit: &Reddit,
        mut attributes: AttributeStore<Value>,
    ) -> ThingResult<Self> {
        let id = attributes
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| ThingError::unexpected_shape("comment data has no `id`"))
            .and_then(ThingId::new)?;

        redditor::objectify_author(reddit, &mut attributes)?;
        subreddit::objectify_subreddit(reddit, &mut attributes)?;
        let replies = match attributes.remove("replies") {
            Some(Value::Listing(listing)) => listing.into_children(),
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };
        Ok(Self::build(reddit, id, EntityCore::fetched(attributes), replies))
    }

    fn build(reddit: &Reddit, id: ThingId, core: EntityCore, replies: Vec<Value>) -> Self {
        Self {
            inner: Rc::new(CommentShared {
                reddit: reddit.clone(),
                id,
                core: RefCell::new(core),
                replies: RefCell::new(Replies::Pending(replies)),
                submission: RefCell::new(SubmissionLink::Unset),
            }),
        }
    }

    /// Comment id from a permalink.
    pub fn id_from_url(url: &str) -> ThingResult<String> {
        comment_id_from_url(url)
    }

    pub fn id_str(&self) -> &str {
        self.inner.id.as_str()
    }

    /// `t1_<id>`.
    pub fn fullname(&self) -> String {
        format!("{}_{}", self.inner.reddit.kinds().comment, self.inner.id)
    }

    /// Whether the parent is the submission itself.
    pub fn is_root(&self) -> ThingResult<bool> {
        let parent_id = self.get_string("parent_id")?;
        Ok(kind_prefix(&parent_id) == self.inner.reddit.kinds().submission)
    }

    /// The owning submission, built lazily from `context` or `link_id`.
    pub fn submission(&self) -> ThingResult<Submission> {
        if let Some(submission) = self.linked_submission() {
            return Ok(submission);
        }
        let id = self.submission_id()?;
        let submission = self.inner.reddit.submission(&id)?;
        *self.inner.submission.borrow_mut() = SubmissionLink::Owned(submission.clone());
        Ok(submission)
    }

    /// Parent submission or comment, without a request when it is already known.
    pub fn parent(&self) -> ThingResult<CommentParent> {
        let parent_id = self.get_string("parent_id")?;
        let submission = self.submission()?;
        if parent_id.eq_ignore_ascii_case(&submission.fullname()) {
            return Ok(CommentParent::Submission(submission));
        }
        if let Some(indexed) = submission.comment_by_fullname(&parent_id) {
            return Ok(CommentParent::Comment(indexed));
        }

        let id = parent_id.split_once('_').map_or(parent_id.as_str(), |(_, id)| id);
        let parent = Comment::new(&self.inner.reddit, CommentInit::id(id))?;
        *parent.inner.submission.borrow_mut() = SubmissionLink::Owned(submission);
        Ok(CommentParent::Comment(parent))
    }

    /// Direct replies, materialised once.
    pub fn replies(&self) -> CommentForest {
        let mut replies = self.inner.replies.borrow_mut();
        let forest = match &mut *replies {
            Replies::Ready(forest) => return forest.clone(),
            Replies::Pending(values) => CommentForest::from_values(mem::take(values)),
        };
        *replies = Replies::Ready(forest.clone());
        forest
    }

    /// Link this comment and its replies to `submission` and index them there.
    pub(crate) fn attach_to(&self, submission: &Submission) {
        *self.inner.submission.borrow_mut() = SubmissionLink::Shared(submission.downgrade());
        submission.register_comment(self.fullname(), self.clone());
        for reply in self.replies().comments() {
            reply.attach_to(submission);
        }
    }

    pub fn body(&self) -> ThingResult<String> {
        self.get_string("body")
    }

    pub fn score(&self) -> ThingResult<i64> {
        self.get_i64("score")
    }

    pub fn parent_id(&self) -> ThingResult<String> {
        self.get_string("parent_id")
    }

    pub fn link_id(&self) -> ThingResult<String> {
        self.get_string("link_id")
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

    /// Moderator actions on this comment.
    pub fn moderation(&self) -> CommentModeration<'_> {
        CommentModeration { comment: self }
    }

    fn linked_submission(&self) -> Option<Submission> {
        match &*self.inner.submission.borrow() {
            SubmissionLink::Unset => None,
            SubmissionLink::Owned(submission) => Some(submission.clone()),
            SubmissionLink::Shared(weak) => weak.upgrade(),
        }
    }

    fn submission_id(&self) -> ThingResult<String> {
        if let Some(context) = self.cached_str("context") {
            let mut parts: Vec<&str> = context.rsplitn(5, '/').collect();
            parts.reverse();
            return parts
                .get(1)
                .filter(|id| !id.is_empty())
                .map(|id| id.to_string())
                .ok_or_else(|| {
                    ThingError::unexpected_shape(format!("no submission id in context {context:?}"))
                });
        }
        let link_id = self.get_string("link_id")?;
        Ok(link_id
            .split_once('_')
            .map_or(link_id.as_str(), |(_, id)| id)
            .to_string())
    }

    fn cached_str(&self, name: &str) -> Option<String> {
        self.cached(name)
            .and_then(|value| value.as_str().map(str::to_owned))
    }

    fn adopt_replies(&self, other: &Comment) {
        let replies = other.inner.replies.borrow().clone();
        *self.inner.replies.borrow_mut() = replies;
    }

    fn refresh_request(&self, submission: &Submission) -> (String, Vec<(String, String)>) {
        let path = match self.cached_str("context") {
            Some(context) => context
                .split('?')
                .next()
                .unwrap_or_default()
                .trim_start_matches('/')
                .to_string(),
            None => format!("{}_/{}", paths::submission(submission.id_str()), self.inner.id),
        };

        let context = self.inner.reddit.config().comment_context.to_string();
        let mut query = params([("context", context)]);
        for (attribute, param) in [("reply_limit", "limit"), ("reply_sort", "sort")] {
            if let Some(value) = self.cached(attribute).as_ref().and_then(param_value) {
                query.push((param.to_string(), value));
            }
        }
        (path, query)
    }
}

/// Moderator actions on one comment, from [`Comment::moderation`].
pub struct CommentModeration<'a> {
    comment: &'a Comment,
}

impl CommentModeration<'_> {
    /// Uncollapse a comment hidden by crowd control.
    pub fn show(&self) -> ThingResult<()> {
        let id = self.comment.fullname();
        debug!(%id, "showing comment");
        self.comment
            .inner
            .reddit
            .post(paths::SHOW_COMMENT, &params([("id", id)]))?;
        Ok(())
    }
}

fn param_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl Entity for Comment {
    type Id = ThingId;

    fn id(&self) -> ThingId {
        self.inner.id.clone()
    }

    fn type_name(&self) -> &'static str {
        "Comment"
    }
}

impl LazyEntity for Comment {
    fn reddit(&self) -> &Reddit {
        &self.inner.reddit
    }

    fn core(&self) -> &RefCell<EntityCore> {
        &self.inner.core
    }

    fn identity_attributes(&self) -> &'static [&'static str] {
        &["id"]
    }

    /// `GET api/info/?id=t1_<id>`.
    fn load(&self) -> ThingResult<AttributeStore<Value>> {
        let fullname = self.fullname();
        let reddit = &self.inner.reddit;
        let raw = reddit.get_json(paths::INFO, &params([("id", fullname.as_str())]))?;

        let mut data = data_object(raw, paths::INFO)?;
        let first = match data.remove("children") {
            Some(JsonValue::Array(children)) => children.into_iter().next(),
            _ => None,
        };
        let Some(child) = first else {
            return Err(ThingError::client(format!(
                "No data returned for comment {fullname}"
            )));
        };

        let comment_data = data_object(child, paths::INFO)?;
        let other = Comment::from_attributes(reddit, reddit.objector().objectify_members(reddit, comment_data)?)?;
        self.adopt_replies(&other);
        let attributes = other.attributes();
        Ok(attributes)
    }

    /// Re-fetch through the comment's own page, which also brings its replies.
    ///
    /// The returned tree is searched last-in first-out; every returned comment is
    /// re-linked to this comment's submission.
    fn refresh(&self) -> ThingResult<()> {
        let submission = self.submission()?;
        let (path, query) = self.refresh_request(&submission);

        self.run_fetch(|| {
            let response = self.inner.reddit.get(&path, &query)?;
            let comment_list = response
                .into_array()
                .and_then(|pages| pages.into_iter().nth(1))
                .and_then(Value::into_listing)
                .map(Listing::into_children)
                .unwrap_or_default();
            let top_level: Vec<Comment> = comment_list
                .into_iter()
                .filter_map(|value| match value {
                    Value::Thing(Thing::Comment(comment)) => Some(comment),
                    _ => None,
                })
                .collect();
            if top_level.is_empty() {
                return Err(ThingError::client(MISSING_COMMENT));
            }

            let mut queue = top_level.clone();
            let mut found = None;
            while let Some(candidate) = queue.pop() {
                if candidate.inner.id == self.inner.id {
                    found = Some(candidate);
                    break;
                }
                queue.extend(candidate.replies().comments().cloned());
            }
            let found = found.ok_or_else(|| ThingError::client(MISSING_COMMENT))?;

            self.adopt_replies(&found);
            for comment in &top_level {
                comment.attach_to(&submission);
            }
            let attributes = found.attributes();
            Ok(attributes)
        })
    }
}

impl PartialEq for Comment {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Comment {}

impl PartialEq<str> for Comment {
    fn eq(&self, other: &str) -> bool {
        self.inner.id.eq_str(other)
    }
}

impl PartialEq<&str> for Comment {
    fn eq(&self, other: &&str) -> bool {
        self.inner.id.eq_str(other)
    }
}

impl Hash for Comment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner.id, f)
    }
}

impl fmt::Debug for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Comment(id={:?})", self.inner.id.as_str())
    }
}
