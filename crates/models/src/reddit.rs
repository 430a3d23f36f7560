//! Client handle.

use core::fmt;
use std::rc::Rc;
use std::sync::Arc;

use serde_json::Value as JsonValue;
use thingkit_core::{ThingError, ThingResult};
use thingkit_transport::{Method, Params, RequestExecutor};
use tracing::debug;

use crate::comment::{Comment, CommentInit};
use crate::config::{Config, Kinds};
use crate::generator::ListingGenerator;
use crate::listing::ListingKind;
use crate::objector::Objector;
use crate::paths;
use crate::redditor::{Redditor, RedditorInit};
use crate::submission::{Submission, SubmissionInit};
use crate::subreddit::Subreddit;
use crate::value::Value;

/// Entry point: an executor, a [`Config`] and the objector built from it.
///
/// Cheap to clone; every entity keeps a clone to fetch itself later. Not `Send`.
#[derive(Clone)]
pub struct Reddit {
    inner: Rc<RedditInner>,
}

struct RedditInner {
    executor: Arc<dyn RequestExecutor>,
    config: Config,
    objector: Objector,
}

impl Reddit {
    /// Fails when `config.kinds` maps two kinds to the same tag.
    pub fn new(executor: Arc<dyn RequestExecutor>, config: Config) -> ThingResult<Self> {
        let objector = Objector::new(&config.kinds)?;
        Ok(Self {
            inner: Rc::new(RedditInner {
                executor,
                config,
                objector,
            }),
        })
    }

    /// Client with the default configuration.
    pub fn with_executor(executor: Arc<dyn RequestExecutor>) -> ThingResult<Self> {
        Self::new(executor, Config::default())
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn kinds(&self) -> &Kinds {
        &self.inner.config.kinds
    }

    pub fn objector(&self) -> &Objector {
        &self.inner.objector
    }

    /// `GET` returning the raw body after API error classification.
    pub fn get_json(&self, path: &str, params: &Params) -> ThingResult<JsonValue> {
        debug!(%path, "GET");
        let raw = self.inner.executor.get(path, params)?;
        Objector::raise_reported(&raw)?;
        Ok(raw)
    }

    /// `GET` and objectify.
    pub fn get(&self, path: &str, params: &Params) -> ThingResult<Value> {
        let raw = self.get_json(path, params)?;
        self.objectify(raw)
    }

    /// `POST` form data and objectify.
    pub fn post(&self, path: &str, data: &Params) -> ThingResult<Value> {
        debug!(%path, "POST");
        let raw = self.inner.executor.post(path, data)?;
        self.objectify(raw)
    }

    /// Any verb with a JSON body, objectified.
    pub fn request(&self, method: Method, path: &str, body: Option<&JsonValue>) -> ThingResult<Value> {
        debug!(%method, %path, "request");
        let body = body.map(JsonValue::to_string);
        let raw = self.inner.executor.request(method, path, body.as_deref())?;
        self.objectify(raw)
    }

    pub fn objectify(&self, raw: JsonValue) -> ThingResult<Value> {
        self.inner.objector.objectify(self, raw)
    }

    /// Shallow comment by id.
    pub fn comment(&self, id: &str) -> ThingResult<Comment> {
        Comment::new(self, CommentInit::id(id))
    }

    /// Shallow comment from a permalink.
    pub fn comment_from_url(&self, url: &str) -> ThingResult<Comment> {
        Comment::new(self, CommentInit::url(url))
    }

    /// Shallow redditor by name.
    pub fn redditor(&self, name: &str) -> ThingResult<Redditor> {
        Redditor::new(self, RedditorInit::name(name))
    }

    /// Shallow redditor by `t2_` fullname; the name is resolved on fetch.
    pub fn redditor_by_fullname(&self, fullname: &str) -> ThingResult<Redditor> {
        Redditor::new(self, RedditorInit::fullname(fullname))
    }

    pub fn submission(&self, id: &str) -> ThingResult<Submission> {
        Submission::new(self, SubmissionInit::id(id))
    }

    pub fn submission_from_url(&self, url: &str) -> ThingResult<Submission> {
        Submission::new(self, SubmissionInit::url(url))
    }

    pub fn subreddit(&self, display_name: &str) -> ThingResult<Subreddit> {
        Subreddit::from_name(self, display_name)
    }

    /// The authenticated user.
    pub fn me(&self) -> ThingResult<Redditor> {
        let raw = self.get_json(paths::ME, &Params::new())?;
        let data = match raw {
            JsonValue::Object(map) => map,
            other => {
                return Err(ThingError::unexpected_shape(format!(
                    "{}: expected an object, got {other}",
                    paths::ME
                )));
            }
        };
        Redditor::from_json_data(self, data)
    }

    /// Lazy walk over a paginated endpoint.
    pub fn listing(&self, path: impl Into<String>, kind: ListingKind) -> ListingGenerator {
        ListingGenerator::new(self.clone(), path, kind)
    }
}

impl fmt::Debug for Reddit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reddit")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
