//! Objectified values.
//!
//! [`Value`] mirrors `serde_json::Value` with three additions: typed things, listings and
//! generic records for mappings nobody recognised.

use core::fmt;

use serde_json::Number;
use thingkit_core::{AttributeStore, ThingError, ThingResult};

use crate::comment::Comment;
use crate::listing::Listing;
use crate::more::MoreComments;
use crate::redditor::Redditor;
use crate::submission::Submission;
use crate::subreddit::Subreddit;
use crate::thing::Thing;

/// Result of objectifying a JSON payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Thing(Thing),
    Listing(Listing),
    Object(Record),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn into_array(self) -> Option<Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_thing(&self) -> Option<&Thing> {
        match self {
            Value::Thing(thing) => Some(thing),
            _ => None,
        }
    }

    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            Value::Thing(Thing::Comment(comment)) => Some(comment),
            _ => None,
        }
    }

    pub fn as_redditor(&self) -> Option<&Redditor> {
        match self {
            Value::Thing(Thing::Redditor(redditor)) => Some(redditor),
            _ => None,
        }
    }

    pub fn as_submission(&self) -> Option<&Submission> {
        match self {
            Value::Thing(Thing::Submission(submission)) => Some(submission),
            _ => None,
        }
    }

    pub fn as_subreddit(&self) -> Option<&Subreddit> {
        match self {
            Value::Thing(Thing::Subreddit(subreddit)) => Some(subreddit),
            _ => None,
        }
    }

    pub fn as_more(&self) -> Option<&MoreComments> {
        match self {
            Value::Thing(Thing::MoreComments(more)) => Some(more),
            _ => None,
        }
    }

    pub fn as_listing(&self) -> Option<&Listing> {
        match self {
            Value::Listing(listing) => Some(listing),
            _ => None,
        }
    }

    pub fn into_listing(self) -> Option<Listing> {
        match self {
            Value::Listing(listing) => Some(listing),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Object(record) => Some(record),
            _ => None,
        }
    }

    /// Display identity of a thing, or the `id` member of a record.
    pub fn identity(&self) -> Option<String> {
        match self {
            Value::Thing(thing) => Some(thing.to_string()),
            Value::Object(record) => record.get("id").and_then(Value::as_str).map(str::to_owned),
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Short description of the variant, for error messages.
    pub fn type_label(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Thing(thing) => thing.type_name(),
            Value::Listing(_) => "listing",
            Value::Object(_) => "object",
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value.into())
    }
}

impl From<Thing> for Value {
    fn from(value: Thing) -> Self {
        Value::Thing(value)
    }
}

impl From<Listing> for Value {
    fn from(value: Listing) -> Self {
        Value::Listing(value)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_i64() == Some(*other)
    }
}

/// Generic attribute bag for mappings without a recognised type tag.
///
/// When the mapping carried an unknown `kind` tag, the tag is kept in [`Record::kind`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    kind: Option<String>,
    attributes: AttributeStore<Value>,
}

impl Record {
    pub fn new(kind: Option<String>, attributes: AttributeStore<Value>) -> Self {
        Self { kind, attributes }
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Like [`Record::get`], failing with an attribute error when absent.
    pub fn attribute(&self, name: &str) -> ThingResult<&Value> {
        self.attributes
            .get(name)
            .ok_or_else(|| ThingError::missing_attribute(self.type_name(), name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.names()
    }

    pub fn attributes(&self) -> &AttributeStore<Value> {
        &self.attributes
    }

    pub fn into_attributes(self) -> AttributeStore<Value> {
        self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    fn type_name(&self) -> String {
        match &self.kind {
            Some(kind) => format!("Record<{kind}>"),
            None => "Record".to_string(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.attributes.names().collect::<Vec<_>>().join(", ");
        write!(f, "{}({names})", self.type_name())
    }
}
