use core::fmt;

use thingkit_core::AttributeStore;

use crate::value::Value;

/// Placeholder for a collapsed part of a comment tree.
///
/// Expanding it is a separate request the caller makes; the client never does it
/// implicitly.
#[derive(Debug, Clone)]
pub struct MoreComments {
    count: i64,
    children: Vec<String>,
    attributes: AttributeStore<Value>,
}

impl MoreComments {
    pub fn from_attributes(attributes: AttributeStore<Value>) -> Self {
        let count = attributes.get("count").and_then(Value::as_i64).unwrap_or(0);
        let children = attributes
            .get("children")
            .and_then(Value::as_array)
            .map(|ids| ids.iter().filter_map(Value::as_str).map(str::to_owned).collect())
            .unwrap_or_default();
        Self {
            count,
            children,
            attributes,
        }
    }

    /// Number of comments hidden behind this placeholder.
    pub fn count(&self) -> i64 {
        self.count
    }

    /// Ids of the hidden top-level comments.
    pub fn children(&self) -> &[String] {
        &self.children
    }

    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id").and_then(Value::as_str)
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.attributes.get("parent_id").and_then(Value::as_str)
    }

    pub fn depth(&self) -> Option<i64> {
        self.attributes.get("depth").and_then(Value::as_i64)
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// A "continue this thread" link rather than a list of ids.
    pub fn is_continue_thread(&self) -> bool {
        self.id() == Some("_")
    }
}

impl PartialEq for MoreComments {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.children == other.children
    }
}

impl fmt::Display for MoreComments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview = self.children.iter().take(4).cloned().collect::<Vec<_>>().join(", ");
        if self.children.len() > 4 {
            write!(f, "<MoreComments count={}, children=[{preview}, ...]>", self.count)
        } else {
            write!(f, "<MoreComments count={}, children=[{preview}]>", self.count)
        }
    }
}
