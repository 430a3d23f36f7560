//! Reply trees.

use std::collections::VecDeque;

use tracing::trace;

use crate::comment::Comment;
use crate::more::MoreComments;
use crate::thing::Thing;
use crate::value::Value;

/// One entry of a [`CommentForest`].
#[derive(Debug, Clone, PartialEq)]
pub enum ForestNode {
    Comment(Comment),
    More(MoreComments),
}

impl ForestNode {
    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            ForestNode::Comment(comment) => Some(comment),
            ForestNode::More(_) => None,
        }
    }

    pub fn as_more(&self) -> Option<&MoreComments> {
        match self {
            ForestNode::More(more) => Some(more),
            ForestNode::Comment(_) => None,
        }
    }
}

/// Top-level replies of a submission or comment, `more` placeholders included.
///
/// Cloning is shallow: the comments are shared handles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentForest {
    nodes: Vec<ForestNode>,
}

impl CommentForest {
    /// Keep comments and placeholders, in order. Anything else is dropped.
    pub fn from_values(values: Vec<Value>) -> Self {
        let nodes = values
            .into_iter()
            .filter_map(|value| match value {
                Value::Thing(Thing::Comment(comment)) => Some(ForestNode::Comment(comment)),
                Value::Thing(Thing::MoreComments(more)) => Some(ForestNode::More(more)),
                other => {
                    trace!(kind = other.type_label(), "skipping non-comment reply");
                    None
                }
            })
            .collect();
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ForestNode> {
        self.nodes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ForestNode> {
        self.nodes.iter()
    }

    /// Top-level comments, placeholders skipped.
    pub fn comments(&self) -> impl Iterator<Item = &Comment> {
        self.nodes.iter().filter_map(ForestNode::as_comment)
    }

    /// Top-level placeholders.
    pub fn more(&self) -> impl Iterator<Item = &MoreComments> {
        self.nodes.iter().filter_map(ForestNode::as_more)
    }

    /// Every node of the tree, breadth first.
    pub fn list(&self) -> Vec<ForestNode> {
        let mut queue: VecDeque<ForestNode> = self.nodes.iter().cloned().collect();
        let mut flat = Vec::with_capacity(queue.len());
        while let Some(node) = queue.pop_front() {
            if let ForestNode::Comment(comment) = &node {
                queue.extend(comment.replies().nodes);
            }
            flat.push(node);
        }
        flat
    }
}

impl IntoIterator for CommentForest {
    type Item = ForestNode;
    type IntoIter = std::vec::IntoIter<ForestNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}
