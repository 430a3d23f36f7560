use core::fmt;

use crate::comment::Comment;
use crate::config::ThingKind;
use crate::message::{Message, Trophy};
use crate::more::MoreComments;
use crate::redditor::Redditor;
use crate::submission::Submission;
use crate::subreddit::Subreddit;

/// A typed object built from a `{"kind": tag, "data": {...}}` payload.
#[derive(Clone, PartialEq)]
pub enum Thing {
    Comment(Comment),
    Redditor(Redditor),
    Submission(Submission),
    Subreddit(Subreddit),
    Message(Message),
    Trophy(Trophy),
    MoreComments(MoreComments),
}

impl Thing {
    pub fn kind(&self) -> ThingKind {
        match self {
            Thing::Comment(_) => ThingKind::Comment,
            Thing::Redditor(_) => ThingKind::Redditor,
            Thing::Submission(_) => ThingKind::Submission,
            Thing::Subreddit(_) => ThingKind::Subreddit,
            Thing::Message(_) => ThingKind::Message,
            Thing::Trophy(_) => ThingKind::Trophy,
            Thing::MoreComments(_) => ThingKind::MoreComments,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Thing::Comment(_) => "Comment",
            Thing::Redditor(_) => "Redditor",
            Thing::Submission(_) => "Submission",
            Thing::Subreddit(_) => "Subreddit",
            Thing::Message(_) => "Message",
            Thing::Trophy(_) => "Trophy",
            Thing::MoreComments(_) => "MoreComments",
        }
    }
}

impl fmt::Debug for Thing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Thing::Comment(inner) => fmt::Debug::fmt(inner, f),
            Thing::Redditor(inner) => fmt::Debug::fmt(inner, f),
            Thing::Submission(inner) => fmt::Debug::fmt(inner, f),
            Thing::Subreddit(inner) => fmt::Debug::fmt(inner, f),
            Thing::Message(inner) => fmt::Debug::fmt(inner, f),
            Thing::Trophy(inner) => fmt::Debug::fmt(inner, f),
            Thing::MoreComments(inner) => fmt::Debug::fmt(inner, f),
        }
    }
}

impl fmt::Display for Thing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Thing::Comment(inner) => fmt::Display::fmt(inner, f),
            Thing::Redditor(inner) => fmt::Display::fmt(inner, f),
            Thing::Submission(inner) => fmt::Display::fmt(inner, f),
            Thing::Subreddit(inner) => fmt::Display::fmt(inner, f),
            Thing::Message(inner) => fmt::Display::fmt(inner, f),
            Thing::Trophy(inner) => fmt::Display::fmt(inner, f),
            Thing::MoreComments(inner) => fmt::Display::fmt(inner, f),
        }
    }
}
