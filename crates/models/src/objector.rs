//! Error classification and JSON → [`Value`] objectification.

use std::collections::HashMap;

use serde_json::{Map, Value as JsonValue};
use thingkit_core::{AttributeStore, ErrorItem, RedditApiError, ThingError, ThingResult};
use tracing::{trace, warn};

use crate::comment::Comment;
use crate::config::{Kinds, ThingKind};
use crate::listing::{Listing, ListingKind};
use crate::message::{Message, Trophy};
use crate::more::MoreComments;
use crate::reddit::Reddit;
use crate::redditor::Redditor;
use crate::submission::Submission;
use crate::subreddit::Subreddit;
use crate::thing::Thing;
use crate::value::{Record, Value};

const NO_ERROR_DETECTED: &str = "No error was detected in the response where one was expected.";

/// Turns raw responses into [`Value`]s using the tag table of one client.
#[derive(Debug, Clone)]
pub struct Objector {
    table: HashMap<String, ThingKind>,
}

impl Objector {
    pub fn new(kinds: &Kinds) -> ThingResult<Self> {
        Ok(Self {
            table: kinds.dispatch_table()?,
        })
    }

    /// Kind mapped to `tag`, if any.
    pub fn kind_of(&self, tag: &str) -> Option<ThingKind> {
        self.table.get(tag).copied()
    }

    /// Parse a `{"json": {"errors": [...]}}` envelope.
    ///
    /// Any other shape yields `Ok(None)`. A present but empty list is an error: the
    /// caller expected one.
    pub fn parse_error(raw: &JsonValue) -> ThingResult<Option<RedditApiError>> {
        let Some(errors) = error_list(raw) else {
            return Ok(None);
        };
        if errors.is_empty() {
            return Err(ThingError::client(NO_ERROR_DETECTED));
        }
        let items = errors.iter().map(error_item).collect::<ThingResult<Vec<_>>>()?;
        RedditApiError::new(items).map(Some)
    }

    /// Fail with [`ThingError::Api`] when `raw` carries reported errors.
    pub fn check_error(raw: &JsonValue) -> ThingResult<()> {
        match Self::parse_error(raw)? {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Like [`Objector::check_error`], but an empty list counts as success.
    ///
    /// Write endpoints answer `{"json": {"errors": []}}` when all went well.
    pub fn raise_reported(raw: &JsonValue) -> ThingResult<()> {
        match error_list(raw) {
            Some(errors) if !errors.is_empty() => Self::check_error(raw),
            _ => Ok(()),
        }
    }

    /// Convert `raw` into a [`Value`], building things from tagged payloads.
    ///
    /// Reported API errors fail the whole conversion.
    pub fn objectify(&self, reddit: &Reddit, raw: JsonValue) -> ThingResult<Value> {
        if raw.is_object() {
            Self::raise_reported(&raw)?;
        }
        match raw {
            JsonValue::Null => Ok(Value::Null),
            JsonValue::Bool(b) => Ok(Value::Bool(b)),
            JsonValue::Number(n) => Ok(Value::Number(n)),
            JsonValue::String(s) => Ok(Value::String(s)),
            JsonValue::Array(items) => items
                .into_iter()
                .map(|item| self.objectify(reddit, item))
                .collect::<ThingResult<Vec<_>>>()
                .map(Value::Array),
            JsonValue::Object(map) => self.objectify_object(reddit, map),
        }
    }

    /// Objectify `raw` as a listing of `kind`, whatever shape detection would pick.
    ///
    /// Accepts the bare listing object or the tagged `{"kind": "Listing", "data": {..}}`
    /// form.
    pub fn objectify_listing(
        &self,
        reddit: &Reddit,
        raw: JsonValue,
        kind: ListingKind,
    ) -> ThingResult<Listing> {
        Self::raise_reported(&raw)?;
        let mut map = match raw {
            JsonValue::Object(map) => map,
            other => {
                return Err(ThingError::unexpected_shape(format!(
                    "expected a listing object, got {other}"
                )));
            }
        };
        if map.get("kind").and_then(JsonValue::as_str) == Some(reddit.kinds().listing.as_str()) {
            if let Some(JsonValue::Object(data)) = map.remove("data") {
                map = data;
            }
        }
        self.build_listing(reddit, map, kind)
    }

    /// Objectify every member of a `data` object.
    pub fn objectify_members(
        &self,
        reddit: &Reddit,
        data: Map<String, JsonValue>,
    ) -> ThingResult<AttributeStore<Value>> {
        data.into_iter()
            .map(|(name, raw)| Ok((name, self.objectify(reddit, raw)?)))
            .collect()
    }

    fn objectify_object(&self, reddit: &Reddit, mut map: Map<String, JsonValue>) -> ThingResult<Value> {
        let wraps_data = map.get("json").and_then(|json| json.get("data")).is_some();
        if wraps_data {
            let data = map
                .remove("json")
                .and_then(|mut json| json.get_mut("data").map(JsonValue::take))
                .unwrap_or_default();
            return match data {
                JsonValue::Object(mut data) => match data.remove("things") {
                    Some(things) => self.objectify(reddit, things),
                    None => self.objectify_object(reddit, data),
                },
                other => self.objectify(reddit, other),
            };
        }

        let tagged = map.get("kind").is_some_and(JsonValue::is_string)
            && map.get("data").is_some_and(JsonValue::is_object);
        if tagged {
            let tag = match map.remove("kind") {
                Some(JsonValue::String(tag)) => tag,
                _ => String::new(),
            };
            let data = match map.remove("data") {
                Some(JsonValue::Object(data)) => data,
                _ => Map::new(),
            };
            return self.objectify_tagged(reddit, &tag, data);
        }

        if let Some(kind) = listing_shape(&map) {
            trace!(?kind, "untagged listing");
            return self.build_listing(reddit, map, kind).map(Value::Listing);
        }

        if is_redditor_shape(&map) {
            return Redditor::from_attributes(reddit, self.objectify_members(reddit, map)?)
                .map(|redditor| Value::Thing(Thing::Redditor(redditor)));
        }

        let attributes = self.objectify_members(reddit, map)?;
        Ok(Value::Object(Record::new(None, attributes)))
    }

    fn objectify_tagged(
        &self,
        reddit: &Reddit,
        tag: &str,
        mut data: Map<String, JsonValue>,
    ) -> ThingResult<Value> {
        let Some(kind) = self.kind_of(tag) else {
            warn!(%tag, "unknown kind tag, falling back to a record");
            let attributes = self.objectify_members(reddit, data)?;
            return Ok(Value::Object(Record::new(Some(tag.to_string()), attributes)));
        };
        trace!(%tag, ?kind, "objectify");

        let thing = match kind {
            ThingKind::Listing => {
                return self
                    .build_listing(reddit, data, ListingKind::Standard)
                    .map(Value::Listing);
            }
            ThingKind::TrophyList => {
                let trophies = data.remove("trophies").unwrap_or(JsonValue::Array(Vec::new()));
                return self.objectify(reddit, trophies);
            }
            ThingKind::UserList => {
                let users = match data.remove("children") {
                    Some(JsonValue::Array(users)) => users,
                    _ => Vec::new(),
                };
                return users
                    .into_iter()
                    .map(|user| match user {
                        JsonValue::Object(user) => Redditor::from_attributes(
                            reddit,
                            self.objectify_members(reddit, user)?,
                        )
                        .map(|redditor| Value::Thing(Thing::Redditor(redditor))),
                        other => self.objectify(reddit, other),
                    })
                    .collect::<ThingResult<Vec<_>>>()
                    .map(Value::Array);
            }
            ThingKind::Comment => {
                Thing::Comment(Comment::from_attributes(reddit, self.objectify_members(reddit, data)?)?)
            }
            ThingKind::Redditor => Thing::Redditor(Redditor::from_attributes(
                reddit,
                self.objectify_members(reddit, data)?,
            )?),
            ThingKind::Submission => Thing::Submission(Submission::from_attributes(
                reddit,
                self.objectify_members(reddit, data)?,
            )?),
            ThingKind::Subreddit => Thing::Subreddit(Subreddit::from_attributes(
                reddit,
                self.objectify_members(reddit, data)?,
            )?),
            ThingKind::MoreComments => {
                Thing::MoreComments(MoreComments::from_attributes(self.objectify_members(reddit, data)?))
            }
            ThingKind::Message => Thing::Message(Message::new(self.objectify_members(reddit, data)?)),
            ThingKind::Trophy => Thing::Trophy(Trophy::new(self.objectify_members(reddit, data)?)),
        };
        Ok(Value::Thing(thing))
    }

    fn build_listing(
        &self,
        reddit: &Reddit,
        mut map: Map<String, JsonValue>,
        kind: ListingKind,
    ) -> ThingResult<Listing> {
        let children = match map.remove(kind.child_field()) {
            Some(JsonValue::Array(children)) => children,
            // Modmail keys conversations by id.
            Some(JsonValue::Object(children)) => keyed_children(children, map.get("conversationIds")),
            Some(JsonValue::Null) | None => Vec::new(),
            Some(other) => {
                return Err(ThingError::unexpected_shape(format!(
                    "listing member `{}` is not an array: {other}",
                    kind.child_field()
                )));
            }
        };
        let children = children
            .into_iter()
            .map(|child| self.objectify(reddit, child))
            .collect::<ThingResult<Vec<_>>>()?;
        let attributes = self.objectify_members(reddit, map)?;
        Ok(Listing::new(kind, children, attributes))
    }
}

/// Children of an id-keyed object, in the order of `order` when it lists their ids.
///
/// Keys missing from `order` follow in map order.
fn keyed_children(mut children: Map<String, JsonValue>, order: Option<&JsonValue>) -> Vec<JsonValue> {
    let mut ordered = Vec::with_capacity(children.len());
    if let Some(ids) = order.and_then(JsonValue::as_array) {
        for id in ids.iter().filter_map(JsonValue::as_str) {
            if let Some(child) = children.remove(id) {
                ordered.push(child);
            }
        }
    }
    ordered.extend(children.into_iter().map(|(_, child)| child));
    ordered
}

fn error_list(raw: &JsonValue) -> Option<&Vec<JsonValue>> {
    raw.get("json")?.get("errors")?.as_array()
}

fn error_item(raw: &JsonValue) -> ThingResult<ErrorItem> {
    let malformed = || ThingError::unexpected_shape(format!("malformed error item: {raw}"));
    let parts = raw.as_array().ok_or_else(malformed)?;
    let text = |index: usize| parts.get(index).and_then(JsonValue::as_str);

    let error_type = text(0).ok_or_else(malformed)?;
    let message = text(1).unwrap_or_default();
    Ok(ErrorItem::new(error_type, message, text(2)))
}

/// Listing kind implied by an untagged object's members.
fn listing_shape(map: &Map<String, JsonValue>) -> Option<ListingKind> {
    let array = |field: &str| map.get(field).is_some_and(JsonValue::is_array);
    if array("children") && map.contains_key("after") {
        Some(ListingKind::Standard)
    } else if array("users") && map.contains_key("next") {
        Some(ListingKind::Flair)
    } else if array("mod_notes") && (map.contains_key("end_cursor") || map.contains_key("has_next_page")) {
        Some(ListingKind::ModNote)
    } else if array("moderators") && map.contains_key("after") {
        Some(ListingKind::Moderator)
    } else if map.contains_key("conversations") && map.contains_key("conversationIds") {
        Some(ListingKind::ModmailConversations)
    } else {
        None
    }
}

/// Friend and moderator entries are untagged redditor payloads.
fn is_redditor_shape(map: &Map<String, JsonValue>) -> bool {
    let has = |keys: &[&str]| keys.iter().all(|key| map.contains_key(*key));
    has(&["date", "id", "name"]) || has(&["id", "name", "permissions"])
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

    fn objectify(raw: JsonValue) -> Value {
        let reddit = reddit();
        reddit.objectify(raw).unwrap()
    }

    fn user_required() -> JsonValue {
        json!({"json": {"errors": [["USER_REQUIRED", "Please log in to do that.", null]]}})
    }

    #[test]
    fn parse_error_ignores_irrelevant_shapes() {
        assert!(Objector::parse_error(&json!({})).unwrap().is_none());
        assert!(Objector::parse_error(&json!([])).unwrap().is_none());
        assert!(Objector::parse_error(&json!({"asdf": 1})).unwrap().is_none());
        assert!(Objector::parse_error(&json!({"error": 404, "message": "Not Found"})).unwrap().is_none());
        Objector::check_error(&json!({"asdf": 1})).unwrap();
    }

    #[test]
    fn parse_error_builds_one_item_per_triple() {
        let err = Objector::parse_error(&user_required()).unwrap().unwrap();
        assert_eq!(err.len(), 1);
        assert_eq!(err.first().field(), None);

        let raw = json!({"json": {"errors": [
            ["USER_REQUIRED", "Please log in to do that.", null],
            ["NO_SUBJECT", "please enter a subject", "subject"],
        ]}});
        let err = Objector::parse_error(&raw).unwrap().unwrap();
        assert_eq!(err.len(), 2);
        assert_eq!(err.items()[1], ErrorItem::new("NO_SUBJECT", "please enter a subject", Some("subject")));
    }

    #[test]
    fn empty_error_list_is_a_client_error() {
        let err = Objector::parse_error(&json!({"json": {"errors": []}})).unwrap_err();
        assert!(err.is_client());
        assert_eq!(err.to_string(), NO_ERROR_DETECTED);
        Objector::raise_reported(&json!({"json": {"errors": []}})).unwrap();
    }

    #[test]
    fn check_error_raises_api_errors() {
        let err = Objector::check_error(&user_required()).unwrap_err();
        assert_eq!(err.as_api().unwrap().first().error_type(), "USER_REQUIRED");
    }

    #[test]
    fn null_and_scalars_pass_through() {
        assert_eq!(objectify(JsonValue::Null), Value::Null);
        assert_eq!(objectify(json!("text")), "text");
        assert_eq!(objectify(json!(7)), 7i64);
        assert_eq!(objectify(json!(true)), Value::Bool(true));
    }

    #[test]
    fn arrays_keep_order() {
        let value = objectify(json!(["a", 1, null]));
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], "a");
        assert_eq!(items[1], 1i64);
        assert!(items[2].is_null());
    }

    #[test]
    fn every_known_tag_dispatches() {
        let reddit = reddit();
        let objector = reddit.objector();
        for kind in ThingKind::ALL {
            assert_eq!(objector.kind_of(reddit.kinds().tag(kind)), Some(kind));
        }
        assert_eq!(objector.kind_of("t9"), None);
    }

    #[test]
    fn tagged_comment_becomes_a_comment() {
        let value = objectify(json!({"kind": "t1", "data": {"id": "x", "body": "hello"}}));
        let comment = value.as_comment().unwrap();
        assert_eq!(comment.to_string(), "x");
        assert_eq!(value.type_label(), "Comment");
    }

    #[test]
    fn tagged_things_map_to_their_types() {
        let cases = [
            (json!({"kind": "t2", "data": {"name": "spez"}}), "Redditor"),
            (json!({"kind": "t3", "data": {"id": "2gmzqe"}}), "Submission"),
            (json!({"kind": "t4", "data": {"id": "m1"}}), "Message"),
            (json!({"kind": "t5", "data": {"display_name": "redditdev"}}), "Subreddit"),
            (json!({"kind": "t6", "data": {"name": "Verified Email"}}), "Trophy"),
            (json!({"kind": "more", "data": {"count": 2, "children": ["a", "b"]}}), "MoreComments"),
        ];
        for (raw, expected) in cases {
            assert_eq!(objectify(raw).type_label(), expected);
        }
    }

    #[test]
    fn unknown_tag_degrades_to_record() {
        let value = objectify(json!({"kind": "t9", "data": {"id": "z", "score": 1}}));
        let record = value.as_record().unwrap();
        assert_eq!(record.kind(), Some("t9"));
        assert_eq!(record.get("score").unwrap(), &1i64);
    }

    #[test]
    fn untagged_listing_shapes_are_detected() {
        let value = objectify(json!({"children": [{"kind": "t1", "data": {"id": "a"}}], "after": "t1_a"}));
        let listing = value.as_listing().unwrap();
        assert_eq!(listing.kind(), ListingKind::Standard);
        assert_eq!(listing.after().as_deref(), Some("t1_a"));
        assert!(listing.children()[0].as_comment().is_some());

        let flair = objectify(json!({"users": [], "next": "n"}));
        assert_eq!(flair.as_listing().unwrap().kind(), ListingKind::Flair);

        let notes = objectify(json!({"mod_notes": [], "has_next_page": false, "end_cursor": "c"}));
        let notes = notes.as_listing().unwrap();
        assert_eq!(notes.kind(), ListingKind::ModNote);
        assert_eq!(notes.after(), None);
    }

    #[test]
    fn listing_kind_can_be_forced() {
        let reddit = reddit();
        let raw = json!({"moderators": [{"name": "spez", "id": "t2_1", "permissions": ["all"]}], "after": null});
        let listing = reddit
            .objector()
            .objectify_listing(&reddit, raw, ListingKind::Moderator)
            .unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing.children()[0].as_redditor().unwrap().to_string(), "spez");
        assert_eq!(listing.after(), None);
    }

    #[test]
    fn tagged_listing_objectifies_children() {
        let value = objectify(json!({
            "kind": "Listing",
            "data": {"after": null, "children": [
                {"kind": "t3", "data": {"id": "a"}},
                {"kind": "t3", "data": {"id": "b"}},
            ]},
        }));
        let listing = value.into_listing().unwrap();
        let ids: Vec<_> = listing.iter().filter_map(Value::identity).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn trophy_and_user_lists_become_arrays() {
        let trophies = objectify(json!({"kind": "TrophyList", "data": {"trophies": [
            {"kind": "t6", "data": {"name": "Three-Year Club"}},
        ]}}));
        assert_eq!(trophies.as_array().unwrap()[0].type_label(), "Trophy");

        let users = objectify(json!({"kind": "UserList", "data": {"children": [
            {"date": 1.0, "id": "t2_1", "name": "spez"},
        ]}}));
        assert_eq!(users.as_array().unwrap()[0].as_redditor().unwrap().to_string(), "spez");
    }

    #[test]
    fn json_data_envelopes_are_unwrapped() {
        let value = objectify(json!({"json": {"errors": [], "data": {"things": [
            {"kind": "t1", "data": {"id": "new"}},
        ]}}}));
        assert_eq!(value.as_array().unwrap()[0].identity().as_deref(), Some("new"));
    }

    #[test]
    fn reported_errors_fail_objectification() {
        let err = reddit().objectify(user_required()).unwrap_err();
        assert!(err.as_api().is_some());
    }

    #[test]
    fn unknown_objects_become_records() {
        let value = objectify(json!({"asdf": {"nested": [1, 2]}}));
        let record = value.as_record().unwrap();
        assert_eq!(record.kind(), None);
        assert_eq!(record.get("asdf").unwrap().as_record().unwrap().len(), 1);
    }

    #[test]
    fn modmail_conversations_keep_server_order() {
        let reddit = reddit();
        let raw = json!({
            "conversations": {"zz1": {"id": "zz1"}, "mm3": {"id": "mm3"}, "aa2": {"id": "aa2"}},
            "conversationIds": ["zz1", "aa2"],
            "messages": {},
        });
        let listing = reddit
            .objector()
            .objectify_listing(&reddit, raw, ListingKind::ModmailConversations)
            .unwrap();
        let order: Vec<_> = listing.children().iter().filter_map(Value::identity).collect();
        assert_eq!(order, ["zz1", "aa2", "mm3"]);
        assert_eq!(listing.after().as_deref(), Some("mm3"));

        let raw = json!({
            "conversations": {"zz1": {"id": "zz1"}, "aa2": {"id": "aa2"}},
            "conversationIds": ["zz1", "aa2"],
        });
        let listing = reddit.objectify(raw).unwrap().into_listing().unwrap();
        assert_eq!(listing.after().as_deref(), Some("aa2"));
    }
}
