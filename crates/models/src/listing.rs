//! One page of paginated results.

use thingkit_core::AttributeStore;

use crate::value::Value;

/// Listing flavour: which member holds the children and how the next cursor is found.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum ListingKind {
    /// `children` + `after`.
    #[default]
    Standard,
    /// `users` + `next`.
    Flair,
    /// `mod_notes` + `end_cursor`/`has_next_page`, paged with `before`.
    ModNote,
    /// `moderators` + `after`.
    Moderator,
    /// `conversations`; the cursor is the last conversation id.
    ModmailConversations,
}

impl ListingKind {
    pub const ALL: [ListingKind; 5] = [
        ListingKind::Standard,
        ListingKind::Flair,
        ListingKind::ModNote,
        ListingKind::Moderator,
        ListingKind::ModmailConversations,
    ];

    /// Member holding the page's items.
    pub fn child_field(self) -> &'static str {
        match self {
            ListingKind::Standard => "children",
            ListingKind::Flair => "users",
            ListingKind::ModNote => "mod_notes",
            ListingKind::Moderator => "moderators",
            ListingKind::ModmailConversations => "conversations",
        }
    }

    /// Request parameter that carries the cursor.
    pub fn cursor_param(self) -> &'static str {
        match self {
            ListingKind::ModNote => "before",
            _ => "after",
        }
    }
}

/// Ordered children plus the remaining members of the page (cursor fields etc).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Listing {
    kind: ListingKind,
    children: Vec<Value>,
    attributes: AttributeStore<Value>,
}

impl Listing {
    pub fn new(kind: ListingKind, children: Vec<Value>, attributes: AttributeStore<Value>) -> Self {
        Self {
            kind,
            children,
            attributes,
        }
    }

    pub fn kind(&self) -> ListingKind {
        self.kind
    }

    pub fn children(&self) -> &[Value] {
        &self.children
    }

    pub fn into_children(self) -> Vec<Value> {
        self.children
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.children.get(index)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.children.iter()
    }

    /// Non-child member, e.g. `before` or `dist`.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> &AttributeStore<Value> {
        &self.attributes
    }

    /// Cursor for the next page, `None` once exhausted.
    ///
    /// Depends on nothing but this page.
    pub fn after(&self) -> Option<String> {
        match self.kind {
            ListingKind::Standard | ListingKind::Moderator => self.string_member("after"),
            ListingKind::Flair => self.string_member("next"),
            ListingKind::ModNote => {
                let has_next = self
                    .attributes
                    .get("has_next_page")
                    .and_then(Value::as_bool)
                    .unwrap_or(true);
                if has_next {
                    self.string_member("end_cursor")
                } else {
                    None
                }
            }
            ListingKind::ModmailConversations => {
                self.children.last().and_then(Value::identity)
            }
        }
    }

    fn string_member(&self, name: &str) -> Option<String> {
        self.attributes
            .get(name)
            .and_then(Value::as_str)
            .filter(|cursor| !cursor.is_empty())
            .map(str::to_owned)
    }
}

impl IntoIterator for Listing {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Record;

    fn members(pairs: Vec<(&str, Value)>) -> AttributeStore<Value> {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    fn conversation(id: &str) -> Value {
        Value::Object(Record::new(None, members(vec![("id", Value::from(id))])))
    }

    #[test]
    fn standard_cursor_is_after() {
        let page = Listing::new(
            ListingKind::Standard,
            vec![Value::from("a")],
            members(vec![("after", Value::from("t3_b"))]),
        );
        assert_eq!(page.after().as_deref(), Some("t3_b"));

        let last = Listing::new(ListingKind::Standard, vec![], members(vec![("after", Value::Null)]));
        assert_eq!(last.after(), None);
        assert_eq!(Listing::default().after(), None);
    }

    #[test]
    fn flair_cursor_is_next() {
        let page = Listing::new(
            ListingKind::Flair,
            vec![],
            members(vec![("next", Value::from("n1")), ("after", Value::from("ignored"))]),
        );
        assert_eq!(page.after().as_deref(), Some("n1"));
    }

    #[test]
    fn mod_note_cursor_respects_has_next_page() {
        let more = Listing::new(
            ListingKind::ModNote,
            vec![],
            members(vec![
                ("end_cursor", Value::from("c1")),
                ("has_next_page", Value::from(true)),
            ]),
        );
        assert_eq!(more.after().as_deref(), Some("c1"));

        let done = Listing::new(
            ListingKind::ModNote,
            vec![],
            members(vec![
                ("end_cursor", Value::from("c2")),
                ("has_next_page", Value::from(false)),
            ]),
        );
        assert_eq!(done.after(), None);
        assert_eq!(ListingKind::ModNote.cursor_param(), "before");
    }

    #[test]
    fn modmail_cursor_is_last_conversation_id() {
        let page = Listing::new(
            ListingKind::ModmailConversations,
            vec![conversation("a1"), conversation("b2")],
            AttributeStore::new(),
        );
        assert_eq!(page.after().as_deref(), Some("b2"));

        let empty = Listing::new(ListingKind::ModmailConversations, vec![], AttributeStore::new());
        assert_eq!(empty.after(), None);
    }

    #[test]
    fn child_fields_are_distinct() {
        let mut fields: Vec<_> = ListingKind::ALL.iter().map(|k| k.child_field()).collect();
        fields.sort_unstable();
        fields.dedup();
        assert_eq!(fields.len(), ListingKind::ALL.len());
    }
}
