//! Lazy page walking.

use std::collections::VecDeque;

use serde_json::Value as JsonValue;
use thingkit_core::ThingResult;
use thingkit_transport::Params;
use tracing::debug;

use crate::listing::{Listing, ListingKind};
use crate::reddit::Reddit;
use crate::value::Value;

/// Iterator over every child of a paginated endpoint.
///
/// A page is requested only when the buffer runs dry. Iteration stops after the page
/// whose cursor is missing (or repeats) without another request. A failed request is
/// yielded once and ends the iteration.
#[derive(Debug)]
pub struct ListingGenerator {
    reddit: Reddit,
    path: String,
    kind: ListingKind,
    params: Params,
    limit: Option<usize>,
    buffer: VecDeque<Value>,
    cursor: Option<String>,
    exhausted: bool,
    done: bool,
    yielded: usize,
}

impl ListingGenerator {
    pub fn new(reddit: Reddit, path: impl Into<String>, kind: ListingKind) -> Self {
        Self {
            reddit,
            path: path.into(),
            kind,
            params: Params::new(),
            limit: None,
            buffer: VecDeque::new(),
            cursor: None,
            exhausted: false,
            done: false,
            yielded: 0,
        }
    }

    /// Yield at most `limit` items overall.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Extra query parameter sent with every page request.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> ListingKind {
        self.kind
    }

    /// Cursor the next page request would carry.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Items yielded so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    fn remaining(&self) -> Option<usize> {
        self.limit.map(|limit| limit.saturating_sub(self.yielded))
    }

    fn next_page(&mut self) -> ThingResult<()> {
        let page_size = self.reddit.config().listing_page_size as usize;
        let per_request = self
            .remaining()
            .map_or(page_size, |remaining| remaining.min(page_size));

        let mut params = self.params.clone();
        params.push(("limit".to_string(), per_request.to_string()));
        if let Some(cursor) = &self.cursor {
            params.push((self.kind.cursor_param().to_string(), cursor.clone()));
        }

        let raw = self.reddit.get_json(&self.path, &params)?;
        let listing = self.objectify_page(raw)?;
        let next = listing.after();
        debug!(
            path = %self.path,
            items = listing.len(),
            next = next.as_deref().unwrap_or("-"),
            "listing page"
        );

        if listing.is_empty() || next.is_none() || next == self.cursor {
            self.exhausted = true;
        }
        self.cursor = next;
        self.buffer.extend(listing.into_children());
        Ok(())
    }

    /// Some endpoints answer `[header listing, item listing, ..]`; the items are the
    /// second element, or the only one.
    fn objectify_page(&self, raw: JsonValue) -> ThingResult<Listing> {
        let raw = match raw {
            JsonValue::Array(mut pages) if pages.len() > 1 => pages.swap_remove(1),
            JsonValue::Array(mut pages) if pages.len() == 1 => pages.swap_remove(0),
            other => other,
        };
        self.reddit
            .objector()
            .objectify_listing(&self.reddit, raw, self.kind)
    }
}

impl Iterator for ListingGenerator {
    type Item = ThingResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.remaining() == Some(0) {
            self.done = true;
            return None;
        }
        if self.buffer.is_empty() {
            if self.exhausted {
                self.done = true;
                return None;
            }
            if let Err(err) = self.next_page() {
                self.done = true;
                return Some(Err(err));
            }
        }
        match self.buffer.pop_front() {
            Some(item) => {
                self.yielded += 1;
                Some(Ok(item))
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use thingkit_transport::{Method, ScriptedExecutor, TransportError};

    fn page(ids: &[&str], after: Option<&str>) -> JsonValue {
        let children: Vec<_> = ids
            .iter()
            .map(|id| json!({"kind": "t1", "data": {"id": id}}))
            .collect();
        json!({"kind": "Listing", "data": {"children": children, "after": after}})
    }

    fn generator(executor: &Arc<ScriptedExecutor>, kind: ListingKind) -> ListingGenerator {
        let reddit = Reddit::with_executor(executor.clone()).unwrap();
        reddit.listing("r/redditdev/comments/", kind)
    }

    fn ids(items: Vec<ThingResult<Value>>) -> Vec<String> {
        items
            .into_iter()
            .map(|item| item.unwrap().identity().unwrap())
            .collect()
    }

    #[test]
    fn walks_pages_until_the_cursor_runs_out() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor
            .respond_get("r/redditdev/comments/", page(&["a", "b"], Some("t1_b")))
            .respond_get("r/redditdev/comments/", page(&["c"], Some("t1_c")))
            .respond_get("r/redditdev/comments/", page(&["d"], None));

        let items: Vec<_> = generator(&executor, ListingKind::Standard).collect();
        assert_eq!(ids(items), ["a", "b", "c", "d"]);
        assert_eq!(executor.call_count(), 3);

        let calls = executor.calls();
        assert_eq!(calls[0].param("after"), None);
        assert_eq!(calls[1].param("after"), Some("t1_b"));
        assert_eq!(calls[2].param("after"), Some("t1_c"));
        assert_eq!(calls[0].param("limit"), Some("100"));
    }

    #[test]
    fn empty_page_ends_iteration() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.respond_get("r/redditdev/comments/", page(&[], Some("t1_x")));
        assert_eq!(generator(&executor, ListingKind::Standard).count(), 0);
        assert_eq!(executor.call_count(), 1);
    }

    #[test]
    fn limit_caps_items_and_request_size() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.respond_get("r/redditdev/comments/", page(&["a", "b", "c"], Some("t1_c")));

        let items: Vec<_> = generator(&executor, ListingKind::Standard).limit(2).collect();
        assert_eq!(ids(items), ["a", "b"]);
        assert_eq!(executor.call_count(), 1);
        assert_eq!(executor.calls()[0].param("limit"), Some("2"));
    }

    #[test]
    fn mod_notes_page_with_before() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor
            .respond_get(
                "r/redditdev/comments/",
                json!({"mod_notes": [{"id": "n1"}], "end_cursor": "n1", "has_next_page": true}),
            )
            .respond_get(
                "r/redditdev/comments/",
                json!({"mod_notes": [{"id": "n2"}], "end_cursor": "n2", "has_next_page": false}),
            );

        let items: Vec<_> = generator(&executor, ListingKind::ModNote).collect();
        assert_eq!(items.len(), 2);
        assert_eq!(executor.calls()[1].param("before"), Some("n1"));
        assert_eq!(executor.calls()[1].param("after"), None);
    }

    #[test]
    fn errors_are_yielded_once() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.fail(
            Method::Get,
            "r/redditdev/comments/",
            TransportError::Unavailable("timed out".into()),
        );
        let mut listing = generator(&executor, ListingKind::Standard);
        assert!(listing.next().unwrap().is_err());
        assert!(listing.next().is_none());
        assert_eq!(executor.call_count(), 1);
    }

    #[test]
    fn extra_params_ride_along() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.respond_get("r/redditdev/comments/", page(&["a"], None));
        let items: Vec<_> = generator(&executor, ListingKind::Standard)
            .param("sort", "top")
            .collect();
        assert_eq!(items.len(), 1);
        assert_eq!(executor.calls()[0].param("sort"), Some("top"));
    }

    #[test]
    fn wrapped_pages_read_the_second_element() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.respond_get(
            "r/redditdev/comments/",
            json!([page(&["header"], None), page(&["a", "b"], None), page(&["trailer"], None)]),
        );
        let items: Vec<_> = generator(&executor, ListingKind::Standard).collect();
        assert_eq!(ids(items), ["a", "b"]);
    }
}
