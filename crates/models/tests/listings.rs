use std::sync::Arc;

use serde_json::{json, Value as JsonValue};
use thingkit_models::prelude::*;
use thingkit_models::{ListingKind, Reddit, Thing, Value};
use thingkit_transport::ScriptedExecutor;

fn client() -> (Arc<ScriptedExecutor>, Reddit) {
    thingkit_observability::init_for_tests();
    let executor = Arc::new(ScriptedExecutor::new());
    let reddit = Reddit::with_executor(executor.clone()).expect("default kinds are distinct");
    (executor, reddit)
}

fn submissions(ids: &[&str], after: Option<&str>) -> JsonValue {
    let children: Vec<_> = ids
        .iter()
        .map(|id| json!({"kind": "t3", "data": {"id": id, "title": format!("post {id}"), "author": "bboe"}}))
        .collect();
    json!({"kind": "Listing", "data": {"after": after, "before": null, "children": children}})
}

#[test]
fn user_submissions_walk_every_page_in_order() -> anyhow::Result<()> {
    let (executor, reddit) = client();
    executor
        .respond_get("user/bboe/submitted/", submissions(&["a", "b"], Some("t3_b")))
        .respond_get("user/bboe/submitted/", submissions(&["c", "d"], Some("t3_d")))
        .respond_get("user/bboe/submitted/", submissions(&["e"], None));

    let mut seen = Vec::new();
    for item in reddit.redditor("bboe")?.submissions()? {
        let item = item?;
        let submission = item.as_submission().expect("submission child");
        assert!(submission.is_fetched());
        seen.push(submission.id_str().to_string());
    }

    assert_eq!(seen, ["a", "b", "c", "d", "e"]);
    assert_eq!(executor.call_count(), 3);
    assert_eq!(executor.pending(), 0);
    Ok(())
}

#[test]
fn children_keep_their_author_links() -> anyhow::Result<()> {
    let (executor, reddit) = client();
    executor.respond_get("r/redditdev/new/", submissions(&["a"], None));

    let first = reddit
        .subreddit("redditdev")?
        .new()
        .next()
        .expect("one item")?;
    let submission = first.as_submission().expect("submission child");
    assert_eq!(submission.title()?, "post a");
    assert_eq!(submission.author()?, Some(reddit.redditor("BBOE")?));
    assert_eq!(executor.call_count(), 1);
    Ok(())
}

#[test]
fn flair_and_modmail_cursors() -> anyhow::Result<()> {
    let (executor, reddit) = client();
    executor
        .respond_get(
            "r/redditdev/api/flairlist/",
            json!({"users": [{"user": "a", "flair_text": "x"}], "next": "t2_a"}),
        )
        .respond_get(
            "r/redditdev/api/flairlist/",
            json!({"users": [{"user": "b", "flair_text": "y"}], "prev": "t2_a"}),
        )
        .respond_get(
            "api/mod/conversations",
            json!({"conversations": {"c9": {"id": "c9"}}, "messages": {}}),
        )
        .respond_get(
            "api/mod/conversations",
            json!({"conversations": {}, "messages": {}}),
        );

    let flair: Vec<_> = reddit
        .listing("r/redditdev/api/flairlist/", ListingKind::Flair)
        .collect::<Result<_, _>>()?;
    assert_eq!(flair.len(), 2);
    assert_eq!(executor.calls()[1].param("after"), Some("t2_a"));

    let conversations: Vec<_> = reddit
        .listing("api/mod/conversations", ListingKind::ModmailConversations)
        .collect::<Result<_, _>>()?;
    assert_eq!(conversations.len(), 1);
    assert_eq!(executor.calls()[3].param("after"), Some("c9"));
    assert_eq!(executor.call_count(), 4);
    Ok(())
}

#[test]
fn objectify_dispatches_on_kind_tags() -> anyhow::Result<()> {
    let (_, reddit) = client();
    let value = reddit.objectify(json!([
        {"kind": "t1", "data": {"id": "c1"}},
        {"kind": "t2", "data": {"name": "bboe"}},
        {"kind": "t3", "data": {"id": "s1"}},
        {"kind": "t4", "data": {"id": "m1", "subject": "hi"}},
        {"kind": "t5", "data": {"display_name": "redditdev"}},
        {"kind": "t6", "data": {"name": "Verified Email"}},
        {"kind": "more", "data": {"count": 2, "children": ["x", "y"]}},
        {"kind": "LabeledMulti", "data": {"name": "multi"}},
        {"date": 1.0, "id": "t2_a", "name": "friend"},
        null,
    ]))?;

    let labels: Vec<&str> = value
        .as_array()
        .expect("array")
        .iter()
        .map(Value::type_label)
        .collect();
    assert_eq!(
        labels,
        [
            "Comment",
            "Redditor",
            "Submission",
            "Message",
            "Subreddit",
            "Trophy",
            "MoreComments",
            "object",
            "Redditor",
            "null",
        ]
    );

    let items = value.into_array().expect("array");
    match &items[7] {
        Value::Object(record) => assert_eq!(record.kind(), Some("LabeledMulti")),
        other => panic!("expected a record, got {other:?}"),
    }
    match &items[6] {
        Value::Thing(Thing::MoreComments(more)) => assert_eq!(more.count(), 2),
        other => panic!("expected more comments, got {other:?}"),
    }
    Ok(())
}

#[test]
fn error_envelopes_are_classified() {
    let (executor, reddit) = client();
    executor.respond_post(
        "api/block_user/",
        json!({"json": {"errors": [
            ["RATELIMIT", "you are doing that too much", "ratelimit"],
            ["USER_REQUIRED", "Please log in to do that.", null],
        ]}}),
    );

    let err = reddit.redditor("spez").and_then(|spez| spez.block()).unwrap_err();
    let api = err.as_api().expect("api error");
    assert_eq!(api.len(), 2);
    assert_eq!(api.first().error_type(), "RATELIMIT");
    assert_eq!(api.items()[1].field(), None);
}
