//! Integration tests for paragraph construction and style ownership.

mod common;

use common::{StyleCounter, TestClient, context};
use paragraph_layout::{
    BreakerState, Context, ContentKind, InsertAt, ParagraphError, Params,
};

#[test]
fn test_paragraph_holds_container_frame() {
    let ctx = context();
    let counter = StyleCounter::default();
    let s = counter.style("S", 10.0);
    let para = ctx.paragraph(42, &s);
    assert_eq!(para.style_depth(), 1);
    assert_eq!(para.current_style().name, "S");
    assert_eq!(*para.owner(), 42);
    assert!(para.content().is_empty());
    assert_eq!(para.layout_state(), BreakerState::Idle);
    assert_eq!(counter.live(), 2);
}

#[test]
fn test_drop_releases_one_reference_per_entry_and_frame() {
    let ctx = context();
    let counter = StyleCounter::default();
    let s = counter.style("S", 10.0);
    let e = counter.style("E", 10.0);
    let img = counter.style("IMG", 10.0);
    let held = counter.live();

    let mut para = ctx.paragraph(0, &s);
    let _ = para.add_text("a", 1).unwrap();
    let _ = para.add_inline_start(&e, 2).unwrap();
    let _ = para.add_text("b", 3).unwrap();
    let _ = para.add_replaced(10, 10, &img, 4).unwrap();
    let _ = para.add_float(&img, 5).unwrap();
    // Leave the inline element open so the stack has two frames.
    let entries = para.content().len();
    assert_eq!(entries, 5);
    assert_eq!(para.style_depth(), 2);
    assert_eq!(counter.live(), held + entries + para.style_depth());

    let _ = para.add_inline_end(6).unwrap();
    assert_eq!(counter.live(), held + para.content().len() + para.style_depth());

    drop(para);
    assert_eq!(counter.live(), held);
}

#[test]
fn test_balanced_inline_elements_restore_stack() {
    let ctx = context();
    let counter = StyleCounter::default();
    let s = counter.style("S", 10.0);
    let nested: Vec<_> = ["A", "B", "C", "D", "E"]
        .into_iter()
        .map(|name| counter.style(name, 10.0))
        .collect();

    let mut para = ctx.paragraph(0, &s);
    for (depth, style) in nested.iter().enumerate() {
        let _ = para.add_inline_start(style, 0).unwrap();
        assert_eq!(para.style_depth(), depth + 2);
        assert_eq!(para.current_style().name, style.name);
    }
    for _ in &nested {
        let _ = para.add_inline_end(0).unwrap();
    }
    assert_eq!(para.style_depth(), 1);
    assert_eq!(para.current_style().name, "S");

    let kinds: Vec<ContentKind> = para.content().iter().map(|(_, e)| e.kind()).collect();
    assert_eq!(kinds.len(), 10);
    assert!(kinds[..5].iter().all(|k| *k == ContentKind::InlineStart));
    assert!(kinds[5..].iter().all(|k| *k == ContentKind::InlineEnd));
}

#[test]
fn test_inline_end_records_closed_style() {
    let ctx = context();
    let counter = StyleCounter::default();
    let s = counter.style("S", 10.0);
    let e = counter.style("E", 10.0);
    let mut para = ctx.paragraph(0, &s);
    let _ = para.add_inline_start(&e, 1).unwrap();
    let end = para.add_inline_end(2).unwrap();
    assert_eq!(para.content().get(end).unwrap().style().name, "E");
}

#[test]
fn test_unbalanced_inline_end_is_bad_param() {
    let ctx = context();
    let counter = StyleCounter::default();
    let mut para = ctx.paragraph(0, &counter.style("S", 10.0));
    let err = para.add_inline_end(1).unwrap_err();
    assert!(matches!(err, ParagraphError::BadParam(_)));
    assert!(para.content().is_empty());
    assert_eq!(para.style_depth(), 1);
}

#[test]
fn test_text_resolution_failure_is_propagated() {
    let ctx = Context::new(TestClient {
        missing: vec!["gone"],
        ..TestClient::default()
    });
    let counter = StyleCounter::default();
    let s = counter.style("S", 10.0);
    let mut para = ctx.paragraph(0, &s);
    let _ = para.add_text("here", 1).unwrap();
    let live = counter.live();

    let err = para.add_text("gone", 2).unwrap_err();
    assert_eq!(err, ParagraphError::Client("no string \"gone\"".to_string()));
    assert_eq!(para.content().len(), 1);
    assert_eq!(counter.live(), live);
}

#[test]
fn test_insert_relative_to_existing_entries() {
    let ctx = context();
    let counter = StyleCounter::default();
    let s = counter.style("S", 10.0);
    let mut para = ctx.paragraph(0, &s);
    let world = para.add_text("world", 2).unwrap();
    let hello = para
        .insert(
            Params::<TestClient>::Text {
                text: "hello ",
                handle: 1,
            },
            InsertAt::Before(world),
        )
        .unwrap();
    let bang = para
        .insert(
            Params::<TestClient>::Text {
                text: "!",
                handle: 3,
            },
            InsertAt::After(world),
        )
        .unwrap();

    let texts: Vec<&str> = para
        .content()
        .iter()
        .filter_map(|(_, entry)| entry.text())
        .collect();
    assert_eq!(texts, ["hello ", "world", "!"]);
    assert_eq!(para.content().first(), Some(hello));
    assert_eq!(para.content().last(), Some(bang));
    assert_eq!(para.content().text_len(), 12);
    assert_eq!(para.aggregate_text().unwrap(), "hello world!");
}

#[test]
fn test_remove_and_stale_handles() {
    let ctx = context();
    let counter = StyleCounter::default();
    let s = counter.style("S", 10.0);
    let mut para = ctx.paragraph(0, &s);
    let a = para.add_text("a", 1).unwrap();
    let b = para.add_text("b", 2).unwrap();
    let live = counter.live();

    para.remove(a).unwrap();
    assert_eq!(counter.live(), live - 1);
    assert!(matches!(para.remove(a), Err(ParagraphError::BadParam(_))));
    let err = para
        .insert(
            Params::<TestClient>::Text {
                text: "c",
                handle: 3,
            },
            InsertAt::Before(a),
        )
        .unwrap_err();
    assert!(matches!(err, ParagraphError::BadParam(_)));
    assert!(para.content().contains(b));
}

#[test]
fn test_clear_releases_content_and_open_elements() {
    let ctx = context();
    let counter = StyleCounter::default();
    let s = counter.style("S", 10.0);
    let e = counter.style("E", 10.0);
    let mut para = ctx.paragraph(0, &s);
    let _ = para.add_text("a", 1).unwrap();
    let _ = para.add_inline_start(&e, 2).unwrap();
    let _ = para.add_text("b", 3).unwrap();

    para.clear();
    assert!(para.content().is_empty());
    assert_eq!(para.style_depth(), 1);
    assert_eq!(para.current_style().name, "S");
    // s and e held here, plus the container frame.
    assert_eq!(counter.live(), 3);
}

#[test]
fn test_content_kind_names() {
    let ctx = context();
    let counter = StyleCounter::default();
    let s = counter.style("S", 10.0);
    let mut para = ctx.paragraph(0, &s);
    let _ = para.add_text("a", 1).unwrap();
    let _ = para.add_float(&s, 2).unwrap();
    let _ = para.add_replaced(1, 1, &s, 3).unwrap();
    let _ = para.add_inline_start(&s, 4).unwrap();
    let _ = para.add_inline_end(5).unwrap();
    let names: Vec<String> = para
        .content()
        .iter()
        .map(|(_, entry)| entry.kind().to_string())
        .collect();
    assert_eq!(
        names,
        ["TEXT", "FLOAT", "REPLACED", "INLINE START", "INLINE END"]
    );
}
