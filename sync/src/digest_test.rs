use board::doc::{Document, NoteColor, Point, Size, StickyNote};
use uuid::Uuid;

use super::*;

fn make_note(content: &str) -> StickyNote {
    StickyNote {
        id: Uuid::nil(),
        content: content.into(),
        position: Point::new(0.0, 0.0),
        size: Size::new(200.0, 150.0),
        color: NoteColor::Yellow,
        theme_id: None,
    }
}

#[test]
fn equal_documents_have_equal_digests() {
    let a = Document { notes: vec![make_note("hello")], ..Default::default() };
    let b = a.clone();
    assert_eq!(document_digest(&a), document_digest(&b));
}

#[test]
fn content_change_changes_digest() {
    let a = Document { notes: vec![make_note("hello")], ..Default::default() };
    let b = Document { notes: vec![make_note("goodbye")], ..Default::default() };
    assert_ne!(document_digest(&a), document_digest(&b));
}

#[test]
fn digest_is_key_order_insensitive() {
    // The same document arriving with different JSON key orders must hash
    // identically once parsed.
    let forward = r##"{
        "themes": [],
        "currentThemeId": null,
        "notes": [{"id": "00000000-0000-0000-0000-000000000000",
                   "content": "x",
                   "position": {"x": 1.0, "y": 2.0},
                   "size": {"width": 200.0, "height": 150.0},
                   "color": "#FFE066",
                   "themeId": null}],
        "connections": []
    }"##;
    let reversed = r##"{
        "connections": [],
        "notes": [{"themeId": null,
                   "color": "#FFE066",
                   "size": {"height": 150.0, "width": 200.0},
                   "position": {"y": 2.0, "x": 1.0},
                   "content": "x",
                   "id": "00000000-0000-0000-0000-000000000000"}],
        "currentThemeId": null,
        "themes": []
    }"##;
    let a: Document = serde_json::from_str(forward).unwrap();
    let b: Document = serde_json::from_str(reversed).unwrap();
    assert_eq!(document_digest(&a), document_digest(&b));
}

#[test]
fn empty_document_digest_is_stable() {
    assert_eq!(document_digest(&Document::default()), document_digest(&Document::default()));
}

#[test]
fn debug_format_is_abbreviated() {
    let digest = document_digest(&Document::default());
    let rendered = format!("{digest:?}");
    assert!(rendered.starts_with("DocumentDigest("));
    assert!(rendered.len() < 40);
}
