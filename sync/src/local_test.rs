use board::doc::{NoteColor, Point, Size};
use serde_json::json;
use time::macros::datetime;
use uuid::Uuid;

use super::*;

fn make_document() -> Document {
    let note = StickyNote {
        id: Uuid::new_v4(),
        content: "remember".into(),
        position: Point::new(10.0, 20.0),
        size: Size::new(200.0, 150.0),
        color: NoteColor::Pink,
        theme_id: None,
    };
    Document { notes: vec![note], ..Default::default() }
}

/// LocalStore that fails every operation.
struct BrokenStore;

impl LocalStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, LocalStoreError> {
        Err(LocalStoreError("backend gone".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), LocalStoreError> {
        Err(LocalStoreError("quota exceeded".into()))
    }

    fn remove(&self, _key: &str) -> Result<(), LocalStoreError> {
        Err(LocalStoreError("backend gone".into()))
    }
}

// --- Round trip ---

#[test]
fn save_then_load_roundtrips() {
    let store = MemoryStore::new();
    let doc = make_document();
    save_document(&store, &doc, datetime!(2026-08-07 08:00 UTC));

    let loaded = load_document(&store).unwrap();
    assert_eq!(loaded, doc);
}

#[test]
fn saved_blob_carries_timestamp_under_storage_key() {
    let store = MemoryStore::new();
    save_document(&store, &make_document(), datetime!(2026-08-07 08:00 UTC));

    let raw = store.get(STORAGE_KEY).unwrap().unwrap();
    assert!(raw.contains("\"savedAt\":\"2026-08-07T08:00:00Z\""));
}

#[test]
fn load_with_nothing_stored_is_none() {
    let store = MemoryStore::new();
    assert_eq!(load_document(&store), None);
}

// --- Legacy shapes ---

#[test]
fn load_tolerates_legacy_blob_without_themes() {
    let store = MemoryStore::new();
    let legacy = json!({
        "notes": [{
            "id": Uuid::nil(),
            "content": "old",
            "position": {"x": 0.0, "y": 0.0},
            "size": {"width": 200.0, "height": 150.0},
            "color": "#FFE066",
        }],
        "connections": [],
        "savedAt": "2024-01-01T00:00:00Z",
    });
    store.set(STORAGE_KEY, &legacy.to_string()).unwrap();

    let doc = load_document(&store).unwrap();
    assert!(doc.themes.is_empty());
    assert_eq!(doc.current_theme_id, None);
    // Notes missing themeId are backfilled to unthemed.
    assert_eq!(doc.notes[0].theme_id, None);
}

#[test]
fn load_tolerates_empty_object() {
    let store = MemoryStore::new();
    store.set(STORAGE_KEY, "{}").unwrap();
    let doc = load_document(&store).unwrap();
    assert!(doc.is_empty());
}

// --- Failure handling ---

#[test]
fn corrupt_blob_loads_as_none() {
    let store = MemoryStore::new();
    store.set(STORAGE_KEY, "not json at all").unwrap();
    assert_eq!(load_document(&store), None);
}

#[test]
fn broken_backend_is_swallowed() {
    let store = BrokenStore;
    // Neither of these may panic or propagate.
    save_document(&store, &make_document(), datetime!(2026-08-07 08:00 UTC));
    assert_eq!(load_document(&store), None);
    clear_document(&store);
}

// --- Clear ---

#[test]
fn clear_removes_the_blob() {
    let store = MemoryStore::new();
    save_document(&store, &make_document(), datetime!(2026-08-07 08:00 UTC));
    clear_document(&store);
    assert_eq!(load_document(&store), None);
}
