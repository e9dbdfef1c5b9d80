use board::doc::{NoteColor, Point, Size, StickyNote};
use serde_json::json;
use uuid::Uuid;

use super::*;

fn make_document(content: &str) -> Document {
    let note = StickyNote {
        id: Uuid::new_v4(),
        content: content.into(),
        position: Point::new(0.0, 0.0),
        size: Size::new(200.0, 150.0),
        color: NoteColor::Yellow,
        theme_id: None,
    };
    Document { notes: vec![note], ..Default::default() }
}

// --- MemoryRemote basics ---

#[tokio::test]
async fn establish_identity_returns_configured_identity() {
    let remote = MemoryRemote::new("device-a");
    assert_eq!(remote.establish_identity().await.unwrap(), "device-a");
}

#[tokio::test]
async fn identity_failure_injection() {
    let remote = MemoryRemote::new("device-a");
    remote.fail_identity(true);
    assert!(matches!(
        remote.establish_identity().await,
        Err(RemoteError::Network(_))
    ));
    remote.fail_identity(false);
    assert!(remote.establish_identity().await.is_ok());
}

#[tokio::test]
async fn save_then_load_roundtrips() {
    let remote = MemoryRemote::new("device-a");
    let doc = make_document("synced");
    remote.save(&doc).await.unwrap();

    assert_eq!(remote.load().await.unwrap(), Some(doc));
    assert_eq!(remote.save_count(), 1);
}

#[tokio::test]
async fn load_without_record_is_none() {
    let remote = MemoryRemote::new("device-a");
    assert_eq!(remote.load().await.unwrap(), None);
}

#[tokio::test]
async fn save_failure_injection_leaves_record_untouched() {
    let remote = MemoryRemote::new("device-a");
    remote.save(&make_document("first")).await.unwrap();

    remote.fail_saves(true);
    let err = remote.save(&make_document("second")).await.unwrap_err();
    assert!(matches!(err, RemoteError::Network(_)));
    assert_eq!(remote.save_count(), 1);
    assert_eq!(
        remote.load().await.unwrap().unwrap().notes[0].content,
        "first"
    );
}

// --- Subscription ---

#[tokio::test]
async fn save_echoes_to_subscribers() {
    let remote = MemoryRemote::new("device-a");
    let mut rx = remote.subscribe();

    let doc = make_document("broadcast me");
    remote.save(&doc).await.unwrap();
    assert_eq!(rx.recv().await.unwrap(), doc);
}

#[tokio::test]
async fn push_external_reaches_subscribers_and_storage() {
    let remote = MemoryRemote::new("device-a");
    let mut rx = remote.subscribe();

    let doc = make_document("from elsewhere");
    remote.push_external(doc.clone());
    assert_eq!(rx.recv().await.unwrap(), doc);
    assert_eq!(remote.stored_document("device-a"), Some(doc));
}

// --- Cross-identity ---

#[tokio::test]
async fn load_for_identity_reads_other_records() {
    let remote = MemoryRemote::new("device-a");
    let doc = make_document("on the other device");
    remote.insert_record("device-b", doc.clone());

    assert_eq!(remote.load_for_identity("device-b").await.unwrap(), Some(doc));
    assert_eq!(remote.load_for_identity("device-c").await.unwrap(), None);
}

// --- RemoteRecord wire shape ---

#[test]
fn remote_record_flattens_document_fields() {
    let record = RemoteRecord {
        document: make_document("wire"),
        last_modified: None,
        user_id: "device-a".into(),
    };
    let value = serde_json::to_value(&record).unwrap();
    assert!(value.get("notes").is_some());
    assert!(value.get("connections").is_some());
    assert!(value.get("themes").is_some());
    assert_eq!(value["userId"], json!("device-a"));
    assert!(value.get("document").is_none());
}

#[test]
fn remote_record_parses_with_server_timestamp() {
    let raw = json!({
        "themes": [],
        "currentThemeId": null,
        "notes": [],
        "connections": [],
        "lastModified": "2026-08-07T10:00:00Z",
        "userId": "device-b",
    });
    let record: RemoteRecord = serde_json::from_value(raw).unwrap();
    assert_eq!(record.user_id, "device-b");
    assert!(record.last_modified.is_some());
    assert!(record.document.is_empty());
}
