//! Local persistence adapter: one JSON blob under a well-known key.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backing store is abstracted behind [`LocalStore`] (browser
//! localStorage in the real host, [`MemoryStore`] in tests and headless
//! hosts). Failures never reach the board core: saves log and swallow,
//! loads log and report "nothing persisted". Loading tolerates legacy
//! blobs written before themes existed.

#[cfg(test)]
#[path = "local_test.rs"]
mod local_test;

use std::collections::HashMap;
use std::sync::Mutex;

use board::doc::{Connection, Document, StickyNote, Theme, ThemeId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::error;

/// Key the board document is persisted under.
pub const STORAGE_KEY: &str = "sticky-notes-app-data";

/// Failure surfaced by a [`LocalStore`] backend.
#[derive(Debug, thiserror::Error)]
#[error("local store: {0}")]
pub struct LocalStoreError(pub String);

/// Synchronous key-value blob store.
pub trait LocalStore: Send + Sync {
    /// Read the raw value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`LocalStoreError`] when the backing store is unavailable.
    fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`LocalStoreError`] when the write is rejected (quota,
    /// unavailable backend).
    fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError>;

    /// Delete the value under `key`, if present.
    ///
    /// # Errors
    ///
    /// Returns [`LocalStoreError`] when the backing store is unavailable.
    fn remove(&self, key: &str) -> Result<(), LocalStoreError>;
}

/// On-disk shape of the persisted document.
///
/// Every field is defaulted so legacy blobs (no themes, notes without a
/// `themeId`) still load; missing note `themeId`s backfill to `None` via
/// the note's own serde default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedDocument {
    #[serde(default)]
    notes: Vec<StickyNote>,
    #[serde(default)]
    connections: Vec<Connection>,
    #[serde(default)]
    themes: Vec<Theme>,
    #[serde(default)]
    current_theme_id: Option<ThemeId>,
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    saved_at: Option<OffsetDateTime>,
}

/// Persist `doc` with a save timestamp. Failures are logged and swallowed.
pub fn save_document(store: &dyn LocalStore, doc: &Document, saved_at: OffsetDateTime) {
    let persisted = PersistedDocument {
        notes: doc.notes.clone(),
        connections: doc.connections.clone(),
        themes: doc.themes.clone(),
        current_theme_id: doc.current_theme_id,
        saved_at: Some(saved_at),
    };
    let raw = match serde_json::to_string(&persisted) {
        Ok(raw) => raw,
        Err(e) => {
            error!(error = %e, "failed to serialize document for local save");
            return;
        }
    };
    if let Err(e) = store.set(STORAGE_KEY, &raw) {
        error!(error = %e, "local save failed");
    }
}

/// Load the persisted document.
///
/// Returns `None` when nothing is stored, when the backend fails, or when
/// the blob does not parse; the failure cases are logged.
#[must_use]
pub fn load_document(store: &dyn LocalStore) -> Option<Document> {
    let raw = match store.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            error!(error = %e, "local load failed");
            return None;
        }
    };
    match serde_json::from_str::<PersistedDocument>(&raw) {
        Ok(persisted) => Some(Document {
            themes: persisted.themes,
            current_theme_id: persisted.current_theme_id,
            notes: persisted.notes,
            connections: persisted.connections,
        }),
        Err(e) => {
            error!(error = %e, "persisted document did not parse; starting empty");
            None
        }
    }
}

/// Remove the persisted document. Failures are logged and swallowed.
pub fn clear_document(store: &dyn LocalStore) {
    if let Err(e) = store.remove(STORAGE_KEY) {
        error!(error = %e, "local clear failed");
    }
}

/// In-memory [`LocalStore`] for tests and hosts without durable storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| LocalStoreError("lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| LocalStoreError("lock poisoned".into()))?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), LocalStoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| LocalStoreError("lock poisoned".into()))?;
        entries.remove(key);
        Ok(())
    }
}
