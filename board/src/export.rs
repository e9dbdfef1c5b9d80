//! Export/import of the board document as human-readable JSON.
//!
//! The export payload carries the document fields plus an `exportedAt`
//! timestamp; transient UI state is never part of it. Import accepts the
//! same shape back, requiring only that `notes` and `connections` are
//! present — `themes` and `currentThemeId` default for files written
//! before themes existed.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::doc::{Connection, Document, StickyNote, Theme, ThemeId};

/// Error returned by [`parse_import`].
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The payload was not valid JSON, or a present field had the wrong shape.
    #[error("import payload did not parse: {0}")]
    Json(#[from] serde_json::Error),
    /// A required top-level field is absent.
    #[error("import payload is missing the `{0}` field")]
    MissingField(&'static str),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportPayload<'a> {
    themes: &'a [Theme],
    current_theme_id: Option<ThemeId>,
    notes: &'a [StickyNote],
    connections: &'a [Connection],
    #[serde(with = "time::serde::rfc3339")]
    exported_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportPayload {
    #[serde(default)]
    themes: Vec<Theme>,
    #[serde(default)]
    current_theme_id: Option<ThemeId>,
    notes: Vec<StickyNote>,
    connections: Vec<Connection>,
}

/// Serialize `doc` to pretty-printed export JSON stamped with `exported_at`.
#[must_use]
pub fn export_document(doc: &Document, exported_at: OffsetDateTime) -> String {
    let payload = ExportPayload {
        themes: &doc.themes,
        current_theme_id: doc.current_theme_id,
        notes: &doc.notes,
        connections: &doc.connections,
        exported_at,
    };
    // Serializing the payload cannot fail: every field is a plain serde
    // type with string keys.
    serde_json::to_string_pretty(&payload).unwrap_or_default()
}

/// Parse an import payload back into a [`Document`].
///
/// # Errors
///
/// Returns [`ImportError::MissingField`] when `notes` or `connections` is
/// absent and [`ImportError::Json`] when the payload is not valid JSON or
/// a field has the wrong shape. The caller's document is untouched either
/// way.
pub fn parse_import(json: &str) -> Result<Document, ImportError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    for field in ["notes", "connections"] {
        if value.get(field).is_none() {
            return Err(ImportError::MissingField(field));
        }
    }
    let payload: ImportPayload = serde_json::from_value(value)?;
    Ok(Document {
        themes: payload.themes,
        current_theme_id: payload.current_theme_id,
        notes: payload.notes,
        connections: payload.connections,
    })
}

/// Suggested filename for an export taken on `date`:
/// `sticky-notes-<ISO date>.json`.
#[must_use]
pub fn export_filename(date: Date) -> String {
    let iso = date
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default();
    format!("sticky-notes-{iso}.json")
}
