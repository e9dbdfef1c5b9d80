//! Document model: themes, sticky notes, connections, and the board document.
//!
//! This module defines the entity types that make up the persisted board
//! (`Theme`, `StickyNote`, `Connection`, `Document`) together with the
//! sparse-update types used for incremental edits (`NoteUpdate`,
//! `ThemeUpdate`). Wire field names are camelCase to match the documented
//! export and persistence formats; palette colors are closed enums that
//! serialize as the hex strings the UI palette renders.
//!
//! Data flows into this layer from the host UI (mutations via
//! [`crate::store::BoardStore`]) and from the adapters (JSON
//! deserialization of persisted or synced snapshots).

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Unique identifier for a sticky note.
pub type NoteId = Uuid;

/// Unique identifier for a theme.
pub type ThemeId = Uuid;

/// Unique identifier for a connection.
pub type ConnectionId = Uuid;

/// A point on the canvas in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of a note rectangle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Sticky-note fill color. Serialized as the palette hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoteColor {
    /// First palette entry; the color new notes are created with.
    #[default]
    #[serde(rename = "#FFE066")]
    Yellow,
    #[serde(rename = "#FF9999")]
    Pink,
    #[serde(rename = "#99CCFF")]
    Blue,
    #[serde(rename = "#99FF99")]
    Green,
    #[serde(rename = "#FFCC99")]
    Orange,
    #[serde(rename = "#CC99FF")]
    Purple,
    #[serde(rename = "#FFFFFF")]
    White,
}

impl NoteColor {
    /// CSS hex string for this palette entry.
    #[must_use]
    pub fn as_hex(self) -> &'static str {
        match self {
            Self::Yellow => "#FFE066",
            Self::Pink => "#FF9999",
            Self::Blue => "#99CCFF",
            Self::Green => "#99FF99",
            Self::Orange => "#FFCC99",
            Self::Purple => "#CC99FF",
            Self::White => "#FFFFFF",
        }
    }
}

/// Theme accent color. Serialized as the palette hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThemeColor {
    #[default]
    #[serde(rename = "#3B82F6")]
    Blue,
    #[serde(rename = "#10B981")]
    Green,
    #[serde(rename = "#F59E0B")]
    Amber,
    #[serde(rename = "#EF4444")]
    Red,
    #[serde(rename = "#8B5CF6")]
    Violet,
    #[serde(rename = "#06B6D4")]
    Cyan,
    #[serde(rename = "#F97316")]
    Orange,
    #[serde(rename = "#84CC16")]
    Lime,
}

impl ThemeColor {
    /// CSS hex string for this palette entry.
    #[must_use]
    pub fn as_hex(self) -> &'static str {
        match self {
            Self::Blue => "#3B82F6",
            Self::Green => "#10B981",
            Self::Amber => "#F59E0B",
            Self::Red => "#EF4444",
            Self::Violet => "#8B5CF6",
            Self::Cyan => "#06B6D4",
            Self::Orange => "#F97316",
            Self::Lime => "#84CC16",
        }
    }
}

/// A theme grouping notes on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Unique identifier for this theme.
    pub id: ThemeId,
    /// Display name.
    pub name: String,
    /// Optional longer description shown in the theme manager.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Accent color.
    pub color: ThemeColor,
    /// When the theme was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the theme was last edited.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A sticky note as stored in the document and on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickyNote {
    /// Unique identifier for this note.
    pub id: NoteId,
    /// Markdown-capable text content.
    pub content: String,
    /// Top-left corner in world coordinates.
    pub position: Point,
    /// Bounding-box size in world coordinates.
    pub size: Size,
    /// Fill color.
    pub color: NoteColor,
    /// Theme this note belongs to; `None` means unthemed, visible under
    /// every filter. Defaulted so pre-theme documents still deserialize.
    #[serde(default)]
    pub theme_id: Option<ThemeId>,
}

impl StickyNote {
    /// Center of the note rectangle in world coordinates.
    #[must_use]
    pub fn center(&self) -> Point {
        Point {
            x: self.position.x + self.size.width / 2.0,
            y: self.position.y + self.size.height / 2.0,
        }
    }
}

/// A directed connection between two notes.
///
/// Directed for rendering (the arrowhead points at `target_id`) but
/// undirected for deduplication: the pair (a, b) and (b, a) are the same
/// edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Unique identifier for this connection.
    pub id: ConnectionId,
    /// Note the arrow is drawn from.
    pub source_id: NoteId,
    /// Note the arrow points at.
    pub target_id: NoteId,
}

impl Connection {
    /// Whether this edge joins the unordered pair (`a`, `b`).
    #[must_use]
    pub fn joins(&self, a: NoteId, b: NoteId) -> bool {
        (self.source_id == a && self.target_id == b)
            || (self.source_id == b && self.target_id == a)
    }

    /// Whether either endpoint is `id`.
    #[must_use]
    pub fn touches(&self, id: NoteId) -> bool {
        self.source_id == id || self.target_id == id
    }
}

/// The board document: the unit of persistence and sync.
///
/// Vectors preserve creation order, which is also render order. `themes`
/// and `current_theme_id` are defaulted so documents written before themes
/// existed still deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// All themes, in creation order.
    #[serde(default)]
    pub themes: Vec<Theme>,
    /// Active theme filter; `None` shows notes across all themes.
    #[serde(default)]
    pub current_theme_id: Option<ThemeId>,
    /// All notes, in creation order.
    #[serde(default)]
    pub notes: Vec<StickyNote>,
    /// All connections, in creation order.
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Document {
    /// Look up a note by id.
    #[must_use]
    pub fn note(&self, id: NoteId) -> Option<&StickyNote> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Look up a note by id, mutably.
    pub fn note_mut(&mut self, id: NoteId) -> Option<&mut StickyNote> {
        self.notes.iter_mut().find(|n| n.id == id)
    }

    /// Whether a note with `id` exists.
    #[must_use]
    pub fn has_note(&self, id: NoteId) -> bool {
        self.notes.iter().any(|n| n.id == id)
    }

    /// Look up a theme by id.
    #[must_use]
    pub fn theme(&self, id: ThemeId) -> Option<&Theme> {
        self.themes.iter().find(|t| t.id == id)
    }

    /// Look up a theme by id, mutably.
    pub fn theme_mut(&mut self, id: ThemeId) -> Option<&mut Theme> {
        self.themes.iter_mut().find(|t| t.id == id)
    }

    /// The connection joining the unordered pair (`a`, `b`), if any.
    #[must_use]
    pub fn connection_between(&self, a: NoteId, b: NoteId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.joins(a, b))
    }

    /// Whether the document holds no themes, notes, or connections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty() && self.notes.is_empty() && self.connections.is_empty()
    }
}

/// Sparse update for a sticky note. Only present fields are applied.
///
/// `id` and `theme_id` are deliberately absent: a field update can never
/// re-identify or re-theme a note.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteUpdate {
    /// New text content, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New top-left position, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    /// New size, if being updated. Floored to the minimum note size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// New fill color, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<NoteColor>,
}

/// Sparse update for a theme. Only present fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeUpdate {
    /// New display name, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New accent color, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ThemeColor>,
}
