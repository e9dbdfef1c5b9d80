//! Board state store: the single source of truth for the document plus
//! transient interaction state.
//!
//! `BoardStore` owns the canonical [`Document`], the selection/connect-mode
//! state, and the [`Viewport`]. Every mutation is synchronous and total:
//! malformed requests (unknown ids, duplicate edges, self-connects) are
//! silent no-ops, and every deletion path cascades so connections never
//! dangle. The host commits mutations through whatever session wrapper it
//! uses (see the `sync` crate) and reads projections back out at render
//! time.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashSet;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::consts::{
    DEFAULT_NOTE_HEIGHT, DEFAULT_NOTE_WIDTH, MIN_NOTE_HEIGHT, MIN_NOTE_WIDTH,
};
use crate::doc::{
    Connection, ConnectionId, Document, NoteColor, NoteId, NoteUpdate, Point, Size, StickyNote,
    Theme, ThemeColor, ThemeId, ThemeUpdate,
};
use crate::export::{self, ImportError};
use crate::view::{self, Bounds, Viewport};

/// Connect-mode state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectMode {
    /// No connection gesture in progress.
    #[default]
    Idle,
    /// Waiting for a target note; carries the origin note id.
    From(NoteId),
}

/// Transient per-session interaction state. Never persisted or synced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiState {
    /// The currently selected note, if any.
    pub selected_note_id: Option<NoteId>,
    /// Connect-mode state.
    pub connect_mode: ConnectMode,
}

/// Single source of truth for the board.
#[derive(Debug, Clone, Default)]
pub struct BoardStore {
    doc: Document,
    ui: UiState,
    viewport: Viewport,
}

impl BoardStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Notes ---

    /// Create a note at `position` with the default size and color, tagged
    /// with the active theme filter, and select it.
    pub fn add_note(&mut self, position: Point) -> NoteId {
        let note = StickyNote {
            id: Uuid::new_v4(),
            content: String::new(),
            position,
            size: Size::new(DEFAULT_NOTE_WIDTH, DEFAULT_NOTE_HEIGHT),
            color: NoteColor::default(),
            theme_id: self.doc.current_theme_id,
        };
        let id = note.id;
        self.doc.notes.push(note);
        self.ui.selected_note_id = Some(id);
        id
    }

    /// Apply a sparse update to a note. No-op when `id` is unknown.
    /// Sizes are floored to the minimum note size.
    pub fn update_note(&mut self, id: NoteId, update: NoteUpdate) {
        let Some(note) = self.doc.note_mut(id) else {
            return;
        };
        if let Some(content) = update.content {
            note.content = content;
        }
        if let Some(position) = update.position {
            note.position = position;
        }
        if let Some(size) = update.size {
            note.size = Size::new(
                size.width.max(MIN_NOTE_WIDTH),
                size.height.max(MIN_NOTE_HEIGHT),
            );
        }
        if let Some(color) = update.color {
            note.color = color;
        }
    }

    /// Delete a note, cascading to every connection touching it and to any
    /// transient state referencing it.
    pub fn delete_note(&mut self, id: NoteId) {
        self.doc.notes.retain(|n| n.id != id);
        self.doc.connections.retain(|c| !c.touches(id));
        if self.ui.selected_note_id == Some(id) {
            self.ui.selected_note_id = None;
        }
        if self.ui.connect_mode == ConnectMode::From(id) {
            self.ui.connect_mode = ConnectMode::Idle;
        }
    }

    /// Set or clear the selection. Selecting an unknown note is a no-op.
    pub fn select_note(&mut self, id: Option<NoteId>) {
        match id {
            None => self.ui.selected_note_id = None,
            Some(id) if self.doc.has_note(id) => self.ui.selected_note_id = Some(id),
            Some(_) => {}
        }
    }

    // --- Connections ---

    /// Enter connect-mode from `from`. Connect-mode is exclusive: any
    /// previous origin is replaced. No-op when the note is unknown.
    pub fn start_connecting(&mut self, from: NoteId) {
        if self.doc.has_note(from) {
            self.ui.connect_mode = ConnectMode::From(from);
        }
    }

    /// Leave connect-mode without creating anything.
    pub fn cancel_connecting(&mut self) {
        self.ui.connect_mode = ConnectMode::Idle;
    }

    /// Complete the connect gesture at `to`.
    ///
    /// No-op unless currently connecting. Every path exits connect-mode;
    /// an edge is created only when `to` is a different live note and the
    /// pair is not already connected in either direction.
    pub fn try_connect(&mut self, to: NoteId) {
        let ConnectMode::From(from) = self.ui.connect_mode else {
            return;
        };
        self.ui.connect_mode = ConnectMode::Idle;
        if from == to {
            return;
        }
        self.insert_connection(from, to);
    }

    /// Create a connection between two distinct existing notes.
    ///
    /// Shares the duplicate/self-loop guard with [`Self::try_connect`];
    /// returns the new edge id, or `None` when the request was a no-op.
    /// A successful creation also exits connect-mode.
    pub fn add_connection(&mut self, source: NoteId, target: NoteId) -> Option<ConnectionId> {
        let id = self.insert_connection(source, target)?;
        self.ui.connect_mode = ConnectMode::Idle;
        Some(id)
    }

    /// Delete a connection by id. No-op when absent.
    pub fn delete_connection(&mut self, id: ConnectionId) {
        self.doc.connections.retain(|c| c.id != id);
    }

    fn insert_connection(&mut self, source: NoteId, target: NoteId) -> Option<ConnectionId> {
        if source == target {
            return None;
        }
        if !self.doc.has_note(source) || !self.doc.has_note(target) {
            return None;
        }
        if self.doc.connection_between(source, target).is_some() {
            return None;
        }
        let connection = Connection { id: Uuid::new_v4(), source_id: source, target_id: target };
        let id = connection.id;
        self.doc.connections.push(connection);
        Some(id)
    }

    // --- Themes ---

    /// Create a theme, stamping its timestamps.
    pub fn create_theme(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
        color: ThemeColor,
    ) -> ThemeId {
        let now = OffsetDateTime::now_utc();
        let theme = Theme {
            id: Uuid::new_v4(),
            name: name.into(),
            description,
            color,
            created_at: now,
            updated_at: now,
        };
        let id = theme.id;
        self.doc.themes.push(theme);
        id
    }

    /// Apply a sparse update to a theme and bump its `updated_at`.
    /// No-op when `id` is unknown.
    pub fn update_theme(&mut self, id: ThemeId, update: ThemeUpdate) {
        let Some(theme) = self.doc.theme_mut(id) else {
            return;
        };
        if let Some(name) = update.name {
            theme.name = name;
        }
        if let Some(description) = update.description {
            theme.description = Some(description);
        }
        if let Some(color) = update.color {
            theme.color = color;
        }
        theme.updated_at = OffsetDateTime::now_utc();
    }

    /// Delete a theme, cascading to its notes, their connections, the
    /// active filter, and any transient state referencing a removed note.
    pub fn delete_theme(&mut self, id: ThemeId) {
        let before = self.doc.themes.len();
        self.doc.themes.retain(|t| t.id != id);
        if self.doc.themes.len() == before {
            return;
        }

        if self.doc.current_theme_id == Some(id) {
            self.doc.current_theme_id = None;
        }

        let removed: HashSet<NoteId> = self
            .doc
            .notes
            .iter()
            .filter(|n| n.theme_id == Some(id))
            .map(|n| n.id)
            .collect();
        self.doc.notes.retain(|n| n.theme_id != Some(id));
        self.doc
            .connections
            .retain(|c| !removed.contains(&c.source_id) && !removed.contains(&c.target_id));

        if let Some(selected) = self.ui.selected_note_id {
            if removed.contains(&selected) {
                self.ui.selected_note_id = None;
            }
        }
        if let ConnectMode::From(from) = self.ui.connect_mode {
            if removed.contains(&from) {
                self.ui.connect_mode = ConnectMode::Idle;
            }
        }
    }

    /// Switch the active theme filter. Clears the selection and exits
    /// connect-mode: switching theme invalidates note-scoped interaction
    /// state. Selecting an unknown theme is a no-op.
    pub fn select_theme(&mut self, id: Option<ThemeId>) {
        if let Some(theme_id) = id {
            if self.doc.theme(theme_id).is_none() {
                return;
            }
        }
        self.doc.current_theme_id = id;
        self.ui.selected_note_id = None;
        self.ui.connect_mode = ConnectMode::Idle;
    }

    // --- View ---

    /// Zoom in one step.
    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    /// Zoom out one step.
    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Set the zoom factor, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.viewport.set_zoom(zoom);
    }

    /// Set the pan offset.
    pub fn set_pan_offset(&mut self, pan: Point) {
        self.viewport.set_pan(pan);
    }

    /// Reset to zoom 1.0 and zero pan.
    pub fn reset_zoom(&mut self) {
        self.viewport.reset();
    }

    /// Fit the notes visible under the current filter into a container of
    /// the given screen size. No-op when no notes are visible.
    pub fn fit_to_view(&mut self, container_width: f64, container_height: f64) {
        let Some(bounds) = Bounds::of_notes(self.current_notes()) else {
            return;
        };
        self.viewport = view::fit_to_bounds(bounds, container_width, container_height);
    }

    // --- Snapshot / lifecycle ---

    /// Serialize the document (not the transient state) to export JSON.
    #[must_use]
    pub fn export_data(&self) -> String {
        export::export_document(&self.doc, OffsetDateTime::now_utc())
    }

    /// Replace the document from an import payload and reset all transient
    /// state to defaults.
    ///
    /// # Errors
    ///
    /// Returns the parse failure with the current document untouched.
    pub fn import_data(&mut self, json: &str) -> Result<(), ImportError> {
        let doc = export::parse_import(json)?;
        self.doc = doc;
        self.ui = UiState::default();
        self.viewport = Viewport::default();
        Ok(())
    }

    /// Reset the document and transient state to the empty-board defaults.
    pub fn clear_all_data(&mut self) {
        self.doc = Document::default();
        self.ui = UiState::default();
        self.viewport = Viewport::default();
    }

    /// Merge a remote snapshot: full replacement of the document, transient
    /// state left in place. Transient references to notes the snapshot no
    /// longer contains are pruned.
    pub fn apply_remote(&mut self, doc: Document) {
        self.doc = doc;
        if let Some(selected) = self.ui.selected_note_id {
            if !self.doc.has_note(selected) {
                self.ui.selected_note_id = None;
            }
        }
        if let ConnectMode::From(from) = self.ui.connect_mode {
            if !self.doc.has_note(from) {
                self.ui.connect_mode = ConnectMode::Idle;
            }
        }
    }

    /// Clear selection and connect-mode, leaving the document and viewport
    /// alone. Used after a manual cross-identity pull.
    pub fn reset_interaction(&mut self) {
        self.ui = UiState::default();
    }

    // --- Queries ---

    /// The canonical document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// The current view transform.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The transient interaction state.
    #[must_use]
    pub fn ui(&self) -> UiState {
        self.ui
    }

    /// The currently selected note id, if any.
    #[must_use]
    pub fn selected_note_id(&self) -> Option<NoteId> {
        self.ui.selected_note_id
    }

    /// The connect-mode state.
    #[must_use]
    pub fn connect_mode(&self) -> ConnectMode {
        self.ui.connect_mode
    }

    /// Look up a note by id.
    #[must_use]
    pub fn note(&self, id: NoteId) -> Option<&StickyNote> {
        self.doc.note(id)
    }

    /// Notes visible under the current theme filter, in creation order.
    #[must_use]
    pub fn current_notes(&self) -> Vec<&StickyNote> {
        match self.doc.current_theme_id {
            None => self.doc.notes.iter().collect(),
            Some(theme_id) => self
                .doc
                .notes
                .iter()
                .filter(|n| n.theme_id == Some(theme_id))
                .collect(),
        }
    }

    /// Connections whose both endpoints are visible under the current
    /// filter, in creation order.
    #[must_use]
    pub fn current_connections(&self) -> Vec<&Connection> {
        let visible: HashSet<NoteId> = self.current_notes().iter().map(|n| n.id).collect();
        self.doc
            .connections
            .iter()
            .filter(|c| visible.contains(&c.source_id) && visible.contains(&c.target_id))
            .collect()
    }
}
