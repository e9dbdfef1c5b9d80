//! Document core for the sticky-note board.
//!
//! This crate is the headless heart of the application: it owns the
//! canonical board document (themes, notes, connections), the transient
//! interaction state (selection, connect-mode), and the view transform
//! (zoom/pan). The host UI layer wires pointer events to [`store::BoardStore`]
//! mutations and reads the derived projections back out at render time; the
//! `sync` crate persists committed documents locally and remotely. Nothing
//! in here performs I/O.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | Single source of truth: every mutation and query operation |
//! | [`doc`] | Document entity types and sparse-update types |
//! | [`view`] | Zoom/pan viewport, clamping, and fit-to-view |
//! | [`connector`] | Connector-line geometry between note rectangles |
//! | [`export`] | Export/import of the document as human-readable JSON |
//! | [`consts`] | Shared numeric constants (zoom limits, note sizes, etc.) |

pub mod connector;
pub mod consts;
pub mod doc;
pub mod export;
pub mod store;
pub mod view;
