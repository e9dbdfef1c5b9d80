//! Shared numeric constants for the board core.

// ── Notes ───────────────────────────────────────────────────────

/// Width of a freshly created note, in world units.
pub const DEFAULT_NOTE_WIDTH: f64 = 200.0;

/// Height of a freshly created note, in world units.
pub const DEFAULT_NOTE_HEIGHT: f64 = 150.0;

/// Minimum note width a resize can reach.
pub const MIN_NOTE_WIDTH: f64 = 100.0;

/// Minimum note height a resize can reach.
pub const MIN_NOTE_HEIGHT: f64 = 80.0;

// ── Viewport ────────────────────────────────────────────────────

/// Lowest allowed zoom factor.
pub const ZOOM_MIN: f64 = 0.1;

/// Highest allowed zoom factor.
pub const ZOOM_MAX: f64 = 3.0;

/// Multiplier applied per zoom-in step (and divided per zoom-out step).
pub const ZOOM_STEP: f64 = 1.2;

/// Padding around the content bounding box for fit-to-view, in screen pixels.
pub const FIT_PADDING: f64 = 100.0;
