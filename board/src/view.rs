//! Viewport state: zoom/pan for the canvas, clamping, and fit-to-view.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use crate::consts::{FIT_PADDING, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
use crate::doc::{Point, StickyNote};

/// View transform for the canvas.
///
/// `zoom` is a scale factor clamped to `[ZOOM_MIN, ZOOM_MAX]`;
/// `pan` is the canvas offset in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f64,
    pub pan: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { zoom: 1.0, pan: Point::new(0.0, 0.0) }
    }
}

impl Viewport {
    /// Zoom in one step.
    pub fn zoom_in(&mut self) {
        self.zoom = clamp_zoom(self.zoom * ZOOM_STEP);
    }

    /// Zoom out one step.
    pub fn zoom_out(&mut self) {
        self.zoom = clamp_zoom(self.zoom / ZOOM_STEP);
    }

    /// Set the zoom factor, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
    }

    /// Set the pan offset.
    pub fn set_pan(&mut self, pan: Point) {
        self.pan = pan;
    }

    /// Reset to zoom 1.0 and zero pan.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(ZOOM_MIN, ZOOM_MAX)
}

/// Axis-aligned bounding box over note rectangles, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Bounding box over `notes`. `None` when there are no notes.
    #[must_use]
    pub fn of_notes<'a>(notes: impl IntoIterator<Item = &'a StickyNote>) -> Option<Self> {
        let mut bounds: Option<Self> = None;
        for note in notes {
            let min = note.position;
            let max = Point::new(min.x + note.size.width, min.y + note.size.height);
            bounds = Some(match bounds {
                None => Self { min, max },
                Some(b) => Self {
                    min: Point::new(b.min.x.min(min.x), b.min.y.min(min.y)),
                    max: Point::new(b.max.x.max(max.x), b.max.y.max(max.y)),
                },
            });
        }
        bounds
    }

    /// Content width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Content height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Viewport that fits `bounds` (plus [`FIT_PADDING`] on each side) centered
/// in a container of the given screen size.
///
/// The computed zoom never exceeds 1.0 (fit never zooms in past 100%) and
/// never drops below the global minimum.
#[must_use]
pub fn fit_to_bounds(bounds: Bounds, container_width: f64, container_height: f64) -> Viewport {
    let scale_x = (container_width - FIT_PADDING * 2.0) / bounds.width();
    let scale_y = (container_height - FIT_PADDING * 2.0) / bounds.height();
    let zoom = clamp_zoom(scale_x.min(scale_y).min(1.0));

    let center_x = (container_width - bounds.width() * zoom) / 2.0;
    let center_y = (container_height - bounds.height() * zoom) / 2.0;
    Viewport {
        zoom,
        pan: Point::new(center_x - bounds.min.x * zoom, center_y - bounds.min.y * zoom),
    }
}
