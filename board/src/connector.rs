//! Connector-line geometry between two note rectangles.
//!
//! A connection is rendered as a straight segment from the boundary of the
//! source note to the boundary of the target note. Each endpoint sits on
//! one of the four rectangle edges, chosen by the quadrant of the angle
//! between the two note centers. The functions here are deterministic and
//! side-effect-free; the host re-derives the line whenever either note
//! moves.

#[cfg(test)]
#[path = "connector_test.rs"]
mod connector_test;

use std::f64::consts::FRAC_PI_4;

use crate::doc::{Point, StickyNote};

/// Endpoints of the segment drawn for one connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorLine {
    /// Point on the source note's boundary.
    pub source: Point,
    /// Point on the target note's boundary.
    pub target: Point,
}

impl ConnectorLine {
    /// Midpoint of the segment; where the delete affordance is placed.
    #[must_use]
    pub fn midpoint(&self) -> Point {
        Point {
            x: (self.source.x + self.target.x) / 2.0,
            y: (self.source.y + self.target.y) / 2.0,
        }
    }
}

/// Compute the connector segment between `source` and `target`.
///
/// Reads only the note rectangles (position and size).
#[must_use]
pub fn connector_line(source: &StickyNote, target: &StickyNote) -> ConnectorLine {
    ConnectorLine {
        source: edge_point(source, target.center()),
        target: edge_point(target, source.center()),
    }
}

/// Point on `note`'s boundary facing `toward`.
///
/// The edge is picked by the quadrant of the angle from the note's center
/// to `toward`: within 45° of horizontal resolves to the right or left
/// edge, otherwise the bottom or top edge by the sign of the vertical
/// component.
fn edge_point(note: &StickyNote, toward: Point) -> Point {
    let center = note.center();
    let angle = (toward.y - center.y).atan2(toward.x - center.x);

    let pos = note.position;
    let size = note.size;
    if angle.abs() < FRAC_PI_4 {
        // Right edge.
        Point::new(pos.x + size.width, center.y)
    } else if angle.abs() > 3.0 * FRAC_PI_4 {
        // Left edge.
        Point::new(pos.x, center.y)
    } else if angle > 0.0 {
        // Bottom edge (y grows downward).
        Point::new(center.x, pos.y + size.height)
    } else {
        // Top edge.
        Point::new(center.x, pos.y)
    }
}
