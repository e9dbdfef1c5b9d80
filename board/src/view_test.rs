#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::doc::{NoteColor, Size, StickyNote};

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn note_at(x: f64, y: f64, width: f64, height: f64) -> StickyNote {
    StickyNote {
        id: Uuid::new_v4(),
        content: String::new(),
        position: Point::new(x, y),
        size: Size::new(width, height),
        color: NoteColor::default(),
        theme_id: None,
    }
}

// --- Defaults ---

#[test]
fn default_viewport_is_identity() {
    let vp = Viewport::default();
    assert_eq!(vp.zoom, 1.0);
    assert_eq!(vp.pan, Point::new(0.0, 0.0));
}

// --- Zoom stepping and clamping ---

#[test]
fn zoom_in_multiplies_by_step() {
    let mut vp = Viewport::default();
    vp.zoom_in();
    assert!(approx_eq(vp.zoom, 1.2));
}

#[test]
fn zoom_out_divides_by_step() {
    let mut vp = Viewport::default();
    vp.zoom_out();
    assert!(approx_eq(vp.zoom, 1.0 / 1.2));
}

#[test]
fn repeated_zoom_in_never_exceeds_max() {
    let mut vp = Viewport::default();
    for _ in 0..50 {
        vp.zoom_in();
    }
    assert_eq!(vp.zoom, 3.0);
}

#[test]
fn repeated_zoom_out_never_drops_below_min() {
    let mut vp = Viewport::default();
    for _ in 0..50 {
        vp.zoom_out();
    }
    assert_eq!(vp.zoom, 0.1);
}

#[test]
fn set_zoom_clamps_both_ends() {
    let mut vp = Viewport::default();
    vp.set_zoom(10.0);
    assert_eq!(vp.zoom, 3.0);
    vp.set_zoom(0.0);
    assert_eq!(vp.zoom, 0.1);
    vp.set_zoom(1.5);
    assert_eq!(vp.zoom, 1.5);
}

#[test]
fn reset_restores_identity() {
    let mut vp = Viewport { zoom: 2.0, pan: Point::new(40.0, -10.0) };
    vp.reset();
    assert_eq!(vp, Viewport::default());
}

// --- Bounds ---

#[test]
fn bounds_of_no_notes_is_none() {
    let notes: [&StickyNote; 0] = [];
    assert_eq!(Bounds::of_notes(notes), None);
}

#[test]
fn bounds_of_single_note() {
    let note = note_at(50.0, 60.0, 200.0, 150.0);
    let bounds = Bounds::of_notes([&note]).unwrap();
    assert_eq!(bounds.min, Point::new(50.0, 60.0));
    assert_eq!(bounds.max, Point::new(250.0, 210.0));
    assert_eq!(bounds.width(), 200.0);
    assert_eq!(bounds.height(), 150.0);
}

#[test]
fn bounds_spans_multiple_notes() {
    let a = note_at(0.0, 0.0, 100.0, 80.0);
    let b = note_at(400.0, 300.0, 200.0, 150.0);
    let bounds = Bounds::of_notes([&a, &b]).unwrap();
    assert_eq!(bounds.min, Point::new(0.0, 0.0));
    assert_eq!(bounds.max, Point::new(600.0, 450.0));
}

#[test]
fn bounds_handles_negative_world_coordinates() {
    let a = note_at(-300.0, -200.0, 100.0, 80.0);
    let b = note_at(100.0, 50.0, 100.0, 80.0);
    let bounds = Bounds::of_notes([&a, &b]).unwrap();
    assert_eq!(bounds.min, Point::new(-300.0, -200.0));
    assert_eq!(bounds.max, Point::new(200.0, 130.0));
}

// --- fit_to_bounds ---

#[test]
fn fit_single_note_is_centered_at_unit_zoom() {
    // A 200x150 note at (50, 50) in a 1000x800 container: the padded
    // content fits without scaling, so zoom stays at 1.0 and the note's
    // box is centered.
    let note = note_at(50.0, 50.0, 200.0, 150.0);
    let bounds = Bounds::of_notes([&note]).unwrap();
    let vp = fit_to_bounds(bounds, 1000.0, 800.0);

    assert!(vp.zoom <= 1.0);
    assert_eq!(vp.zoom, 1.0);

    // Note rectangle center maps to the container center.
    let center_x = (50.0 + 100.0) * vp.zoom + vp.pan.x;
    let center_y = (50.0 + 75.0) * vp.zoom + vp.pan.y;
    assert!(approx_eq(center_x, 500.0));
    assert!(approx_eq(center_y, 400.0));
}

#[test]
fn fit_wide_content_scales_down() {
    let a = note_at(0.0, 0.0, 200.0, 150.0);
    let b = note_at(1800.0, 0.0, 200.0, 150.0);
    let bounds = Bounds::of_notes([&a, &b]).unwrap();
    let vp = fit_to_bounds(bounds, 1000.0, 800.0);

    // Content is 2000 wide; 800 usable pixels -> zoom 0.4.
    assert!(approx_eq(vp.zoom, 0.4));
}

#[test]
fn fit_never_zooms_in_past_unity() {
    let note = note_at(0.0, 0.0, 100.0, 80.0);
    let bounds = Bounds::of_notes([&note]).unwrap();
    let vp = fit_to_bounds(bounds, 4000.0, 4000.0);
    assert_eq!(vp.zoom, 1.0);
}

#[test]
fn fit_zoom_is_clamped_to_global_minimum() {
    let a = note_at(0.0, 0.0, 200.0, 150.0);
    let b = note_at(100_000.0, 0.0, 200.0, 150.0);
    let bounds = Bounds::of_notes([&a, &b]).unwrap();
    let vp = fit_to_bounds(bounds, 1000.0, 800.0);
    assert_eq!(vp.zoom, 0.1);
}

#[test]
fn fit_centers_offset_content() {
    let note = note_at(-500.0, 300.0, 200.0, 150.0);
    let bounds = Bounds::of_notes([&note]).unwrap();
    let vp = fit_to_bounds(bounds, 1000.0, 800.0);

    let center_x = (-500.0 + 100.0) * vp.zoom + vp.pan.x;
    let center_y = (300.0 + 75.0) * vp.zoom + vp.pan.y;
    assert!(approx_eq(center_x, 500.0));
    assert!(approx_eq(center_y, 400.0));
}
