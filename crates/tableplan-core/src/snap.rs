//! Pure snapping and clamping functions.
//!
//! Everything in this module is stateless. Malformed numeric input never
//! propagates an error; values fail closed to the nearest valid value.

use kurbo::Point;

/// Grid size for snapping (matches the visual grid).
pub const GRID_SIZE: f64 = 20.0;

/// Rotation snap step in degrees.
pub const ANGLE_STEP: f64 = 15.0;

/// Minimum allowed zoom factor.
pub const MIN_ZOOM: f64 = 0.1;

/// Maximum allowed zoom factor.
pub const MAX_ZOOM: f64 = 3.0;

/// Editable canvas extent in scene units.
pub const SCENE_WIDTH: f64 = 2000.0;
pub const SCENE_HEIGHT: f64 = 1200.0;

/// Elements are kept at least this far inside the canvas edge.
pub const SCENE_MARGIN: f64 = 20.0;

/// Round a value to the nearest multiple of `grid`.
///
/// A non-positive or non-finite grid leaves the value untouched; a
/// non-finite value collapses to `0.0`.
pub fn snap_value(value: f64, grid: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    if !grid.is_finite() || grid <= 0.0 {
        return value;
    }
    (value / grid).round() * grid
}

/// Snap both coordinates of a point to the grid.
pub fn snap_point(point: Point, grid: f64) -> Point {
    Point::new(snap_value(point.x, grid), snap_value(point.y, grid))
}

/// Snap an angle to the nearest multiple of `step`, normalized to [0, 360).
pub fn snap_angle(angle_degrees: f64, step: f64) -> f64 {
    if !angle_degrees.is_finite() {
        return 0.0;
    }
    let snapped = if step.is_finite() && step > 0.0 {
        (angle_degrees / step).round() * step
    } else {
        angle_degrees
    };
    normalize_angle(snapped)
}

/// Normalize an angle into [0, 360).
pub fn normalize_angle(angle_degrees: f64) -> f64 {
    if !angle_degrees.is_finite() {
        return 0.0;
    }
    let a = angle_degrees % 360.0;
    if a < 0.0 { a + 360.0 } else { a }
}

/// Clamp a zoom factor into the valid range.
///
/// NaN fails closed to `1.0` rather than poisoning the viewport.
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return 1.0;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Pull a position into the editable canvas.
///
/// Negative coordinates come back to the margin; coordinates beyond the
/// canvas come back to the nearest in-bounds edge.
pub fn clamp_position(point: Point) -> Point {
    Point::new(
        clamp_axis(point.x, SCENE_WIDTH),
        clamp_axis(point.y, SCENE_HEIGHT),
    )
}

fn clamp_axis(value: f64, extent: f64) -> f64 {
    if !value.is_finite() {
        return SCENE_MARGIN;
    }
    value.clamp(SCENE_MARGIN, extent - SCENE_MARGIN)
}
