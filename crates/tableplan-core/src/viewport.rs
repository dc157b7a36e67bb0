//! Viewport state: pan/zoom transform plus grid and snap flags.

use crate::snap::{clamp_zoom, MAX_ZOOM, MIN_ZOOM};
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// View state of the scene, independent of element content.
///
/// Converts between screen coordinates (pointer events) and scene
/// coordinates (element geometry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Current translation offset (pan), in screen units.
    pub offset: Vec2,
    /// Current zoom factor, clamped to [0.1, 3.0].
    pub zoom: f64,
    /// Whether the background grid is drawn.
    #[serde(default = "default_true")]
    pub show_grid: bool,
    /// Whether positions snap to the grid.
    #[serde(default = "default_true")]
    pub snap_to_grid: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            show_grid: true,
            snap_to_grid: true,
        }
    }
}

impl Viewport {
    /// Create a viewport with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transform converting scene coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Inverse transform for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to scene coordinates.
    pub fn screen_to_scene(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a scene point to screen coordinates.
    pub fn scene_to_screen(&self, scene_point: Point) -> Point {
        self.transform() * scene_point
    }

    /// Pan by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Set the zoom factor, clamped to the valid range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
    }

    /// Zoom by a factor, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = clamp_zoom(self.zoom * factor);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let scene_point = self.screen_to_scene(screen_point);
        self.zoom = new_zoom;

        // Adjust offset so scene_point stays under the cursor
        let new_screen = self.scene_to_screen(scene_point);
        self.offset += Vec2::new(
            screen_point.x - new_screen.x,
            screen_point.y - new_screen.y,
        );
    }

    /// Whether the zoom can still increase.
    pub fn can_zoom_in(&self) -> bool {
        self.zoom < MAX_ZOOM
    }

    /// Whether the zoom can still decrease.
    pub fn can_zoom_out(&self) -> bool {
        self.zoom > MIN_ZOOM
    }

    /// Reset pan and zoom, keeping the grid/snap flags.
    pub fn reset_view(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }

    /// Toggle grid visibility.
    pub fn toggle_grid(&mut self) {
        self.show_grid = !self.show_grid;
    }

    /// Toggle grid snapping.
    pub fn toggle_snap(&mut self) {
        self.snap_to_grid = !self.snap_to_grid;
    }
}
