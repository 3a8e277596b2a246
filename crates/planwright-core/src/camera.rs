//! View transform between device pixels and plan units.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom level of a freshly reset camera.
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Direction keys held during a keyboard scroll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollDirection {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl ScrollDirection {
    pub fn is_idle(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }
}

/// Pan offset plus zoom factor. `screen = offset + world * zoom`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Screen position of the plan origin.
    pub offset: Vec2,
    pub zoom: f64,
    /// Additive zoom change per wheel notch
    pub zoom_step: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: DEFAULT_ZOOM,
            zoom_step: 0.05,
            min_zoom: 0.05,
            max_zoom: 10.0,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera with custom zoom limits.
    pub fn with_limits(zoom_step: f64, min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            zoom_step,
            min_zoom,
            max_zoom,
            ..Self::default()
        }
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts world coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to world coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Pan the camera by a delta in screen coordinates. Content follows
    /// the delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Set the zoom, keeping the given screen point fixed.
    pub fn zoom_to(&mut self, screen_point: Point, zoom: f64) {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        // Convert screen point to world before zoom
        let world_point = self.screen_to_world(screen_point);

        self.zoom = new_zoom;

        // Adjust offset so world_point stays at screen_point
        let new_screen = self.world_to_screen(world_point);
        self.offset += screen_point - new_screen;
    }

    /// Step the zoom by one wheel notch per unit of `wheel_delta`, anchored
    /// at `screen_point`. Positive deltas zoom in.
    pub fn zoom_wheel(&mut self, screen_point: Point, wheel_delta: f64) {
        if wheel_delta == 0.0 {
            return;
        }
        let step = self.zoom_step * wheel_delta.signum();
        self.zoom_to(screen_point, self.zoom + step);
    }

    /// Move the view by `distance` world units in the held directions.
    pub fn scroll(&mut self, direction: ScrollDirection, distance: f64) {
        let mut delta = Vec2::ZERO;
        if direction.up {
            delta.y -= distance;
        }
        if direction.down {
            delta.y += distance;
        }
        if direction.left {
            delta.x -= distance;
        }
        if direction.right {
            delta.x += distance;
        }
        // The view moves by `delta`, so content moves the other way.
        self.offset -= delta * self.zoom;
    }

    /// Reset camera to default position and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = DEFAULT_ZOOM;
    }
}
