//! Screen ↔ logical coordinate conversion for the pannable, zoomable canvas.

use serde::{Deserialize, Deserializer, Serialize};

use crate::geometry::{Rect, Vec2};

/// Smallest allowed canvas zoom.
pub const MIN_ZOOM: f32 = 0.1;

/// Largest allowed canvas zoom.
pub const MAX_ZOOM: f32 = 5.0;

/// Pan offset and zoom scale mapping logical canvas space to the screen.
///
/// `zoom` is private so it can never leave `[MIN_ZOOM, MAX_ZOOM]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasTransform {
    pub pan_offset_x: f32,
    pub pan_offset_y: f32,
    #[serde(deserialize_with = "deserialize_zoom")]
    zoom: f32,
}

impl CanvasTransform {
    /// Identity transform: no pan, zoom 1.
    pub const IDENTITY: Self = Self {
        pan_offset_x: 0.0,
        pan_offset_y: 0.0,
        zoom: 1.0,
    };

    /// Create a transform, clamping zoom into range.
    pub fn new(pan_offset_x: f32, pan_offset_y: f32, zoom: f32) -> Self {
        Self {
            pan_offset_x,
            pan_offset_y,
            zoom: clamp_zoom(zoom),
        }
    }

    /// Current zoom scale.
    #[inline]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Pan offset as a vector.
    #[inline]
    pub fn pan(&self) -> Vec2 {
        Vec2::new(self.pan_offset_x, self.pan_offset_y)
    }

    /// Set the zoom, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = clamp_zoom(zoom);
    }

    /// Multiply the zoom by `factor`, clamped.
    pub fn scale_zoom(&mut self, factor: f32) {
        self.set_zoom(self.zoom * factor);
    }

    /// Move the pan offset by a screen-space delta.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan_offset_x += delta.x;
        self.pan_offset_y += delta.y;
    }

    /// Reset pan and zoom to the identity.
    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_nan() {
        1.0
    } else {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    }
}

fn deserialize_zoom<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    f32::deserialize(deserializer).map(clamp_zoom)
}

/// Convert a screen position to logical canvas coordinates.
///
/// Subtracts the container origin, then the pan offset, then divides by zoom.
#[inline]
pub fn screen_to_logical(screen: Vec2, container: Rect, transform: &CanvasTransform) -> Vec2 {
    (screen - container.min() - transform.pan()) / transform.zoom()
}

/// Convert logical canvas coordinates to a screen position.
#[inline]
pub fn logical_to_screen(logical: Vec2, container: Rect, transform: &CanvasTransform) -> Vec2 {
    logical * transform.zoom() + transform.pan() + container.min()
}

/// Round `value` to the nearest multiple of `grid_size` when `enabled`.
///
/// A non-positive grid size disables snapping.
#[inline]
pub fn snap_to_grid(value: f32, grid_size: f32, enabled: bool) -> f32 {
    if !enabled || grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}
