//! CineFlow Core - Foundation types for the canvas editor
//!
//! This crate provides the fundamental types used throughout CineFlow:
//! - Geometric primitives (Vec2, Size, Rect)
//! - Screen/logical coordinate transforms and grid snapping
//! - Aspect ratio parsing and canvas fitting
//! - Timeline time mapping, formatting and parsing
//! - Editor configuration

pub mod aspect;
pub mod config;
pub mod error;
pub mod geometry;
pub mod time;
pub mod transform;

pub use aspect::{calculate_canvas_size, parse_aspect_ratio, AspectRatio};
pub use config::EditorConfig;
pub use error::{CineFlowError, Result};
pub use geometry::{Rect, Size, Vec2};
pub use time::{format_time, parse_time, position_to_time, time_to_position, TimelineState};
pub use transform::{
    logical_to_screen, screen_to_logical, snap_to_grid, CanvasTransform, MAX_ZOOM, MIN_ZOOM,
};

/// Fixed logical canvas resolution.
pub mod logical {
    /// Logical canvas width in authoring units.
    pub const WIDTH: f32 = 1920.0;

    /// Logical canvas height in authoring units.
    pub const HEIGHT: f32 = 1080.0;
}
