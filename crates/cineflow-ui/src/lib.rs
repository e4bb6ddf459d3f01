//! CineFlow UI - editor controllers and egui widgets
//!
//! Provides the interactive layer of the canvas editor:
//! - Pointer/touch input with an egui adapter
//! - Gesture controller (pan, pinch-zoom, double-tap, element move/resize)
//! - Canvas size/resize controller
//! - Playhead controller (scrub, seek, inline time entry, playback clock)
//! - Element presenters driving media playback
//! - Asset drop handling
//! - The editor session tying them to a project
//! - egui canvas and timeline widgets

pub mod drop;
pub mod gesture;
pub mod input;
pub mod lock;
pub mod playhead;
pub mod presenter;
pub mod resize;
pub mod session;
pub mod theme;
pub mod throttle;
pub mod widgets;

pub use gesture::{GestureController, GestureOutcome, Selection};
pub use input::{EguiInputAdapter, InputEvent, TouchPoint, Viewport};
pub use lock::{InputLock, InputLockHost};
pub use playhead::{EditKey, PlayheadController, TrackGeometry};
pub use presenter::{
    ClockPlayback, MediaPlayback, MediaPresenter, PlaybackError, Presentation, RenderContext,
};
pub use resize::{CanvasSizeController, ResizeCorner};
pub use session::EditorSession;
pub use widgets::{CanvasView, TimelineBar};
