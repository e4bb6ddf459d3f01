//! Rendered canvas size: container fitting and manual corner-drag resize.

use cineflow_core::{calculate_canvas_size, AspectRatio, Rect, Size, Vec2};
use tracing::debug;

use crate::lock::{InputLock, InputLockHost};
use crate::throttle::Throttle;

/// Which canvas corner is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeCorner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeCorner {
    pub const ALL: [Self; 4] = [Self::TopLeft, Self::TopRight, Self::BottomLeft, Self::BottomRight];

    /// Sign applied to pointer movement so that dragging outward grows the canvas.
    fn outward(self) -> Vec2 {
        match self {
            Self::TopLeft => Vec2::new(-1.0, -1.0),
            Self::TopRight => Vec2::new(1.0, -1.0),
            Self::BottomLeft => Vec2::new(-1.0, 1.0),
            Self::BottomRight => Vec2::new(1.0, 1.0),
        }
    }

    /// Corner position on a rectangle.
    pub fn point(self, rect: Rect) -> Vec2 {
        let (min, max) = (rect.min(), rect.max());
        match self {
            Self::TopLeft => min,
            Self::TopRight => Vec2::new(max.x, min.y),
            Self::BottomLeft => Vec2::new(min.x, max.y),
            Self::BottomRight => max,
        }
    }
}

/// Aspect-locked size for a corner drag.
///
/// Builds one candidate from the horizontal delta and one from the vertical
/// delta, then keeps the one with the larger area. Ties go to the horizontal
/// candidate.
pub fn resize_candidate(start: Size, delta: Vec2, ratio: f32) -> Size {
    let ratio = if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        AspectRatio::WIDESCREEN.ratio()
    };
    let width = (start.width + delta.x).max(0.0);
    let by_x = Size::new(width, width / ratio);
    let height = (start.height + delta.y).max(0.0);
    let by_y = Size::new(height * ratio, height);

    if by_y.area() > by_x.area() {
        by_y
    } else {
        by_x
    }
}

enum ResizeState {
    Idle,
    Resizing {
        corner: ResizeCorner,
        start_pointer: Vec2,
        start_size: Size,
        /// Manual override in effect before the drag.
        start_manual: bool,
        latest: Size,
        _lock: InputLock,
    },
}

/// Keeps the rendered canvas fitted to its container, or at a size the user
/// dragged it to.
pub struct CanvasSizeController {
    aspect: AspectRatio,
    logical: Size,
    container: Size,
    canvas: Size,
    manual: bool,
    state: ResizeState,
    throttle: Throttle<Size>,
    locks: InputLockHost,
    attached: bool,
}

impl CanvasSizeController {
    pub fn new(aspect: AspectRatio, logical: Size, throttle_ms: f64, locks: InputLockHost) -> Self {
        Self {
            aspect,
            logical,
            container: Size::ZERO,
            canvas: Size::ZERO,
            manual: false,
            state: ResizeState::Idle,
            throttle: Throttle::new(throttle_ms),
            locks,
            attached: false,
        }
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// Stop observing; an unfinished drag is dropped without applying.
    pub fn detach(&mut self) {
        if let ResizeState::Resizing {
            start_size,
            start_manual,
            ..
        } = std::mem::replace(&mut self.state, ResizeState::Idle)
        {
            self.canvas = start_size;
            self.manual = start_manual;
        }
        self.throttle.cancel();
        self.attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn aspect(&self) -> AspectRatio {
        self.aspect
    }

    /// Current rendered canvas size in screen pixels.
    pub fn canvas_size(&self) -> Size {
        self.canvas
    }

    /// Rendered width over logical width.
    pub fn display_scale(&self) -> f32 {
        if self.logical.width > 0.0 {
            self.canvas.width / self.logical.width
        } else {
            0.0
        }
    }

    /// Whether a manual resize overrides container fitting.
    pub fn is_manual(&self) -> bool {
        self.manual
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.state, ResizeState::Resizing { .. })
    }

    /// Canvas rectangle centered in `container`.
    pub fn canvas_rect(&self, container: Rect) -> Rect {
        container.centered(self.canvas)
    }

    /// Container size changed. Returns the new canvas size if it changed.
    pub fn on_container_resize(&mut self, container: Size) -> Option<Size> {
        if !self.attached || container == self.container {
            return None;
        }
        self.container = container;
        if self.manual {
            return None;
        }
        self.refit()
    }

    /// Drop any manual size and fit the container again.
    pub fn reset_size(&mut self) -> Size {
        self.manual = false;
        self.refit();
        self.canvas
    }

    /// Switch aspect ratio. A manual size keeps its width.
    pub fn set_aspect_ratio(&mut self, aspect: AspectRatio) {
        self.aspect = aspect;
        if self.manual {
            let width = self.canvas.width;
            self.canvas = Size::new(width, width / aspect.ratio());
        } else {
            self.refit();
        }
    }

    fn refit(&mut self) -> Option<Size> {
        let fitted =
            calculate_canvas_size(self.container.width, self.container.height, self.aspect.ratio());
        if fitted == self.canvas {
            return None;
        }
        debug!(width = fitted.width, height = fitted.height, "Canvas refit");
        self.canvas = fitted;
        Some(fitted)
    }

    /// Pointer went down on a corner handle.
    pub fn begin_resize(&mut self, pointer: Vec2, corner: ResizeCorner) -> bool {
        if !self.attached || self.is_resizing() {
            return false;
        }
        self.state = ResizeState::Resizing {
            corner,
            start_pointer: pointer,
            start_size: self.canvas,
            start_manual: self.manual,
            latest: self.canvas,
            _lock: self.locks.acquire("canvas-resize"),
        };
        true
    }

    /// Pointer moved during a resize. Returns the applied size, if not throttled.
    pub fn resize_to(&mut self, pointer: Vec2, time_ms: f64) -> Option<Size> {
        let ResizeState::Resizing {
            corner,
            start_pointer,
            start_size,
            latest,
            ..
        } = &mut self.state
        else {
            return None;
        };
        let delta = (pointer - *start_pointer) * corner.outward();
        let size = resize_candidate(*start_size, delta, self.aspect.ratio());
        *latest = size;
        let applied = self.throttle.offer(size, time_ms)?;
        self.canvas = applied;
        self.manual = true;
        Some(applied)
    }

    /// Pointer released. The last computed size always applies.
    pub fn end_resize(&mut self) -> Option<Size> {
        let state = std::mem::replace(&mut self.state, ResizeState::Idle);
        let ResizeState::Resizing { latest, .. } = state else {
            return None;
        };
        self.throttle.cancel();
        self.canvas = latest;
        self.manual = true;
        debug!(width = latest.width, height = latest.height, "Canvas resized");
        Some(latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(locks: &InputLockHost) -> CanvasSizeController {
        let mut c = CanvasSizeController::new(
            AspectRatio::WIDESCREEN,
            Size::new(1920.0, 1080.0),
            16.0,
            locks.clone(),
        );
        c.attach();
        c
    }

    #[test]
    fn test_larger_area_candidate_wins() {
        let size = resize_candidate(Size::new(1000.0, 500.0), Vec2::new(100.0, 10.0), 2.0);
        assert_eq!(size, Size::new(1100.0, 550.0));

        let size = resize_candidate(Size::new(1000.0, 500.0), Vec2::new(10.0, 100.0), 2.0);
        assert_eq!(size, Size::new(1200.0, 600.0));
    }

    #[test]
    fn test_candidate_never_negative() {
        let size = resize_candidate(Size::new(100.0, 50.0), Vec2::new(-500.0, -500.0), 2.0);
        assert_eq!(size, Size::ZERO);
    }

    #[test]
    fn test_container_fit_and_scale() {
        let locks = InputLockHost::new();
        let mut c = controller(&locks);
        assert_eq!(c.on_container_resize(Size::new(960.0, 1000.0)), Some(Size::new(960.0, 540.0)));
        assert_eq!(c.display_scale(), 0.5);
        // Same container: nothing to do.
        assert_eq!(c.on_container_resize(Size::new(960.0, 1000.0)), None);
    }

    #[test]
    fn test_manual_override_survives_container_resize() {
        let locks = InputLockHost::new();
        let mut c = controller(&locks);
        c.on_container_resize(Size::new(1600.0, 900.0));

        assert!(c.begin_resize(Vec2::new(1600.0, 900.0), ResizeCorner::BottomRight));
        assert!(locks.is_locked());
        c.resize_to(Vec2::new(1500.0, 800.0), 0.0);
        let end = c.end_resize();
        assert_eq!(end, Some(Size::new(1500.0, 843.75)));
        assert!(!locks.is_locked());
        assert!(c.is_manual());

        assert_eq!(c.on_container_resize(Size::new(800.0, 450.0)), None);
        assert_eq!(c.canvas_size(), Size::new(1500.0, 843.75));

        assert_eq!(c.reset_size(), Size::new(800.0, 450.0));
        assert!(!c.is_manual());
    }

    #[test]
    fn test_top_left_drag_outward_grows() {
        let locks = InputLockHost::new();
        let logical = Size::new(1920.0, 960.0);
        let mut c = CanvasSizeController::new(AspectRatio::new(2.0, 1.0), logical, 16.0, locks);
        c.attach();
        c.on_container_resize(Size::new(1000.0, 500.0));
        c.begin_resize(Vec2::ZERO, ResizeCorner::TopLeft);
        assert_eq!(c.resize_to(Vec2::new(-100.0, -10.0), 0.0), Some(Size::new(1100.0, 550.0)));
    }

    #[test]
    fn test_throttled_moves_still_apply_on_release() {
        let locks = InputLockHost::new();
        let mut c = controller(&locks);
        c.on_container_resize(Size::new(1600.0, 900.0));
        c.begin_resize(Vec2::ZERO, ResizeCorner::BottomRight);
        assert!(c.resize_to(Vec2::new(-160.0, -200.0), 0.0).is_some());
        assert!(c.resize_to(Vec2::new(-320.0, -400.0), 5.0).is_none());
        assert_eq!(c.canvas_size(), Size::new(1440.0, 810.0));
        assert_eq!(c.end_resize(), Some(Size::new(1280.0, 720.0)));
        assert_eq!(c.canvas_size(), Size::new(1280.0, 720.0));
    }

    #[test]
    fn test_detach_restores_and_unlocks() {
        let locks = InputLockHost::new();
        let mut c = controller(&locks);
        c.on_container_resize(Size::new(1600.0, 900.0));
        c.begin_resize(Vec2::ZERO, ResizeCorner::BottomRight);
        c.resize_to(Vec2::new(100.0, 0.0), 0.0);
        c.detach();
        assert!(!locks.is_locked());
        assert_eq!(c.canvas_size(), Size::new(1600.0, 900.0));
        assert!(!c.is_manual());
        assert!(!c.begin_resize(Vec2::ZERO, ResizeCorner::BottomRight));

        // The aborted drag left no override: fitting resumes.
        c.attach();
        assert_eq!(c.on_container_resize(Size::new(800.0, 450.0)), Some(Size::new(800.0, 450.0)));
        assert_eq!(c.canvas_size(), Size::new(800.0, 450.0));
    }
}
