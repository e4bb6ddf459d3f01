//! Gesture controller: pan, pinch-zoom, double-tap reset and element move/resize.
//!
//! Mouse and touch input drive the same state machine. The controller owns
//! the canvas transform; element edits come out as [`GestureOutcome`]s for
//! the session to apply to the document.

use cineflow_core::{snap_to_grid, CanvasTransform, EditorConfig, Rect, Size, Vec2};
use tracing::debug;
use uuid::Uuid;

use crate::input::{InputEvent, Touches, Viewport};
use crate::lock::{InputLock, InputLockHost};
use crate::throttle::Throttle;

/// Side of the square resize handle, in screen pixels.
pub const HANDLE_SIZE_PX: f32 = 16.0;

// ── Selection ──────────────────────────────────────────────────

/// The selected element's geometry at the moment a gesture starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub id: Uuid,
    pub position: Vec2,
    pub size: Size,
}

impl Selection {
    /// Element bounds in logical units.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Logical-space square centered on the bottom-right corner.
    pub fn handle_rect(&self, pixels_per_unit: f32) -> Rect {
        let side = HANDLE_SIZE_PX / pixels_per_unit.max(f32::EPSILON);
        let corner = self.rect().max();
        Rect::new(corner.x - side * 0.5, corner.y - side * 0.5, side, side)
    }
}

// ── Outcomes ───────────────────────────────────────────────────

/// What a gesture changed.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// Pan or zoom changed.
    TransformChanged(CanvasTransform),
    /// Double-tap restored the default pan/zoom.
    ViewReset,
    /// Press landed outside the selected element.
    SelectionCleared,
    /// Live position while dragging an element.
    PreviewMove { id: Uuid, position: Vec2 },
    /// Live size while dragging a resize handle.
    PreviewResize { id: Uuid, size: Size },
    /// Element drag finished.
    CommitMove { id: Uuid, from: Vec2, to: Vec2 },
    /// Element resize finished.
    CommitResize { id: Uuid, from: Size, to: Size },
    /// Element gesture aborted; restore the original geometry.
    Cancelled { id: Uuid, position: Vec2, size: Size },
}

// ── Settings ───────────────────────────────────────────────────

/// Gesture tunables, usually taken from [`EditorConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSettings {
    pub min_element_width: f32,
    pub double_tap_ms: f64,
    pub double_tap_slop: f32,
    pub throttle_ms: f64,
    pub grid_size: f32,
    pub grid_enabled: bool,
    /// Pinch zoom range, inside the hard
    /// [`cineflow_core::MIN_ZOOM`]..[`cineflow_core::MAX_ZOOM`] bounds.
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl From<&EditorConfig> for GestureSettings {
    fn from(config: &EditorConfig) -> Self {
        Self {
            min_element_width: config.min_element_width,
            double_tap_ms: config.double_tap_ms,
            double_tap_slop: config.double_tap_slop,
            throttle_ms: config.throttle_ms,
            grid_size: config.grid_size,
            grid_enabled: config.grid_enabled,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
        }
    }
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

// ── State ──────────────────────────────────────────────────────

enum Gesture {
    Idle,
    Pan {
        last: Vec2,
        _lock: InputLock,
    },
    Pinch {
        last_distance: f32,
        _lock: InputLock,
    },
    Move {
        selection: Selection,
        start: Vec2,
        current: Vec2,
        _lock: InputLock,
    },
    Resize {
        selection: Selection,
        start: Vec2,
        current: Size,
        _lock: InputLock,
    },
}

impl Gesture {
    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pan { .. } => "pan",
            Self::Pinch { .. } => "pinch",
            Self::Move { .. } => "move",
            Self::Resize { .. } => "resize",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Tap {
    pos: Vec2,
    time_ms: f64,
}

/// Turns pointer and touch events into canvas transform changes and element edits.
///
/// Events are ignored until [`attach`](Self::attach) and after
/// [`detach`](Self::detach). Each active gesture holds an [`InputLock`].
pub struct GestureController {
    settings: GestureSettings,
    transform: CanvasTransform,
    gesture: Gesture,
    last_tap: Option<Tap>,
    throttle: Throttle<GestureOutcome>,
    locks: InputLockHost,
    attached: bool,
}

impl GestureController {
    pub fn new(
        settings: GestureSettings,
        transform: CanvasTransform,
        locks: InputLockHost,
    ) -> Self {
        Self {
            settings,
            transform,
            gesture: Gesture::Idle,
            last_tap: None,
            throttle: Throttle::new(settings.throttle_ms),
            locks,
            attached: false,
        }
    }

    /// Start receiving events.
    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// Stop receiving events, aborting any gesture in flight.
    pub fn detach(&mut self) -> Vec<GestureOutcome> {
        let mut out = Vec::new();
        self.cancel(&mut out);
        self.last_tap = None;
        self.attached = false;
        out
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether a gesture is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    /// Current pan/zoom.
    pub fn transform(&self) -> CanvasTransform {
        self.transform
    }

    /// Replace the transform, e.g. after loading a project.
    pub fn set_transform(&mut self, transform: CanvasTransform) {
        self.transform = transform;
    }

    pub fn settings(&self) -> &GestureSettings {
        &self.settings
    }

    pub fn set_grid(&mut self, enabled: bool) {
        self.settings.grid_enabled = enabled;
    }

    /// Feed one event. `selection` is the selected element, if any.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        viewport: &Viewport,
        selection: Option<Selection>,
    ) -> Vec<GestureOutcome> {
        let mut out = Vec::new();
        if !self.attached {
            return out;
        }

        match event {
            InputEvent::PointerDown { pos, time_ms } => {
                self.press(*pos, viewport, selection, *time_ms, &mut out);
            }
            InputEvent::PointerMove { pos, time_ms } => {
                self.drag(*pos, viewport, *time_ms, &mut out);
            }
            InputEvent::PointerUp { .. } => self.release(&mut out),
            InputEvent::TouchStart { touches, time_ms } => {
                self.touch_start(touches, viewport, selection, *time_ms, &mut out);
            }
            InputEvent::TouchMove { touches, time_ms } => match touches.len() {
                2 if matches!(self.gesture, Gesture::Pinch { .. }) => {
                    self.pinch_to(touches, &mut out)
                }
                1 => self.drag(touches[0].pos, viewport, *time_ms, &mut out),
                _ => {}
            },
            InputEvent::TouchEnd { touches, .. } => {
                if touches.is_empty() {
                    self.release(&mut out);
                } else if matches!(self.gesture, Gesture::Pinch { .. }) {
                    // One finger left: stop zooming without jumping into a pan.
                    self.gesture = Gesture::Idle;
                }
            }
            InputEvent::TouchCancel { .. } => self.cancel(&mut out),
        }
        out
    }

    fn touch_start(
        &mut self,
        touches: &Touches,
        viewport: &Viewport,
        selection: Option<Selection>,
        time_ms: f64,
        out: &mut Vec<GestureOutcome>,
    ) {
        match touches.len() {
            1 => {
                let pos = touches[0].pos;
                if self.is_double_tap(pos, time_ms) {
                    self.last_tap = None;
                    self.cancel(out);
                    self.transform.reset();
                    debug!("Double tap: view reset");
                    out.push(GestureOutcome::ViewReset);
                    out.push(GestureOutcome::TransformChanged(self.transform));
                } else {
                    self.last_tap = Some(Tap { pos, time_ms });
                    self.press(pos, viewport, selection, time_ms, out);
                }
            }
            2 => {
                // A second finger turns any drag into a pinch.
                self.cancel(out);
                self.last_tap = None;
                let distance = touches[0].pos.distance(touches[1].pos);
                self.gesture = Gesture::Pinch {
                    last_distance: distance,
                    _lock: self.locks.acquire("pinch"),
                };
            }
            _ => {}
        }
    }

    fn is_double_tap(&self, pos: Vec2, time_ms: f64) -> bool {
        self.last_tap.is_some_and(|tap| {
            let elapsed = time_ms - tap.time_ms;
            (0.0..=self.settings.double_tap_ms).contains(&elapsed)
                && tap.pos.distance(pos) <= self.settings.double_tap_slop
        })
    }

    fn press(
        &mut self,
        pos: Vec2,
        viewport: &Viewport,
        selection: Option<Selection>,
        _time_ms: f64,
        out: &mut Vec<GestureOutcome>,
    ) {
        // A press without a matching release (lost pointer-up) finishes the old gesture first.
        self.release(out);

        let gesture = match selection {
            Some(selection) => {
                let logical = viewport.to_logical(pos, &self.transform);
                let ppu = viewport.pixels_per_unit(&self.transform);
                if selection.handle_rect(ppu).contains(logical) {
                    Gesture::Resize {
                        selection,
                        start: pos,
                        current: selection.size,
                        _lock: self.locks.acquire("element-resize"),
                    }
                } else if selection.rect().contains(logical) {
                    Gesture::Move {
                        selection,
                        start: pos,
                        current: selection.position,
                        _lock: self.locks.acquire("element-move"),
                    }
                } else {
                    out.push(GestureOutcome::SelectionCleared);
                    self.pan_from(pos)
                }
            }
            None => self.pan_from(pos),
        };
        debug!(gesture = gesture.name(), "Gesture started");
        self.gesture = gesture;
    }

    fn pan_from(&self, pos: Vec2) -> Gesture {
        Gesture::Pan {
            last: pos,
            _lock: self.locks.acquire("pan"),
        }
    }

    fn drag(
        &mut self,
        pos: Vec2,
        viewport: &Viewport,
        time_ms: f64,
        out: &mut Vec<GestureOutcome>,
    ) {
        match &mut self.gesture {
            Gesture::Pan { last, .. } => {
                let delta = pos - *last;
                *last = pos;
                if delta != Vec2::ZERO {
                    self.transform.pan_by(delta);
                    out.push(GestureOutcome::TransformChanged(self.transform));
                }
            }
            Gesture::Move {
                selection,
                start,
                current,
                ..
            } => {
                let delta = viewport.logical_delta(pos - *start, &self.transform);
                let target = selection.position + delta;
                let snapped = Vec2::new(
                    snap_to_grid(target.x, self.settings.grid_size, self.settings.grid_enabled),
                    snap_to_grid(target.y, self.settings.grid_size, self.settings.grid_enabled),
                );
                *current = snapped;
                let preview = GestureOutcome::PreviewMove {
                    id: selection.id,
                    position: snapped,
                };
                out.extend(self.throttle.offer(preview, time_ms));
            }
            Gesture::Resize {
                selection,
                start,
                current,
                ..
            } => {
                let delta = viewport.logical_delta(pos - *start, &self.transform);
                let min_width = self.settings.min_element_width;
                let size = locked_resize(selection.size, delta.x.max(delta.y), min_width);
                *current = size;
                let preview = GestureOutcome::PreviewResize {
                    id: selection.id,
                    size,
                };
                out.extend(self.throttle.offer(preview, time_ms));
            }
            Gesture::Pinch { .. } | Gesture::Idle => {}
        }
    }

    fn pinch_to(&mut self, touches: &Touches, out: &mut Vec<GestureOutcome>) {
        let Gesture::Pinch { last_distance, .. } = &mut self.gesture else {
            return;
        };
        let distance = touches[0].pos.distance(touches[1].pos);
        if distance <= 0.0 {
            return;
        }
        if *last_distance > 0.0 {
            let zoom = self.transform.zoom() * distance / *last_distance;
            let zoom = zoom.min(self.settings.max_zoom).max(self.settings.min_zoom);
            self.transform.set_zoom(zoom);
            out.push(GestureOutcome::TransformChanged(self.transform));
        }
        // Re-base every move so the scale never compounds.
        *last_distance = distance;
    }

    /// Finish the current gesture, committing element edits.
    fn release(&mut self, out: &mut Vec<GestureOutcome>) {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        self.throttle.cancel();
        match gesture {
            Gesture::Move {
                selection, current, ..
            } => out.push(GestureOutcome::CommitMove {
                id: selection.id,
                from: selection.position,
                to: current,
            }),
            Gesture::Resize {
                selection, current, ..
            } => out.push(GestureOutcome::CommitResize {
                id: selection.id,
                from: selection.size,
                to: current,
            }),
            Gesture::Pan { .. } | Gesture::Pinch { .. } | Gesture::Idle => {}
        }
    }

    /// Abort the current gesture, restoring element geometry.
    fn cancel(&mut self, out: &mut Vec<GestureOutcome>) {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        self.throttle.cancel();
        match gesture {
            Gesture::Move { selection, .. } | Gesture::Resize { selection, .. } => {
                debug!(id = %selection.id, "Element gesture cancelled");
                out.push(GestureOutcome::Cancelled {
                    id: selection.id,
                    position: selection.position,
                    size: selection.size,
                });
            }
            Gesture::Pan { .. } | Gesture::Pinch { .. } | Gesture::Idle => {}
        }
    }
}

/// Aspect-locked resize: `delta` is added to the width, height follows the
/// original proportions, and width never drops below `min_width`.
pub fn locked_resize(original: Size, delta: f32, min_width: f32) -> Size {
    let aspect = original.aspect().unwrap_or(1.0);
    let width = (original.width + delta).max(min_width);
    Size::new(width, width / aspect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::TouchPoint;
    use cineflow_core::{MAX_ZOOM, MIN_ZOOM};
    use smallvec::smallvec;

    fn controller(locks: &InputLockHost) -> GestureController {
        let settings = GestureSettings::default();
        let mut c = GestureController::new(settings, CanvasTransform::IDENTITY, locks.clone());
        c.attach();
        c
    }

    fn viewport() -> Viewport {
        Viewport::unscaled(Rect::new(0.0, 0.0, 1920.0, 1080.0))
    }

    fn down(x: f32, y: f32, t: f64) -> InputEvent {
        InputEvent::PointerDown {
            pos: Vec2::new(x, y),
            time_ms: t,
        }
    }

    fn mv(x: f32, y: f32, t: f64) -> InputEvent {
        InputEvent::PointerMove {
            pos: Vec2::new(x, y),
            time_ms: t,
        }
    }

    fn up(t: f64) -> InputEvent {
        InputEvent::PointerUp {
            pos: Vec2::ZERO,
            time_ms: t,
        }
    }

    fn two_fingers(distance: f32, t: f64, start: bool) -> InputEvent {
        let touches: Touches =
            smallvec![TouchPoint::new(1, 0.0, 0.0), TouchPoint::new(2, distance, 0.0)];
        if start {
            InputEvent::TouchStart { touches, time_ms: t }
        } else {
            InputEvent::TouchMove { touches, time_ms: t }
        }
    }

    fn tap(t: f64) -> InputEvent {
        InputEvent::TouchStart {
            touches: smallvec![TouchPoint::new(1, 500.0, 500.0)],
            time_ms: t,
        }
    }

    fn lift(t: f64) -> InputEvent {
        InputEvent::TouchEnd {
            touches: Touches::new(),
            time_ms: t,
        }
    }

    fn selection() -> Selection {
        Selection {
            id: Uuid::new_v4(),
            position: Vec2::new(100.0, 100.0),
            size: Size::new(400.0, 200.0),
        }
    }

    #[test]
    fn test_pan_accumulates_and_releases_lock() {
        let locks = InputLockHost::new();
        let mut c = controller(&locks);
        let vp = viewport();
        c.handle(&down(10.0, 10.0, 0.0), &vp, None);
        assert!(locks.is_locked());
        c.handle(&mv(20.0, 15.0, 1.0), &vp, None);
        c.handle(&mv(30.0, 20.0, 2.0), &vp, None);
        assert_eq!(c.transform().pan(), Vec2::new(20.0, 10.0));
        c.handle(&up(3.0), &vp, None);
        assert!(!locks.is_locked());
        assert!(!c.is_active());
    }

    #[test]
    fn test_pinch_rebases_each_move() {
        let locks = InputLockHost::new();
        let mut c = controller(&locks);
        let vp = viewport();
        c.handle(&two_fingers(100.0, 0.0, true), &vp, None);
        c.handle(&two_fingers(200.0, 1.0, false), &vp, None);
        assert!((c.transform().zoom() - 2.0).abs() < 1e-5);
        // Same distance again: no further change.
        c.handle(&two_fingers(200.0, 2.0, false), &vp, None);
        assert!((c.transform().zoom() - 2.0).abs() < 1e-5);
        c.handle(&two_fingers(100.0, 3.0, false), &vp, None);
        assert!((c.transform().zoom() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_pinch_zoom_clamped() {
        let locks = InputLockHost::new();
        let mut c = controller(&locks);
        let vp = viewport();
        c.handle(&two_fingers(10.0, 0.0, true), &vp, None);
        let mut d = 10.0;
        for i in 0..20 {
            d *= 2.0;
            c.handle(&two_fingers(d, i as f64, false), &vp, None);
            assert!(c.transform().zoom() <= MAX_ZOOM);
        }
        for i in 0..40 {
            d /= 2.0;
            c.handle(&two_fingers(d, 100.0 + i as f64, false), &vp, None);
            assert!(c.transform().zoom() >= MIN_ZOOM);
        }
        assert_eq!(c.transform().zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_pinch_respects_configured_zoom_range() {
        let locks = InputLockHost::new();
        let config = EditorConfig {
            min_zoom: 0.5,
            max_zoom: 2.0,
            ..EditorConfig::default()
        };
        let settings = GestureSettings::from(&config);
        let mut c = GestureController::new(settings, CanvasTransform::IDENTITY, locks.clone());
        c.attach();
        let vp = viewport();
        c.handle(&two_fingers(100.0, 0.0, true), &vp, None);
        c.handle(&two_fingers(400.0, 1.0, false), &vp, None);
        assert_eq!(c.transform().zoom(), 2.0);
        c.handle(&two_fingers(10.0, 2.0, false), &vp, None);
        assert_eq!(c.transform().zoom(), 0.5);
    }

    #[test]
    fn test_double_tap_resets_view() {
        let locks = InputLockHost::new();
        let mut c = controller(&locks);
        c.set_transform(CanvasTransform::new(50.0, 50.0, 3.0));
        let vp = viewport();

        c.handle(&tap(0.0), &vp, None);
        c.handle(&lift(50.0), &vp, None);
        let out = c.handle(&tap(200.0), &vp, None);
        assert!(out.contains(&GestureOutcome::ViewReset));
        assert_eq!(c.transform(), CanvasTransform::IDENTITY);
        assert!(!locks.is_locked());
    }

    #[test]
    fn test_slow_taps_do_not_reset() {
        let locks = InputLockHost::new();
        let mut c = controller(&locks);
        c.set_transform(CanvasTransform::new(0.0, 0.0, 2.0));
        let vp = viewport();
        c.handle(&tap(0.0), &vp, None);
        c.handle(&lift(10.0), &vp, None);
        let out = c.handle(&tap(400.0), &vp, None);
        assert!(!out.contains(&GestureOutcome::ViewReset));
        assert_eq!(c.transform().zoom(), 2.0);
    }

    #[test]
    fn test_element_move_commits_delta() {
        let locks = InputLockHost::new();
        let mut c = controller(&locks);
        let vp = viewport();
        let sel = selection();

        c.handle(&down(150.0, 150.0, 0.0), &vp, Some(sel));
        let out = c.handle(&mv(200.0, 170.0, 20.0), &vp, Some(sel));
        assert_eq!(
            out,
            vec![GestureOutcome::PreviewMove {
                id: sel.id,
                position: Vec2::new(150.0, 120.0)
            }]
        );
        let out = c.handle(&up(40.0), &vp, Some(sel));
        assert_eq!(
            out,
            vec![GestureOutcome::CommitMove {
                id: sel.id,
                from: Vec2::new(100.0, 100.0),
                to: Vec2::new(150.0, 120.0)
            }]
        );
        assert_eq!(c.transform(), CanvasTransform::IDENTITY);
    }

    #[test]
    fn test_element_move_respects_zoom_and_grid() {
        let locks = InputLockHost::new();
        let mut c = controller(&locks);
        c.set_transform(CanvasTransform::new(0.0, 0.0, 2.0));
        c.set_grid(true);
        let vp = viewport();
        let sel = selection();

        // Logical (150,150) is screen (300,300) at zoom 2.
        c.handle(&down(300.0, 300.0, 0.0), &vp, Some(sel));
        c.handle(&mv(362.0, 300.0, 20.0), &vp, Some(sel));
        let out = c.handle(&up(40.0), &vp, Some(sel));
        // 62px / zoom 2 = 31 logical → 131, snapped to the 20-unit grid → 140.
        assert_eq!(
            out,
            vec![GestureOutcome::CommitMove {
                id: sel.id,
                from: Vec2::new(100.0, 100.0),
                to: Vec2::new(140.0, 100.0)
            }]
        );
    }

    #[test]
    fn test_touch_move_matches_mouse() {
        let locks = InputLockHost::new();
        let mut c = controller(&locks);
        let vp = viewport();
        let sel = selection();
        c.handle(
            &InputEvent::TouchStart {
                touches: smallvec![TouchPoint::new(7, 150.0, 150.0)],
                time_ms: 0.0,
            },
            &vp,
            Some(sel),
        );
        c.handle(
            &InputEvent::TouchMove {
                touches: smallvec![TouchPoint::new(7, 200.0, 170.0)],
                time_ms: 20.0,
            },
            &vp,
            Some(sel),
        );
        let out = c.handle(&lift(40.0), &vp, Some(sel));
        assert_eq!(
            out,
            vec![GestureOutcome::CommitMove {
                id: sel.id,
                from: Vec2::new(100.0, 100.0),
                to: Vec2::new(150.0, 120.0)
            }]
        );
    }

    #[test]
    fn test_handle_resize_keeps_aspect_and_min_width() {
        let locks = InputLockHost::new();
        let mut c = controller(&locks);
        let vp = viewport();
        let sel = selection();

        // Bottom-right corner of the selection is (500, 300).
        c.handle(&down(500.0, 300.0, 0.0), &vp, Some(sel));
        let out = c.handle(&mv(600.0, 330.0, 20.0), &vp, Some(sel));
        assert_eq!(
            out,
            vec![GestureOutcome::PreviewResize {
                id: sel.id,
                size: Size::new(500.0, 250.0)
            }]
        );
        c.handle(&mv(-1000.0, -1000.0, 40.0), &vp, Some(sel));
        let out = c.handle(&up(60.0), &vp, Some(sel));
        assert_eq!(
            out,
            vec![GestureOutcome::CommitResize {
                id: sel.id,
                from: Size::new(400.0, 200.0),
                to: Size::new(200.0, 100.0)
            }]
        );
    }

    #[test]
    fn test_press_outside_selection_clears_and_pans() {
        let locks = InputLockHost::new();
        let mut c = controller(&locks);
        let vp = viewport();
        let out = c.handle(&down(1500.0, 900.0, 0.0), &vp, Some(selection()));
        assert_eq!(out, vec![GestureOutcome::SelectionCleared]);
        c.handle(&mv(1510.0, 900.0, 1.0), &vp, None);
        assert_eq!(c.transform().pan(), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_detach_mid_gesture_releases_lock_and_restores() {
        let locks = InputLockHost::new();
        let mut c = controller(&locks);
        let vp = viewport();
        let sel = selection();
        c.handle(&down(150.0, 150.0, 0.0), &vp, Some(sel));
        c.handle(&mv(300.0, 300.0, 20.0), &vp, Some(sel));
        assert!(locks.is_locked());

        let out = c.detach();
        assert_eq!(
            out,
            vec![GestureOutcome::Cancelled {
                id: sel.id,
                position: sel.position,
                size: sel.size
            }]
        );
        assert!(!locks.is_locked());
        assert!(c.handle(&down(0.0, 0.0, 50.0), &vp, None).is_empty());
        assert!(!locks.is_locked());
    }

    #[test]
    fn test_previews_are_throttled() {
        let locks = InputLockHost::new();
        let mut c = controller(&locks);
        let vp = viewport();
        let sel = selection();
        c.handle(&down(150.0, 150.0, 0.0), &vp, Some(sel));
        assert_eq!(c.handle(&mv(160.0, 150.0, 100.0), &vp, Some(sel)).len(), 1);
        assert!(c.handle(&mv(170.0, 150.0, 105.0), &vp, Some(sel)).is_empty());
        assert_eq!(c.handle(&mv(180.0, 150.0, 116.0), &vp, Some(sel)).len(), 1);
    }

    #[test]
    fn test_locked_resize() {
        assert_eq!(locked_resize(Size::new(400.0, 200.0), 100.0, 200.0), Size::new(500.0, 250.0));
        assert_eq!(locked_resize(Size::new(400.0, 200.0), -350.0, 200.0), Size::new(200.0, 100.0));
    }
}
