//! Pointer and touch input, and conversion from egui events.

use cineflow_core::{logical_to_screen, screen_to_logical, CanvasTransform, Rect, Vec2};
use egui::{PointerButton, TouchPhase};
use smallvec::SmallVec;

/// Active touches, in the order they went down.
pub type Touches = SmallVec<[TouchPoint; 2]>;

/// One finger on the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub pos: Vec2,
}

impl TouchPoint {
    pub fn new(id: u64, x: f32, y: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(x, y),
        }
    }
}

/// A unified mouse/touch event in screen coordinates.
///
/// Timestamps are milliseconds on any monotonic clock.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { pos: Vec2, time_ms: f64 },
    PointerMove { pos: Vec2, time_ms: f64 },
    PointerUp { pos: Vec2, time_ms: f64 },
    /// A finger went down; `touches` lists every active touch.
    TouchStart { touches: Touches, time_ms: f64 },
    TouchMove { touches: Touches, time_ms: f64 },
    /// A finger lifted; `touches` lists the ones still down.
    TouchEnd { touches: Touches, time_ms: f64 },
    TouchCancel { time_ms: f64 },
}

impl InputEvent {
    /// Event timestamp in milliseconds.
    pub fn time_ms(&self) -> f64 {
        match self {
            Self::PointerDown { time_ms, .. }
            | Self::PointerMove { time_ms, .. }
            | Self::PointerUp { time_ms, .. }
            | Self::TouchStart { time_ms, .. }
            | Self::TouchMove { time_ms, .. }
            | Self::TouchEnd { time_ms, .. }
            | Self::TouchCancel { time_ms } => *time_ms,
        }
    }

    /// Screen position of a pointer or the first touch.
    pub fn primary_pos(&self) -> Option<Vec2> {
        match self {
            Self::PointerDown { pos, .. }
            | Self::PointerMove { pos, .. }
            | Self::PointerUp { pos, .. } => Some(*pos),
            Self::TouchStart { touches, .. }
            | Self::TouchMove { touches, .. }
            | Self::TouchEnd { touches, .. } => touches.first().map(|t| t.pos),
            Self::TouchCancel { .. } => None,
        }
    }

    /// Whether this event begins an interaction with a single pointer.
    pub fn is_single_press(&self) -> bool {
        match self {
            Self::PointerDown { .. } => true,
            Self::TouchStart { touches, .. } => touches.len() == 1,
            _ => false,
        }
    }
}

/// Where the canvas sits on screen and how much it is scaled for display.
///
/// `display_scale` is the rendered canvas width over the logical width; it
/// composes with the user's pan/zoom transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub container: Rect,
    pub display_scale: f32,
}

impl Viewport {
    pub fn new(container: Rect, display_scale: f32) -> Self {
        Self {
            container,
            display_scale,
        }
    }

    /// A viewport showing the logical canvas at 1:1.
    pub fn unscaled(container: Rect) -> Self {
        Self::new(container, 1.0)
    }

    fn scale(&self) -> f32 {
        if self.display_scale.is_finite() && self.display_scale > 0.0 {
            self.display_scale
        } else {
            1.0
        }
    }

    /// Screen position to logical canvas coordinates.
    pub fn to_logical(&self, screen: Vec2, transform: &CanvasTransform) -> Vec2 {
        screen_to_logical(screen, self.container, transform) / self.scale()
    }

    /// Logical canvas coordinates to a screen position.
    pub fn to_screen(&self, logical: Vec2, transform: &CanvasTransform) -> Vec2 {
        logical_to_screen(logical * self.scale(), self.container, transform)
    }

    /// Screen-space movement expressed in logical units.
    pub fn logical_delta(&self, screen_delta: Vec2, transform: &CanvasTransform) -> Vec2 {
        screen_delta / (transform.zoom() * self.scale())
    }

    /// Screen pixels per logical unit.
    pub fn pixels_per_unit(&self, transform: &CanvasTransform) -> f32 {
        transform.zoom() * self.scale()
    }
}

// ── egui adapter ───────────────────────────────────────────────

/// Turns egui's per-finger touch events into [`InputEvent`]s carrying the
/// full set of active touches.
///
/// While any finger is down, egui's simulated mouse events are ignored so a
/// touch is never handled twice.
#[derive(Debug, Default)]
pub struct EguiInputAdapter {
    touches: Touches,
    pointer_down: bool,
    last_pointer: Option<Vec2>,
}

impl EguiInputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert one egui event. Returns `None` for events the editor ignores.
    pub fn convert(&mut self, event: &egui::Event, time_ms: f64) -> Option<InputEvent> {
        match event {
            egui::Event::Touch { id, phase, pos, .. } => {
                let point = TouchPoint {
                    id: id.0,
                    pos: to_vec2(*pos),
                };
                self.convert_touch(point, *phase, time_ms)
            }
            egui::Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed,
                ..
            } if self.touches.is_empty() => {
                let pos = to_vec2(*pos);
                self.last_pointer = Some(pos);
                if *pressed {
                    self.pointer_down = true;
                    Some(InputEvent::PointerDown { pos, time_ms })
                } else if self.pointer_down {
                    self.pointer_down = false;
                    Some(InputEvent::PointerUp { pos, time_ms })
                } else {
                    None
                }
            }
            egui::Event::PointerMoved(pos) if self.touches.is_empty() => {
                let pos = to_vec2(*pos);
                self.last_pointer = Some(pos);
                self.pointer_down
                    .then_some(InputEvent::PointerMove { pos, time_ms })
            }
            egui::Event::PointerGone if self.pointer_down => {
                self.pointer_down = false;
                let pos = self.last_pointer.unwrap_or(Vec2::ZERO);
                Some(InputEvent::PointerUp { pos, time_ms })
            }
            _ => None,
        }
    }

    fn convert_touch(
        &mut self,
        point: TouchPoint,
        phase: TouchPhase,
        time_ms: f64,
    ) -> Option<InputEvent> {
        match phase {
            TouchPhase::Start => {
                self.upsert(point);
                Some(InputEvent::TouchStart {
                    touches: self.touches.clone(),
                    time_ms,
                })
            }
            TouchPhase::Move => {
                if !self.touches.iter().any(|t| t.id == point.id) {
                    return None;
                }
                self.upsert(point);
                Some(InputEvent::TouchMove {
                    touches: self.touches.clone(),
                    time_ms,
                })
            }
            TouchPhase::End => {
                let before = self.touches.len();
                self.touches.retain(|t| t.id != point.id);
                (self.touches.len() != before).then(|| InputEvent::TouchEnd {
                    touches: self.touches.clone(),
                    time_ms,
                })
            }
            TouchPhase::Cancel => {
                self.touches.clear();
                Some(InputEvent::TouchCancel { time_ms })
            }
        }
    }

    fn upsert(&mut self, point: TouchPoint) {
        match self.touches.iter_mut().find(|t| t.id == point.id) {
            Some(existing) => existing.pos = point.pos,
            None => self.touches.push(point),
        }
    }

    /// Forget all pointer and touch state.
    pub fn reset(&mut self) {
        self.touches.clear();
        self.pointer_down = false;
        self.last_pointer = None;
    }
}

/// egui position to a core vector.
#[inline]
pub fn to_vec2(pos: egui::Pos2) -> Vec2 {
    Vec2::new(pos.x, pos.y)
}

/// Core vector to an egui position.
#[inline]
pub fn to_pos2(v: Vec2) -> egui::Pos2 {
    egui::pos2(v.x, v.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Modifiers, TouchDeviceId, TouchId};

    fn touch(id: u64, phase: TouchPhase, x: f32, y: f32) -> egui::Event {
        egui::Event::Touch {
            device_id: TouchDeviceId(0),
            id: TouchId(id),
            phase,
            pos: egui::pos2(x, y),
            force: None,
        }
    }

    #[test]
    fn test_viewport_composes_display_scale() {
        let viewport = Viewport::new(Rect::new(10.0, 20.0, 960.0, 540.0), 0.5);
        let transform = CanvasTransform::new(0.0, 0.0, 2.0);
        let logical = viewport.to_logical(Vec2::new(110.0, 120.0), &transform);
        assert_eq!(logical, Vec2::new(100.0, 100.0));
        assert_eq!(viewport.to_screen(logical, &transform), Vec2::new(110.0, 120.0));
        assert_eq!(viewport.logical_delta(Vec2::new(10.0, 0.0), &transform), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_touch_sequence_tracks_active_set() {
        let mut adapter = EguiInputAdapter::new();
        let e = adapter.convert(&touch(1, TouchPhase::Start, 0.0, 0.0), 0.0).unwrap();
        assert!(e.is_single_press());

        let e = adapter.convert(&touch(2, TouchPhase::Start, 100.0, 0.0), 1.0).unwrap();
        assert!(matches!(e, InputEvent::TouchStart { ref touches, .. } if touches.len() == 2));

        let e = adapter.convert(&touch(2, TouchPhase::Move, 120.0, 0.0), 2.0).unwrap();
        match e {
            InputEvent::TouchMove { touches, .. } => assert_eq!(touches[1].pos.x, 120.0),
            other => panic!("unexpected {other:?}"),
        }

        let e = adapter.convert(&touch(1, TouchPhase::End, 0.0, 0.0), 3.0).unwrap();
        assert!(matches!(e, InputEvent::TouchEnd { ref touches, .. } if touches.len() == 1));

        // Unknown finger moves are dropped.
        assert!(adapter.convert(&touch(9, TouchPhase::Move, 0.0, 0.0), 4.0).is_none());
    }

    #[test]
    fn test_pointer_ignored_during_touch() {
        let mut adapter = EguiInputAdapter::new();
        adapter.convert(&touch(1, TouchPhase::Start, 0.0, 0.0), 0.0);
        let simulated = egui::Event::PointerButton {
            pos: egui::pos2(0.0, 0.0),
            button: PointerButton::Primary,
            pressed: true,
            modifiers: Modifiers::NONE,
        };
        assert!(adapter.convert(&simulated, 0.0).is_none());
    }

    #[test]
    fn test_pointer_gone_releases() {
        let mut adapter = EguiInputAdapter::new();
        let down = egui::Event::PointerButton {
            pos: egui::pos2(5.0, 6.0),
            button: PointerButton::Primary,
            pressed: true,
            modifiers: Modifiers::NONE,
        };
        assert!(adapter.convert(&down, 0.0).is_some());
        assert!(adapter.convert(&egui::Event::PointerMoved(egui::pos2(7.0, 8.0)), 1.0).is_some());
        let up = adapter.convert(&egui::Event::PointerGone, 2.0).unwrap();
        assert_eq!(
            up,
            InputEvent::PointerUp {
                pos: Vec2::new(7.0, 8.0),
                time_ms: 2.0
            }
        );
        // Hover moves without a press are ignored.
        assert!(adapter.convert(&egui::Event::PointerMoved(egui::pos2(1.0, 1.0)), 3.0).is_none());
    }
}
