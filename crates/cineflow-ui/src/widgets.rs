//! egui widgets: the editing canvas and the timeline bar.

use cineflow_core::{format_time, Rect, Vec2};
use egui::{Align2, FontId, Key, Rounding, Sense, Stroke};

use crate::input::{to_pos2, to_vec2, EguiInputAdapter, InputEvent};
use crate::playhead::{EditKey, TrackGeometry};
use crate::resize::ResizeCorner;
use crate::session::EditorSession;
use crate::theme::Theme;

/// Side of the canvas corner handles, in screen pixels.
const CORNER_HANDLE_PX: f32 = 12.0;

fn to_rect(r: egui::Rect) -> Rect {
    Rect::new(r.min.x, r.min.y, r.width(), r.height())
}

fn to_egui_rect(r: Rect) -> egui::Rect {
    egui::Rect::from_min_max(to_pos2(r.min()), to_pos2(r.max()))
}

// ── Canvas ─────────────────────────────────────────────────────

/// Paints the letterboxed canvas with its elements and feeds pointer and
/// touch input to the session.
#[derive(Default)]
pub struct CanvasView {
    adapter: EguiInputAdapter,
    resizing_canvas: bool,
}

impl CanvasView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, session: &mut EditorSession) -> egui::Response {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        session.on_container_resize(to_rect(response.rect));

        self.route_input(ui, session);

        if let Some(payload) = response.dnd_release_payload::<String>() {
            if let Some(pos) = ui.input(|i| i.pointer.interact_pos()) {
                session.drop_asset(&payload, to_vec2(pos));
            }
        }
        if response.clicked() {
            self.click_to_play(ui, session);
        }

        paint_canvas(&painter, session);
        response
    }

    fn route_input(&mut self, ui: &egui::Ui, session: &mut EditorSession) {
        let (events, time_ms) = ui.input(|i| (i.events.clone(), i.time * 1000.0));
        let canvas_rect = session.canvas_rect();
        for event in &events {
            let Some(input) = self.adapter.convert(event, time_ms) else {
                continue;
            };
            if self.route_canvas_resize(&input, canvas_rect, session) {
                continue;
            }
            // Presses only count on the canvas; moves and releases always flow
            // so an in-flight gesture can finish.
            if input.is_single_press() {
                match input.primary_pos() {
                    Some(pos) if canvas_rect.contains(pos) => {}
                    _ => continue,
                }
            }
            session.handle_input(&input);
        }
    }

    /// Corner handles resize the canvas itself. Returns whether the event was consumed.
    fn route_canvas_resize(
        &mut self,
        input: &InputEvent,
        canvas_rect: Rect,
        session: &mut EditorSession,
    ) -> bool {
        match input {
            InputEvent::PointerDown { pos, .. } => {
                let corner = ResizeCorner::ALL
                    .into_iter()
                    .find(|c| corner_handle(*c, canvas_rect).contains(*pos));
                match corner {
                    Some(corner) => {
                        self.resizing_canvas = session.canvas_mut().begin_resize(*pos, corner);
                        self.resizing_canvas
                    }
                    None => false,
                }
            }
            InputEvent::PointerMove { pos, time_ms } if self.resizing_canvas => {
                session.canvas_mut().resize_to(*pos, *time_ms);
                true
            }
            InputEvent::PointerUp { .. } if self.resizing_canvas => {
                session.canvas_mut().end_resize();
                self.resizing_canvas = false;
                true
            }
            _ => false,
        }
    }

    fn click_to_play(&self, ui: &egui::Ui, session: &mut EditorSession) {
        let Some(pos) = ui.input(|i| i.pointer.interact_pos()) else {
            return;
        };
        let logical = session.viewport().to_logical(to_vec2(pos), &session.transform());
        let time = session.timeline().current_time();
        let Some(id) = session.project().hit_test(logical, time).map(|e| e.id) else {
            return;
        };
        if let Some(presenter) = session.presenter_mut(id) {
            if let Err(e) = presenter.click_to_play() {
                tracing::warn!(error = %e, "Click to play failed");
            }
        }
    }

    /// Forget pointer state, e.g. when the view is hidden.
    pub fn reset(&mut self) {
        self.adapter.reset();
        self.resizing_canvas = false;
    }
}

fn corner_handle(corner: ResizeCorner, canvas: Rect) -> Rect {
    let p = corner.point(canvas);
    let half = CORNER_HANDLE_PX * 0.5;
    Rect::new(p.x - half, p.y - half, CORNER_HANDLE_PX, CORNER_HANDLE_PX)
}

fn paint_canvas(painter: &egui::Painter, session: &EditorSession) {
    let canvas_rect = session.canvas_rect();
    if canvas_rect.size().is_empty() {
        return;
    }
    painter.rect_filled(to_egui_rect(canvas_rect), 0.0, Theme::canvas_bg());

    let clipped = painter.with_clip_rect(to_egui_rect(canvas_rect));
    let viewport = session.viewport();
    let transform = session.transform();
    let config = session.config();

    if config.grid_enabled && config.grid_size > 0.0 {
        let stroke = Stroke::new(1.0, Theme::grid());
        let mut x = 0.0;
        while x <= config.logical_width {
            let a = viewport.to_screen(Vec2::new(x, 0.0), &transform);
            let b = viewport.to_screen(Vec2::new(x, config.logical_height), &transform);
            clipped.line_segment([to_pos2(a), to_pos2(b)], stroke);
            x += config.grid_size;
        }
        let mut y = 0.0;
        while y <= config.logical_height {
            let a = viewport.to_screen(Vec2::new(0.0, y), &transform);
            let b = viewport.to_screen(Vec2::new(config.logical_width, y), &transform);
            clipped.line_segment([to_pos2(a), to_pos2(b)], stroke);
            y += config.grid_size;
        }
    }

    for presentation in session.presentations() {
        let Some(element) = session.project().element(presentation.id) else {
            continue;
        };
        let min = viewport.to_screen(presentation.rect.min(), &transform);
        let max = viewport.to_screen(presentation.rect.max(), &transform);
        let rect = egui::Rect::from_min_max(to_pos2(min), to_pos2(max));
        let color = Theme::element_color(&element.kind);

        clipped.rect_filled(rect, Rounding::same(2.0), Theme::with_alpha(color, 60));
        clipped.rect_stroke(rect, Rounding::same(2.0), Stroke::new(1.0, color));

        let label = match &element.kind {
            cineflow_timeline::ElementKind::Text { text, .. } => text.clone(),
            kind => element.src().unwrap_or(kind.name()).to_owned(),
        };
        clipped.text(
            rect.left_top() + egui::vec2(6.0, 4.0),
            Align2::LEFT_TOP,
            label,
            FontId::proportional(Theme::FONT_SM),
            Theme::t1(),
        );

        let needs_gesture = session
            .presenter(presentation.id)
            .is_some_and(|p| p.needs_user_gesture());
        if needs_gesture {
            clipped.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Click to play",
                FontId::proportional(Theme::FONT_SM),
                Theme::t1(),
            );
        }

        if presentation.selected {
            clipped.rect_stroke(rect, Rounding::same(2.0), Stroke::new(2.0, Theme::accent()));
            let handle = egui::Rect::from_center_size(
                rect.right_bottom(),
                egui::vec2(crate::gesture::HANDLE_SIZE_PX, crate::gesture::HANDLE_SIZE_PX),
            );
            clipped.rect_filled(handle, Rounding::same(2.0), Theme::accent());
        }
    }

    for corner in ResizeCorner::ALL {
        painter.rect_filled(
            to_egui_rect(corner_handle(corner, canvas_rect)),
            Rounding::same(2.0),
            Theme::with_alpha(Theme::t2(), 120),
        );
    }
}

// ── Timeline bar ───────────────────────────────────────────────

/// Play button, editable time readout and a ruler with the playhead.
#[derive(Default)]
pub struct TimelineBar;

impl TimelineBar {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&mut self, ui: &mut egui::Ui, session: &mut EditorSession) {
        ui.horizontal(|ui| {
            let icon = if session.is_playing() { "⏸" } else { "▶" };
            if ui.button(icon).clicked() {
                session.toggle_play();
            }

            Self::time_readout(ui, session);
            ui.label(
                egui::RichText::new(format!(
                    "/ {}",
                    format_time(session.timeline().total_duration())
                ))
                    .monospace()
                    .color(Theme::t3()),
            );

            Self::track(ui, session);
        });
        session.sync_media();
    }

    fn time_readout(ui: &mut egui::Ui, session: &mut EditorSession) {
        let (playhead, timeline) = session.playhead_mut();
        match playhead.edit_text().map(str::to_owned) {
            Some(mut text) => {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut text)
                        .desired_width(Theme::TIME_LABEL_WIDTH)
                        .font(egui::TextStyle::Monospace),
                );
                if response.changed() {
                    playhead.set_edit_text(text);
                }
                let (enter, escape) =
                    ui.input(|i| (i.key_pressed(Key::Enter), i.key_pressed(Key::Escape)));
                if enter {
                    playhead.key(EditKey::Enter, timeline);
                } else if escape {
                    playhead.key(EditKey::Escape, timeline);
                } else if response.lost_focus() {
                    playhead.blur(timeline);
                } else if !response.has_focus() {
                    response.request_focus();
                }
            }
            None => {
                let label = egui::Label::new(
                    egui::RichText::new(format_time(timeline.current_time()))
                        .monospace()
                        .color(Theme::t1()),
                )
                .sense(Sense::click());
                if ui.add_sized([Theme::TIME_LABEL_WIDTH, 20.0], label).clicked() {
                    playhead.click_label(timeline);
                }
            }
        }
    }

    fn track(ui: &mut egui::Ui, session: &mut EditorSession) {
        let size = egui::vec2(ui.available_width(), Theme::TIMELINE_HEIGHT - 8.0);
        let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
        let rect = response.rect;

        let (playhead, timeline) = session.playhead_mut();
        playhead.set_track(TrackGeometry::new(rect.left(), rect.width()));
        let duration = timeline.total_duration();

        let handle_rect = |x: f32| {
            egui::Rect::from_center_size(
                egui::pos2(x, rect.top() + Theme::PLAYHEAD_HANDLE * 0.5),
                egui::vec2(Theme::PLAYHEAD_HANDLE, Theme::PLAYHEAD_HANDLE),
            )
        };

        // Interaction
        let (pressed, press_origin) =
            ui.input(|i| (i.pointer.primary_pressed(), i.pointer.press_origin()));
        if pressed {
            if let Some(origin) = press_origin.filter(|p| rect.contains(*p)) {
                if handle_rect(playhead.x_for_time(timeline)).contains(origin) {
                    playhead.press_handle();
                } else {
                    playhead.press_ruler(origin.x, timeline);
                }
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                playhead.drag(pos.x, timeline);
            }
        }
        let released = !ui.input(|i| i.pointer.primary_down());
        if response.drag_stopped() || response.clicked() || released {
            playhead.release();
        }

        // Ruler
        painter.rect_filled(rect, Rounding::same(Theme::RADIUS), Theme::bg2());
        let ruler_bottom = rect.top() + Theme::RULER_HEIGHT;
        let step = tick_step(duration, rect.width());
        let mut t = 0.0;
        while t <= duration && step > 0.0 {
            let x = playhead.track().x_for(t, duration);
            painter.line_segment(
                [egui::pos2(x, rect.top()), egui::pos2(x, ruler_bottom)],
                Stroke::new(1.0, Theme::t3()),
            );
            painter.text(
                egui::pos2(x + 3.0, rect.top() + 2.0),
                Align2::LEFT_TOP,
                format!("{t:.0}s"),
                FontId::proportional(Theme::FONT_XS),
                Theme::t3(),
            );
            t += step;
        }

        // Playhead
        let x = playhead.x_for_time(timeline);
        painter.line_segment(
            [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
            Stroke::new(2.0, Theme::playhead()),
        );
        painter.rect_filled(handle_rect(x), Rounding::same(2.0), Theme::playhead());
    }
}

/// Seconds between ruler ticks so labels stay at least ~60px apart.
fn tick_step(duration: f64, width: f32) -> f64 {
    if !(duration > 0.0 && width > 0.0) {
        return 0.0;
    }
    let px_per_second = f64::from(width) / duration;
    [1.0, 2.0, 5.0, 10.0, 15.0, 30.0, 60.0, 120.0, 300.0]
        .into_iter()
        .find(|s| s * px_per_second >= 60.0)
        .unwrap_or(600.0)
}
