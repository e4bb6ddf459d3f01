//! Dark editor theme: palette, element colors and style application.

use cineflow_timeline::ElementKind;
use egui::{Color32, Rounding, Stroke};

/// Editor palette and sizing.
pub struct Theme;

impl Theme {
    // ── Typography ─────────────────────────────────────────────
    pub const FONT_XS: f32 = 11.0; // ruler ticks
    pub const FONT_SM: f32 = 13.0; // labels, time readout

    // ── Spacing ────────────────────────────────────────────────
    pub const SPACE_SM: f32 = 8.0;
    pub const SPACE_MD: f32 = 16.0;

    pub const RADIUS: f32 = 6.0;

    // ── Timeline bar ───────────────────────────────────────────
    pub const TIMELINE_HEIGHT: f32 = 56.0;
    pub const RULER_HEIGHT: f32 = 20.0;
    pub const PLAYHEAD_HANDLE: f32 = 10.0;
    pub const TIME_LABEL_WIDTH: f32 = 84.0;

    // ── Backgrounds ────────────────────────────────────────────
    pub const fn bg() -> Color32 {
        Color32::from_rgb(18, 18, 22)
    }
    pub const fn bg1() -> Color32 {
        Color32::from_rgb(28, 28, 34)
    }
    pub const fn bg2() -> Color32 {
        Color32::from_rgb(35, 35, 42)
    }
    /// The letterboxed canvas itself.
    pub const fn canvas_bg() -> Color32 {
        Color32::from_rgb(8, 8, 10)
    }

    // ── Text ───────────────────────────────────────────────────
    pub const fn t1() -> Color32 {
        Color32::from_rgba_premultiplied(235, 235, 235, 235)
    }
    pub const fn t2() -> Color32 {
        Color32::from_rgba_premultiplied(153, 153, 153, 153)
    }
    pub const fn t3() -> Color32 {
        Color32::from_rgba_premultiplied(89, 89, 89, 89)
    }

    // ── Accent ─────────────────────────────────────────────────
    pub const fn accent() -> Color32 {
        Color32::from_rgb(86, 130, 255)
    }
    pub const fn playhead() -> Color32 {
        Color32::from_rgb(255, 88, 85)
    }
    pub const fn grid() -> Color32 {
        Color32::from_rgba_premultiplied(10, 10, 10, 10)
    }
    pub const fn divider() -> Color32 {
        Color32::from_rgba_premultiplied(15, 15, 15, 15)
    }

    /// Fill for an element placeholder, by kind.
    pub fn element_color(kind: &ElementKind) -> Color32 {
        match kind {
            ElementKind::Image { .. } => Color32::from_rgb(48, 213, 160),
            ElementKind::Video { .. } => Color32::from_rgb(86, 130, 255),
            ElementKind::Audio { .. } => Color32::from_rgb(255, 184, 48),
            ElementKind::Text { .. } => Color32::from_rgb(167, 139, 250),
            ElementKind::Element { .. } => Color32::from_rgb(34, 211, 238),
        }
    }

    /// Return a color with replaced alpha.
    pub const fn with_alpha(c: Color32, a: u8) -> Color32 {
        Color32::from_rgba_premultiplied(
            (c.r() as u16 * a as u16 / 255) as u8,
            (c.g() as u16 * a as u16 / 255) as u8,
            (c.b() as u16 * a as u16 / 255) as u8,
            a,
        )
    }

    /// Frame for the timeline bar.
    pub fn timeline_frame() -> egui::Frame {
        egui::Frame::none()
            .fill(Self::bg1())
            .stroke(Stroke::new(0.5, Self::divider()))
            .inner_margin(egui::Margin::symmetric(Self::SPACE_SM, 4.0))
    }

    /// Apply the editor theme to an egui context.
    pub fn apply(ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();
        let visuals = &mut style.visuals;
        *visuals = egui::Visuals::dark();

        visuals.panel_fill = Self::bg1();
        visuals.window_fill = Self::bg2();
        visuals.extreme_bg_color = Self::bg();

        visuals.widgets.inactive.rounding = Rounding::same(Self::RADIUS);
        visuals.widgets.hovered.rounding = Rounding::same(Self::RADIUS);
        visuals.widgets.active.rounding = Rounding::same(Self::RADIUS);
        visuals.widgets.active.bg_stroke = Stroke::new(1.0, Self::accent());
        visuals.selection.stroke = Stroke::new(1.0, Self::accent());

        ctx.set_style(style);
    }
}
