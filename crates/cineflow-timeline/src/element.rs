//! Canvas elements: positioned, time-bounded units of content.

use cineflow_core::{Rect, Size, Vec2};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Shortest duration an element may have, in seconds.
pub const MIN_DURATION: f64 = 0.01;

/// Type-specific payload of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Image {
        src: String,
    },
    Video {
        src: String,
        volume: f32,
    },
    Audio {
        src: String,
        volume: f32,
    },
    Text {
        text: String,
        font_size: f32,
        color: String,
        font_family: String,
    },
    /// Anything without media or text, e.g. a shape placeholder.
    Element {
        label: String,
    },
}

impl ElementKind {
    /// Text element with default styling.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            font_size: 48.0,
            color: "#ffffff".into(),
            font_family: "Inter".into(),
        }
    }

    /// Short lowercase name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Image { .. } => "image",
            Self::Video { .. } => "video",
            Self::Audio { .. } => "audio",
            Self::Text { .. } => "text",
            Self::Element { .. } => "element",
        }
    }

    /// Whether the element drives native media playback.
    pub fn is_playable(&self) -> bool {
        matches!(self, Self::Video { .. } | Self::Audio { .. })
    }
}

/// A positioned, time-bounded element on the canvas.
///
/// Invariant: `start_time ≥ 0` and `duration ≥ MIN_DURATION`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasElement {
    /// Unique element ID
    pub id: Uuid,
    /// Top-left corner in logical canvas units
    pub position: Vec2,
    /// Size in logical canvas units
    pub size: Size,
    #[serde(deserialize_with = "deserialize_start")]
    start_time: f64,
    #[serde(deserialize_with = "deserialize_duration")]
    duration: f64,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl CanvasElement {
    /// Create a new element with a fresh ID.
    pub fn new(
        kind: ElementKind,
        position: Vec2,
        size: Size,
        start_time: f64,
        duration: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            size,
            start_time: clamp_start(start_time),
            duration: clamp_duration(duration),
            kind,
        }
    }

    /// Start time in seconds.
    #[inline]
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Duration in seconds.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// End time (exclusive).
    #[inline]
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Change the time window, clamping to the element invariants.
    pub fn set_timing(&mut self, start_time: f64, duration: f64) {
        self.start_time = clamp_start(start_time);
        self.duration = clamp_duration(duration);
    }

    /// Visible at `time` iff `start_time ≤ time < start_time + duration`.
    #[inline]
    pub fn is_visible_at(&self, time: f64) -> bool {
        time >= self.start_time && time < self.end_time()
    }

    /// Offset into the element's own media for a global time.
    pub fn media_offset(&self, time: f64) -> f64 {
        (time - self.start_time).clamp(0.0, self.duration)
    }

    /// Bounding rectangle in logical units.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Media source, if the element has one.
    pub fn src(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Image { src }
            | ElementKind::Video { src, .. }
            | ElementKind::Audio { src, .. } => Some(src),
            _ => None,
        }
    }

    /// Stored volume for audio/video elements.
    pub fn volume(&self) -> Option<f32> {
        match &self.kind {
            ElementKind::Video { volume, .. } | ElementKind::Audio { volume, .. } => Some(*volume),
            _ => None,
        }
    }

    /// Store a volume in `[0, 1]`. Returns false for elements without audio.
    pub fn set_volume(&mut self, new_volume: f32) -> bool {
        match &mut self.kind {
            ElementKind::Video { volume, .. } | ElementKind::Audio { volume, .. } => {
                *volume = new_volume.clamp(0.0, 1.0);
                true
            }
            _ => false,
        }
    }
}

fn clamp_start(start_time: f64) -> f64 {
    if start_time.is_finite() {
        start_time.max(0.0)
    } else {
        0.0
    }
}

fn clamp_duration(duration: f64) -> f64 {
    if duration.is_finite() {
        duration.max(MIN_DURATION)
    } else {
        MIN_DURATION
    }
}

fn deserialize_start<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    f64::deserialize(d).map(clamp_start)
}

fn deserialize_duration<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    f64::deserialize(d).map(clamp_duration)
}
