//! Aspect ratio parsing and fitting the logical canvas into a container.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::geometry::Size;

/// An aspect ratio such as 16:9, kept as its two terms for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AspectRatio {
    pub width: f32,
    pub height: f32,
}

impl AspectRatio {
    /// 16:9, also the fallback for malformed input.
    pub const WIDESCREEN: Self = Self::new(16.0, 9.0);
    /// 9:16 vertical video.
    pub const VERTICAL: Self = Self::new(9.0, 16.0);
    /// 1:1.
    pub const SQUARE: Self = Self::new(1.0, 1.0);
    /// 4:3.
    pub const STANDARD: Self = Self::new(4.0, 3.0);

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Parse `"W:H"`, returning `None` when malformed or non-positive.
    pub fn try_parse(s: &str) -> Option<Self> {
        let (w, h) = s.trim().split_once(':')?;
        let w: f32 = w.trim().parse().ok()?;
        let h: f32 = h.trim().parse().ok()?;
        if w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0 {
            Some(Self::new(w, h))
        } else {
            None
        }
    }

    /// Parse `"W:H"`, falling back to 16:9.
    pub fn parse(s: &str) -> Self {
        Self::try_parse(s).unwrap_or_else(|| {
            warn!(input = s, "Malformed aspect ratio, using 16:9");
            Self::WIDESCREEN
        })
    }

    /// Width divided by height.
    #[inline]
    pub fn ratio(self) -> f32 {
        self.width / self.height
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::WIDESCREEN
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl From<String> for AspectRatio {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<AspectRatio> for String {
    fn from(r: AspectRatio) -> Self {
        r.to_string()
    }
}

/// Parse a ratio string such as `"16:9"` into `16/9`, falling back to 16:9.
pub fn parse_aspect_ratio(s: &str) -> f32 {
    AspectRatio::parse(s).ratio()
}

/// Largest size with the given width/height `ratio` that fits inside the container.
///
/// Empty containers give `Size::ZERO`; an unusable ratio is treated as 16:9.
pub fn calculate_canvas_size(container_width: f32, container_height: f32, ratio: f32) -> Size {
    if !(container_width > 0.0 && container_height > 0.0) {
        return Size::ZERO;
    }
    let ratio = if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        AspectRatio::WIDESCREEN.ratio()
    };

    if container_width / container_height > ratio {
        // Pillarbox: height-bound
        Size::new(container_height * ratio, container_height)
    } else {
        // Letterbox: width-bound
        Size::new(container_width, container_width / ratio)
    }
}
