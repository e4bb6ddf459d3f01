//! Library assets that can be placed on the canvas.

use cineflow_core::{Size, Vec2};
use serde::{Deserialize, Serialize};

use crate::element::{CanvasElement, ElementKind};

/// Media type of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Video,
    Audio,
    Text,
}

/// An asset descriptor, as listed by the catalog and carried by drag-and-drop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    #[serde(alias = "src")]
    pub url: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Media length in seconds, if known.
    #[serde(default)]
    pub duration: Option<f64>,
}

impl Asset {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: AssetKind,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            url: url.into(),
            thumbnail: None,
            duration: None,
        }
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Build a canvas element for this asset.
    ///
    /// Media with a known length keeps it; everything else uses `default_duration`.
    pub fn to_element(
        &self,
        position: Vec2,
        size: Size,
        start_time: f64,
        default_duration: f64,
    ) -> CanvasElement {
        let duration = match (self.kind, self.duration) {
            (AssetKind::Video | AssetKind::Audio, Some(d)) if d > 0.0 => d,
            _ => default_duration,
        };
        let kind = match self.kind {
            AssetKind::Image => ElementKind::Image {
                src: self.url.clone(),
            },
            AssetKind::Video => ElementKind::Video {
                src: self.url.clone(),
                volume: 1.0,
            },
            AssetKind::Audio => ElementKind::Audio {
                src: self.url.clone(),
                volume: 1.0,
            },
            AssetKind::Text => ElementKind::text(self.name.clone()),
        };
        CanvasElement::new(kind, position, size, start_time, duration)
    }
}
