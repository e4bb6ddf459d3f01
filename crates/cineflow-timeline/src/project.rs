//! The edited document: elements plus global canvas and playhead state.

use cineflow_core::{AspectRatio, CanvasTransform, TimelineState};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::element::CanvasElement;

/// A starting point for new projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectTemplate {
    pub id: String,
    pub name: String,
    pub aspect_ratio: AspectRatio,
    /// Document duration in seconds.
    pub total_duration: f64,
    #[serde(default)]
    pub elements: Vec<CanvasElement>,
}

/// An ordered set of canvas elements with global canvas state.
///
/// Element order is paint order: later elements draw on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,
    /// Project name
    pub name: String,
    /// Output aspect ratio
    pub aspect_ratio: AspectRatio,
    /// Pan/zoom of the editing viewport
    pub viewport: CanvasTransform,
    /// Playhead and total duration
    pub timeline: TimelineState,
    elements: Vec<CanvasElement>,
}

impl Project {
    /// Create a new empty project.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            aspect_ratio: AspectRatio::WIDESCREEN,
            viewport: CanvasTransform::IDENTITY,
            timeline: TimelineState::default(),
            elements: Vec::new(),
        }
    }

    /// Create a project from a template. Template elements get fresh IDs.
    pub fn from_template(template: &ProjectTemplate) -> Self {
        let mut project = Self::new(template.name.clone());
        project.aspect_ratio = template.aspect_ratio;
        project.timeline = TimelineState::new(0.0, template.total_duration);
        project.elements = template
            .elements
            .iter()
            .cloned()
            .map(|mut e| {
                e.id = Uuid::new_v4();
                e
            })
            .collect();
        project
    }

    /// Elements in paint order.
    pub fn elements(&self) -> &[CanvasElement] {
        &self.elements
    }

    /// Number of elements.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Index of an element by ID.
    pub fn index_of(&self, id: Uuid) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    /// Look up an element by ID.
    pub fn element(&self, id: Uuid) -> Option<&CanvasElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Look up an element by ID mutably.
    pub fn element_mut(&mut self, id: Uuid) -> Option<&mut CanvasElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Append an element on top.
    pub fn push(&mut self, element: CanvasElement) {
        self.elements.push(element);
    }

    /// Insert an element at `index`, clamped to the end.
    pub fn insert(&mut self, index: usize, element: CanvasElement) -> usize {
        let index = index.min(self.elements.len());
        self.elements.insert(index, element);
        index
    }

    /// Remove an element by ID, returning its former index.
    pub fn remove(&mut self, id: Uuid) -> Option<(usize, CanvasElement)> {
        let index = self.index_of(id)?;
        Some((index, self.elements.remove(index)))
    }

    /// Elements visible at `time`, in paint order.
    pub fn visible_at(&self, time: f64) -> impl Iterator<Item = &CanvasElement> {
        self.elements.iter().filter(move |e| e.is_visible_at(time))
    }

    /// Topmost element whose rectangle contains a logical point.
    pub fn hit_test(&self, point: cineflow_core::Vec2, time: f64) -> Option<&CanvasElement> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.is_visible_at(time) && e.rect().contains(point))
    }

    /// Latest element end time.
    pub fn content_end(&self) -> f64 {
        self.elements
            .iter()
            .map(|e| e.end_time())
            .fold(0.0, f64::max)
    }

    /// Grow the total duration to cover every element.
    pub fn extend_duration_to_content(&mut self) {
        let end = self.content_end();
        if end > self.timeline.total_duration() {
            self.timeline.set_total_duration(end);
        }
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new("Untitled Project")
    }
}
