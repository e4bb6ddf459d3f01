//! CineFlow Timeline - Scene/document model
//!
//! Implements the document edited by the canvas editor:
//! - Library assets and their element form
//! - Positioned, time-bounded canvas elements
//! - Projects holding elements, aspect ratio, viewport and playhead
//! - Edit operations with undo/redo
//! - Versioned project files

pub mod asset;
pub mod edit;
pub mod element;
pub mod project;
pub mod serialization;

pub use asset::{Asset, AssetKind};
pub use edit::{EditCommand, UndoStack};
pub use element::{CanvasElement, ElementKind, MIN_DURATION};
pub use project::{Project, ProjectTemplate};
pub use serialization::ProjectFile;
