//! CineFlow Media - external collaborators of the editor
//!
//! This crate handles:
//! - The asset/template/workflow catalog, with fallback data when offline
//! - The AI edit service, with a synthetic fallback result
//! - Frame bundle export, integrity checks and ffmpeg muxing

pub mod ai_edit;
pub mod catalog;
pub mod error;
pub mod export;
pub mod fallback;

pub use ai_edit::{edit_or_fallback, AiEditRequest, AiEditResult, AiEditService, HttpAiEdit};
pub use catalog::{
    Catalog, CatalogBackend, HttpCatalog, NodeTemplate, RunStatus, Workflow, WorkflowRun,
};
pub use error::{MediaError, Result};
pub use export::{verify_bundle, BundleReport, ExportCancel, FrameExport, MuxJob};
