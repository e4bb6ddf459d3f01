//! Project serialization with versioning and migration.
//!
//! Uses JSON with a schema version field for forward-compatible persistence.

use cineflow_core::{CineFlowError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::project::Project;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Versioned project file wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Schema version for migration.
    pub version: u32,
    /// The project data.
    pub project: Project,
    /// Application version that wrote this file.
    pub app_version: String,
}

impl ProjectFile {
    /// Create a new project file from a project.
    pub fn new(project: Project) -> Self {
        Self {
            version: CURRENT_VERSION,
            project,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| {
            CineFlowError::Serialization(format!("Failed to serialize project: {}", e))
        })
    }

    /// Deserialize from JSON bytes, applying migrations if needed.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| CineFlowError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = raw.get("version").and_then(|v| v.as_u64()).unwrap_or(0) as u32;

        if version > CURRENT_VERSION {
            return Err(CineFlowError::Serialization(format!(
                "Project file version {} is newer than supported version {}",
                version, CURRENT_VERSION
            )));
        }

        let migrated = migrate(raw, version)?;

        serde_json::from_value(migrated)
            .map_err(|e| CineFlowError::Serialization(format!("Failed to parse project: {}", e)))
    }

    /// Save project to a file path.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        let data = self.to_json()?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Load project from a file path.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }
}

/// Apply sequential migrations from `from_version` to CURRENT_VERSION.
fn migrate(mut data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        debug!(from = version, "Migrating project file");
        match version {
            0 => {
                // v0 → v1: the entire value is the bare project
                if data.get("version").is_none() {
                    data = serde_json::json!({
                        "version": 1,
                        "project": data,
                        "app_version": "0.1.0",
                    });
                }
                version = 1;
            }
            _ => {
                return Err(CineFlowError::Serialization(format!(
                    "No migration path from version {}",
                    version
                )));
            }
        }
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{CanvasElement, ElementKind};
    use cineflow_core::{Size, Vec2};

    #[test]
    fn test_project_roundtrip() {
        let mut project = Project::new("Test Project");
        project.push(CanvasElement::new(
            ElementKind::text("Title"),
            Vec2::new(100.0, 100.0),
            Size::new(600.0, 120.0),
            1.0,
            4.0,
        ));
        let file = ProjectFile::new(project);

        let json = file.to_json().unwrap();
        let loaded = ProjectFile::from_json(&json).unwrap();

        assert_eq!(loaded.version, CURRENT_VERSION);
        assert_eq!(loaded.project.name, "Test Project");
        assert_eq!(loaded.project.elements(), file.project.elements());
    }

    #[test]
    fn test_migration_v0() {
        let project = Project::new("Old Project");
        let data = serde_json::to_vec(&project).unwrap();

        let loaded = ProjectFile::from_json(&data).unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.project.id, project.id);
        assert_eq!(loaded.project.name, "Old Project");
        assert_eq!(loaded.app_version, "0.1.0");
    }

    #[test]
    fn test_v1_file_loads_unchanged() {
        let mut file = ProjectFile::new(Project::new("Current"));
        file.app_version = "0.3.0".into();
        let loaded = ProjectFile::from_json(&file.to_json().unwrap()).unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.app_version, "0.3.0");
    }

    #[test]
    fn test_future_version_rejected() {
        let json = serde_json::json!({
            "version": 2,
            "project": {},
            "app_version": "99.0.0",
        });
        let data = serde_json::to_vec(&json).unwrap();
        let result = ProjectFile::from_json(&data);
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.cineflow.json");
        ProjectFile::new(Project::new("On Disk"))
            .save_to_file(&path)
            .unwrap();
        let loaded = ProjectFile::load_from_file(&path).unwrap();
        assert_eq!(loaded.project.name, "On Disk");
    }
}
