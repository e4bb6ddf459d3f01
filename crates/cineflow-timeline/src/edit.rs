//! Edit operations with undo/redo support.
//!
//! Uses the Command pattern: every mutation is an `EditCommand` that knows
//! how to apply itself and produce its inverse for undo.

use cineflow_core::{CineFlowError, Result, Size, Vec2};
use uuid::Uuid;

use crate::element::CanvasElement;
use crate::project::Project;

// ── Edit commands ───────────────────────────────────────────────

/// A reversible edit operation on the document.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Insert an element at `index` in paint order.
    InsertElement { index: usize, element: CanvasElement },
    /// Remove an element.
    RemoveElement {
        id: Uuid,
        /// Stored for undo — populated when the command is executed.
        removed: Option<(usize, CanvasElement)>,
    },
    /// Move an element's top-left corner.
    MoveElement { id: Uuid, from: Vec2, to: Vec2 },
    /// Resize an element.
    ResizeElement { id: Uuid, from: Size, to: Size },
    /// Change an element's time window, as `(start_time, duration)`.
    SetTiming {
        id: Uuid,
        from: (f64, f64),
        to: (f64, f64),
    },
    /// Persist an element's volume.
    SetVolume { id: Uuid, from: f32, to: f32 },
    /// A batch of commands applied in order.
    Batch(Vec<EditCommand>),
}

impl EditCommand {
    /// Apply this command to a project, mutating it in place.
    ///
    /// Mutable `&mut self` because `RemoveElement` records what it removed.
    pub fn apply(&mut self, project: &mut Project) -> Result<()> {
        match self {
            Self::InsertElement { index, element } => {
                *index = project.insert(*index, element.clone());
            }
            Self::RemoveElement { id, removed } => {
                let entry = project
                    .remove(*id)
                    .ok_or_else(|| CineFlowError::NotFound(id.to_string()))?;
                *removed = Some(entry);
            }
            Self::MoveElement { id, to, .. } => {
                element_mut(project, *id)?.position = *to;
            }
            Self::ResizeElement { id, to, .. } => {
                element_mut(project, *id)?.size = *to;
            }
            Self::SetTiming { id, to, .. } => {
                element_mut(project, *id)?.set_timing(to.0, to.1);
            }
            Self::SetVolume { id, to, .. } => {
                let element = element_mut(project, *id)?;
                if !element.set_volume(*to) {
                    return Err(CineFlowError::InvalidParameter(format!(
                        "element {} has no volume",
                        id
                    )));
                }
            }
            Self::Batch(commands) => {
                for cmd in commands.iter_mut() {
                    cmd.apply(project)?;
                }
            }
        }
        Ok(())
    }

    /// Produce the command that undoes this one.
    pub fn inverse(&self) -> Self {
        match self {
            Self::InsertElement { element, .. } => Self::RemoveElement {
                id: element.id,
                removed: None,
            },
            Self::RemoveElement { removed, .. } => match removed {
                Some((index, element)) => Self::InsertElement {
                    index: *index,
                    element: element.clone(),
                },
                // Never executed, so nothing to restore.
                None => Self::Batch(Vec::new()),
            },
            Self::MoveElement { id, from, to } => Self::MoveElement {
                id: *id,
                from: *to,
                to: *from,
            },
            Self::ResizeElement { id, from, to } => Self::ResizeElement {
                id: *id,
                from: *to,
                to: *from,
            },
            Self::SetTiming { id, from, to } => Self::SetTiming {
                id: *id,
                from: *to,
                to: *from,
            },
            Self::SetVolume { id, from, to } => Self::SetVolume {
                id: *id,
                from: *to,
                to: *from,
            },
            Self::Batch(commands) => {
                Self::Batch(commands.iter().rev().map(Self::inverse).collect())
            }
        }
    }

    /// Human-readable label for history menus.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InsertElement { .. } => "Insert",
            Self::RemoveElement { .. } => "Delete",
            Self::MoveElement { .. } => "Move",
            Self::ResizeElement { .. } => "Resize",
            Self::SetTiming { .. } => "Change Timing",
            Self::SetVolume { .. } => "Change Volume",
            Self::Batch(_) => "Edit",
        }
    }
}

fn element_mut(project: &mut Project, id: Uuid) -> Result<&mut CanvasElement> {
    project
        .element_mut(id)
        .ok_or_else(|| CineFlowError::NotFound(id.to_string()))
}

// ── Undo stack ──────────────────────────────────────────────────

/// Undo/redo history of executed commands.
pub struct UndoStack {
    /// Commands that have been executed (most recent last).
    undo: Vec<EditCommand>,
    /// Commands that have been undone (most recent last).
    redo: Vec<EditCommand>,
    /// Maximum history depth.
    max_depth: usize,
}

impl UndoStack {
    /// Create a new undo stack with the given maximum depth.
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_depth,
        }
    }

    /// Apply a command and record it. Nothing is recorded if it fails.
    pub fn execute(&mut self, mut command: EditCommand, project: &mut Project) -> Result<()> {
        command.apply(project)?;
        self.push(command);
        Ok(())
    }

    /// Push a command onto the undo stack after it has been executed.
    /// Clears the redo stack (new action invalidates redo history).
    pub fn push(&mut self, command: EditCommand) {
        self.redo.clear();
        self.undo.push(command);
        if self.undo.len() > self.max_depth {
            self.undo.remove(0);
        }
    }

    /// Undo the most recent command against `project`.
    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self, project: &mut Project) -> Result<bool> {
        let Some(cmd) = self.undo.pop() else {
            return Ok(false);
        };
        let mut inverse = cmd.inverse();
        if let Err(e) = inverse.apply(project) {
            self.undo.push(cmd);
            return Err(e);
        }
        self.redo.push(cmd);
        Ok(true)
    }

    /// Redo the most recently undone command against `project`.
    pub fn redo(&mut self, project: &mut Project) -> Result<bool> {
        let Some(mut cmd) = self.redo.pop() else {
            return Ok(false);
        };
        if let Err(e) = cmd.apply(project) {
            self.redo.push(cmd);
            return Err(e);
        }
        self.undo.push(cmd);
        Ok(true)
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Label of the command the next undo would revert.
    pub fn undo_label(&self) -> Option<&'static str> {
        self.undo.last().map(EditCommand::label)
    }

    /// Clear all history.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// Number of undo steps available.
    pub fn undo_count(&self) -> usize {
        self.undo.len()
    }

    /// Number of redo steps available.
    pub fn redo_count(&self) -> usize {
        self.redo.len()
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(200)
    }
}

// ── Tests ───────────────────────────────────────────────────────
