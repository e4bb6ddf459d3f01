//! The editing session: one project plus every controller acting on it.

use std::collections::HashMap;

use cineflow_core::{AspectRatio, CanvasTransform, EditorConfig, Rect, Result, TimelineState, Vec2};
use cineflow_timeline::{Asset, CanvasElement, EditCommand, Project, ProjectFile, UndoStack};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::drop::{element_for_double_click, element_for_drop, parse_asset_payload};
use crate::gesture::{GestureController, GestureOutcome, GestureSettings, Selection};
use crate::input::{InputEvent, Viewport};
use crate::lock::InputLockHost;
use crate::playhead::PlayheadController;
use crate::presenter::{present, MediaPlayback, MediaPresenter, Presentation, RenderContext};
use crate::resize::CanvasSizeController;

/// Undo history depth.
const HISTORY_DEPTH: usize = 200;

type Presenter = MediaPresenter<Box<dyn MediaPlayback>>;

/// Owns the document for the lifetime of an editor view.
///
/// Controllers only see input between [`attach`](Self::attach) and
/// [`detach`](Self::detach). Dropping the session detaches it.
pub struct EditorSession {
    config: EditorConfig,
    project: Project,
    history: UndoStack,
    gestures: GestureController,
    canvas: CanvasSizeController,
    playhead: PlayheadController,
    presenters: HashMap<Uuid, Presenter>,
    selection: Option<Uuid>,
    locks: InputLockHost,
    container: Rect,
    /// Clock time media was last synced at.
    synced_time: f64,
    /// Element timing changed, so media offsets moved without the clock.
    resync_pending: bool,
    attached: bool,
}

impl EditorSession {
    pub fn new(project: Project, config: EditorConfig) -> Self {
        let locks = InputLockHost::new();
        let gestures =
            GestureController::new(GestureSettings::from(&config), project.viewport, locks.clone());
        let canvas = CanvasSizeController::new(
            project.aspect_ratio,
            config.logical_size(),
            config.throttle_ms,
            locks.clone(),
        );
        let playhead = PlayheadController::new(locks.clone());
        let project_time = project.timeline.current_time();
        info!(project = %project.name, elements = project.element_count(), "Editor session opened");
        Self {
            config,
            project,
            history: UndoStack::new(HISTORY_DEPTH),
            gestures,
            canvas,
            playhead,
            presenters: HashMap::new(),
            selection: None,
            locks,
            container: Rect::default(),
            synced_time: project_time,
            resync_pending: false,
            attached: false,
        }
    }

    /// Open a saved project file.
    pub fn from_file_bytes(data: &[u8], config: EditorConfig) -> Result<Self> {
        let file = ProjectFile::from_json(data)?;
        Ok(Self::new(file.project, config))
    }

    // ── Lifecycle ──────────────────────────────────────────────

    pub fn attach(&mut self) {
        if self.attached {
            return;
        }
        self.gestures.attach();
        self.canvas.attach();
        self.playhead.attach();
        self.attached = true;
        debug!("Editor session attached");
    }

    /// Detach every controller, aborting gestures and pausing media.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        for outcome in self.gestures.detach() {
            self.apply_outcome(outcome);
        }
        self.canvas.detach();
        self.playhead.detach();
        self.sync_media();
        self.attached = false;
        debug!("Editor session detached");
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn timeline(&self) -> &TimelineState {
        &self.project.timeline
    }

    pub fn transform(&self) -> CanvasTransform {
        self.gestures.transform()
    }

    pub fn canvas(&self) -> &CanvasSizeController {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut CanvasSizeController {
        &mut self.canvas
    }

    pub fn playhead(&self) -> &PlayheadController {
        &self.playhead
    }

    /// Playhead controller together with the timeline it drives.
    pub fn playhead_mut(&mut self) -> (&mut PlayheadController, &mut TimelineState) {
        (&mut self.playhead, &mut self.project.timeline)
    }

    pub fn locks(&self) -> &InputLockHost {
        &self.locks
    }

    /// Whether the surrounding container must stop scrolling.
    pub fn is_input_locked(&self) -> bool {
        self.locks.is_locked()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Screen rectangle the canvas is drawn in.
    pub fn canvas_rect(&self) -> Rect {
        self.canvas.canvas_rect(self.container)
    }

    /// Mapping between screen and logical coordinates for the current layout.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.canvas_rect(), self.canvas.display_scale())
    }

    /// The editor area moved or resized.
    pub fn on_container_resize(&mut self, container: Rect) {
        self.container = container;
        self.canvas.on_container_resize(container.size());
    }

    pub fn set_aspect_ratio(&mut self, aspect: AspectRatio) {
        self.project.aspect_ratio = aspect;
        self.canvas.set_aspect_ratio(aspect);
    }

    pub fn set_grid_enabled(&mut self, enabled: bool) {
        self.config.grid_enabled = enabled;
        self.gestures.set_grid(enabled);
    }

    // ── Selection ──────────────────────────────────────────────

    pub fn selected_id(&self) -> Option<Uuid> {
        self.selection
    }

    pub fn selected(&self) -> Option<&CanvasElement> {
        self.selection.and_then(|id| self.project.element(id))
    }

    /// Select an element. Unknown IDs clear the selection.
    pub fn select(&mut self, id: Option<Uuid>) {
        self.selection = id.filter(|id| self.project.element(*id).is_some());
    }

    fn selection_geometry(&self) -> Option<Selection> {
        let element = self.selected()?;
        Some(Selection {
            id: element.id,
            position: element.position,
            size: element.size,
        })
    }

    /// A press picks the element under it, unless it lands on the current
    /// selection or its handle.
    fn pick_on_press(&mut self, screen: Vec2) {
        let viewport = self.viewport();
        let transform = self.gestures.transform();
        let logical = viewport.to_logical(screen, &transform);
        if let Some(current) = self.selection_geometry() {
            let on_handle = current
                .handle_rect(viewport.pixels_per_unit(&transform))
                .contains(logical);
            if on_handle || current.rect().contains(logical) {
                return;
            }
        }
        if let Some(hit) = self.project.hit_test(logical, self.project.timeline.current_time()) {
            self.selection = Some(hit.id);
        }
    }

    // ── Input ──────────────────────────────────────────────────

    /// Route one input event through the gesture controller.
    /// Returns whether anything changed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if !self.attached {
            return false;
        }
        if event.is_single_press() {
            if let Some(pos) = event.primary_pos() {
                self.pick_on_press(pos);
            }
        }
        let viewport = self.viewport();
        let selection = self.selection_geometry();
        let outcomes = self.gestures.handle(event, &viewport, selection);
        let changed = !outcomes.is_empty();
        for outcome in outcomes {
            self.apply_outcome(outcome);
        }
        changed
    }

    fn apply_outcome(&mut self, outcome: GestureOutcome) {
        match outcome {
            GestureOutcome::TransformChanged(transform) => self.project.viewport = transform,
            GestureOutcome::ViewReset => debug!("View reset"),
            GestureOutcome::SelectionCleared => self.selection = None,
            GestureOutcome::PreviewMove { id, position } => {
                if let Some(element) = self.project.element_mut(id) {
                    element.position = position;
                }
            }
            GestureOutcome::PreviewResize { id, size } => {
                if let Some(element) = self.project.element_mut(id) {
                    element.size = size;
                }
            }
            GestureOutcome::CommitMove { id, from, to } => {
                let Some(element) = self.project.element_mut(id) else {
                    return;
                };
                element.position = to;
                if from != to {
                    self.history.push(EditCommand::MoveElement { id, from, to });
                }
            }
            GestureOutcome::CommitResize { id, from, to } => {
                let Some(element) = self.project.element_mut(id) else {
                    return;
                };
                element.size = to;
                if from != to {
                    self.history.push(EditCommand::ResizeElement { id, from, to });
                }
            }
            GestureOutcome::Cancelled { id, position, size } => {
                if let Some(element) = self.project.element_mut(id) {
                    element.position = position;
                    element.size = size;
                }
            }
        }
    }

    // ── Editing ────────────────────────────────────────────────

    /// Append an element on top and select it.
    pub fn insert_element(&mut self, element: CanvasElement) -> Result<Uuid> {
        let id = element.id;
        let index = self.project.element_count();
        self.history
            .execute(EditCommand::InsertElement { index, element }, &mut self.project)?;
        self.selection = Some(id);
        debug!(%id, "Element inserted");
        Ok(id)
    }

    /// Insert an asset dropped at a screen position.
    pub fn drop_asset(&mut self, payload: &str, screen: Vec2) -> Option<Uuid> {
        let asset = parse_asset_payload(payload)?;
        let element = element_for_drop(
            &asset,
            screen,
            &self.viewport(),
            &self.gestures.transform(),
            &self.config,
            self.project.timeline.current_time(),
        );
        self.insert_or_warn(element)
    }

    /// Insert a double-clicked asset at the default position.
    pub fn insert_asset(&mut self, asset: &Asset) -> Option<Uuid> {
        let now = self.project.timeline.current_time();
        let element = element_for_double_click(asset, &self.config, now);
        self.insert_or_warn(element)
    }

    /// Double-click path carrying a JSON payload.
    pub fn double_click_asset(&mut self, payload: &str) -> Option<Uuid> {
        let asset = parse_asset_payload(payload)?;
        self.insert_asset(&asset)
    }

    fn insert_or_warn(&mut self, element: CanvasElement) -> Option<Uuid> {
        match self.insert_element(element) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, "Insert failed");
                None
            }
        }
    }

    /// Delete the selected element. Returns false with nothing selected.
    pub fn delete_selected(&mut self) -> Result<bool> {
        let Some(id) = self.selection else {
            return Ok(false);
        };
        self.history
            .execute(EditCommand::RemoveElement { id, removed: None }, &mut self.project)?;
        self.selection = None;
        self.presenters.remove(&id);
        Ok(true)
    }

    /// Change an element's time window.
    pub fn set_timing(&mut self, id: Uuid, start_time: f64, duration: f64) -> Result<()> {
        let from = match self.project.element(id) {
            Some(e) => (e.start_time(), e.duration()),
            None => return Err(cineflow_core::CineFlowError::NotFound(id.to_string())),
        };
        self.history.execute(
            EditCommand::SetTiming {
                id,
                from,
                to: (start_time, duration),
            },
            &mut self.project,
        )?;
        self.resync_pending = true;
        Ok(())
    }

    pub fn undo(&mut self) -> Result<bool> {
        let undone = self.history.undo(&mut self.project)?;
        self.after_history_change();
        Ok(undone)
    }

    pub fn redo(&mut self) -> Result<bool> {
        let redone = self.history.redo(&mut self.project)?;
        self.after_history_change();
        Ok(redone)
    }

    fn after_history_change(&mut self) {
        if let Some(id) = self.selection {
            if self.project.element(id).is_none() {
                self.selection = None;
            }
        }
        let project = &self.project;
        self.presenters.retain(|id, _| project.element(*id).is_some());
        self.resync_pending = true;
    }

    // ── Playback ───────────────────────────────────────────────

    /// Attach a media player to a playable element.
    pub fn register_player(&mut self, id: Uuid, player: Box<dyn MediaPlayback>) -> bool {
        let Some(element) = self.project.element(id) else {
            return false;
        };
        if !element.kind.is_playable() {
            return false;
        }
        self.presenters.insert(id, MediaPresenter::new(element, player));
        true
    }

    pub fn presenter(&self, id: Uuid) -> Option<&Presenter> {
        self.presenters.get(&id)
    }

    pub fn presenter_mut(&mut self, id: Uuid) -> Option<&mut Presenter> {
        self.presenters.get_mut(&id)
    }

    /// Write a presenter's local volume into its element.
    pub fn persist_volume(&mut self, id: Uuid) -> Result<bool> {
        let command = match (self.presenters.get(&id), self.project.element(id)) {
            (Some(presenter), Some(element)) => presenter.persist_volume(element),
            _ => None,
        };
        match command {
            Some(command) => {
                self.history.execute(command, &mut self.project)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn toggle_play(&mut self) -> bool {
        let playing = self.playhead.toggle_play(&mut self.project.timeline);
        self.sync_media();
        playing
    }

    pub fn is_playing(&self) -> bool {
        self.playhead.is_playing()
    }

    /// Advance the clock by `dt` seconds and bring media in line.
    pub fn tick(&mut self, dt: f64) {
        let jumped = self.clock_jumped();
        self.playhead.tick(dt, &mut self.project.timeline);
        self.sync_presenters(jumped);
    }

    /// Push the current clock state to every media presenter.
    ///
    /// Any clock change since the last sync that did not come from
    /// [`tick`](Self::tick) counts as a jump and re-seeks running media.
    pub fn sync_media(&mut self) {
        let jumped = self.clock_jumped();
        self.sync_presenters(jumped);
    }

    fn clock_jumped(&self) -> bool {
        self.resync_pending || self.project.timeline.current_time() != self.synced_time
    }

    fn sync_presenters(&mut self, jumped: bool) {
        let project = &self.project;
        let selection = self.selection;
        let is_playing = self.playhead.is_playing();
        let current_time = project.timeline.current_time();
        for (id, presenter) in self.presenters.iter_mut() {
            let Some(element) = project.element(*id) else {
                continue;
            };
            let ctx = RenderContext {
                current_time,
                is_playing,
                is_selected: selection == Some(*id),
            };
            let presentation = present(element, &ctx);
            if jumped {
                presenter.sync_after_jump(&presentation);
            } else {
                presenter.sync(&presentation);
            }
        }
        self.synced_time = current_time;
        self.resync_pending = false;
    }

    /// Elements visible at the playhead, in paint order.
    pub fn visible_elements(&self) -> impl Iterator<Item = &CanvasElement> {
        self.project.visible_at(self.project.timeline.current_time())
    }

    /// Presentations of the visible elements, in paint order.
    pub fn presentations(&self) -> Vec<Presentation> {
        let ctx = RenderContext {
            current_time: self.project.timeline.current_time(),
            is_playing: self.playhead.is_playing(),
            is_selected: false,
        };
        self.visible_elements()
            .map(|e| {
                present(
                    e,
                    &RenderContext {
                        is_selected: self.selection == Some(e.id),
                        ..ctx
                    },
                )
            })
            .collect()
    }

    // ── Persistence ────────────────────────────────────────────

    /// Serialize the project as a versioned project file.
    pub fn save(&self) -> Result<Vec<u8>> {
        ProjectFile::new(self.project.clone()).to_json()
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        self.detach();
    }
}
