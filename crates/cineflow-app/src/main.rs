//! CineFlow - canvas video editor
//!
//! Entry point and main application loop.

use std::path::PathBuf;

use anyhow::Result;
use cineflow_core::{AspectRatio, EditorConfig};
use cineflow_media::{fallback, Catalog};
use cineflow_timeline::{Asset, Project};
use cineflow_ui::theme::Theme;
use cineflow_ui::{CanvasView, ClockPlayback, EditorSession, TimelineBar};
use eframe::egui;
use tokio::sync::oneshot;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_PROJECT_FILE: &str = "untitled.cineflow.json";

const ASPECTS: [(&str, AspectRatio); 4] = [
    ("16:9", AspectRatio::WIDESCREEN),
    ("9:16", AspectRatio::VERTICAL),
    ("1:1", AspectRatio::SQUARE),
    ("4:3", AspectRatio::STANDARD),
];

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("CineFlow starting...");

    let config = EditorConfig::load_or_default();
    let project_path = std::env::args().nth(1).map(PathBuf::from);

    // Catalog fetches run here; the UI thread only polls for results.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("CineFlow"),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    eframe::run_native(
        "CineFlow",
        options,
        Box::new(move |cc| Ok(Box::new(CineFlowApp::new(cc, config, project_path, runtime)))),
    )?;

    Ok(())
}

struct CineFlowApp {
    session: EditorSession,
    canvas: CanvasView,
    timeline: TimelineBar,
    assets: Vec<Asset>,
    pending_assets: Option<oneshot::Receiver<Vec<Asset>>>,
    project_path: PathBuf,
    _runtime: tokio::runtime::Runtime,
}

impl CineFlowApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        config: EditorConfig,
        project_path: Option<PathBuf>,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        Theme::apply(&cc.egui_ctx);

        let mut session = open_session(project_path.as_ref(), config.clone());
        session.attach();

        let (tx, rx) = oneshot::channel();
        let catalog = Catalog::http(config.catalog_url.clone());
        runtime.spawn(async move {
            let _ = tx.send(catalog.get_assets().await);
        });

        Self {
            session,
            canvas: CanvasView::new(),
            timeline: TimelineBar::new(),
            assets: Vec::new(),
            pending_assets: Some(rx),
            project_path: project_path.unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT_FILE)),
            _runtime: runtime,
        }
    }

    fn poll_catalog(&mut self) {
        let Some(rx) = self.pending_assets.as_mut() else {
            return;
        };
        match rx.try_recv() {
            Ok(assets) => {
                info!(count = assets.len(), "Asset library loaded");
                self.assets = assets;
                self.pending_assets = None;
            }
            Err(oneshot::error::TryRecvError::Empty) => {}
            Err(oneshot::error::TryRecvError::Closed) => {
                warn!("Catalog task ended without a result");
                self.assets = fallback::assets();
                self.pending_assets = None;
            }
        }
    }

    /// Give every playable element a player.
    fn register_players(&mut self) {
        let missing: Vec<_> = self
            .session
            .project()
            .elements()
            .iter()
            .filter(|e| e.kind.is_playable() && self.session.presenter(e.id).is_none())
            .map(|e| e.id)
            .collect();
        for id in missing {
            self.session.register_player(id, Box::new(ClockPlayback::new()));
        }
    }

    fn save(&self) {
        let written = self
            .session
            .save()
            .map_err(anyhow::Error::from)
            .and_then(|bytes| {
                std::fs::write(&self.project_path, bytes).map_err(anyhow::Error::from)
            });
        match written {
            Ok(()) => info!(path = %self.project_path.display(), "Project saved"),
            Err(e) => warn!(path = %self.project_path.display(), error = %e, "Save failed"),
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (undo, redo, delete, play) = ctx.input(|i| {
            let cmd = i.modifiers.command;
            (
                cmd && !i.modifiers.shift && i.key_pressed(egui::Key::Z),
                cmd && i.modifiers.shift && i.key_pressed(egui::Key::Z),
                i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
                i.key_pressed(egui::Key::Space),
            )
        });
        if undo {
            self.undo();
        }
        if redo {
            self.redo();
        }
        if delete {
            if let Err(e) = self.session.delete_selected() {
                warn!(error = %e, "Delete failed");
            }
        }
        if play {
            self.session.toggle_play();
        }
    }

    fn undo(&mut self) {
        if let Err(e) = self.session.undo() {
            warn!(error = %e, "Undo failed");
        }
    }

    fn redo(&mut self) {
        if let Err(e) = self.session.redo() {
            warn!(error = %e, "Redo failed");
        }
    }

    fn top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(&self.session.project().name).strong());
            ui.separator();

            let current = self.session.project().aspect_ratio;
            egui::ComboBox::from_id_salt("aspect_ratio")
                .selected_text(current.to_string())
                .show_ui(ui, |ui| {
                    for (label, aspect) in ASPECTS {
                        if ui.selectable_label(current == aspect, label).clicked() {
                            self.session.set_aspect_ratio(aspect);
                        }
                    }
                });

            let mut grid = self.session.config().grid_enabled;
            if ui.checkbox(&mut grid, "Grid").changed() {
                self.session.set_grid_enabled(grid);
            }

            let manual = self.session.canvas().is_manual();
            if ui.add_enabled(manual, egui::Button::new("Fit")).clicked() {
                self.session.canvas_mut().reset_size();
            }

            ui.separator();
            if ui.add_enabled(self.session.can_undo(), egui::Button::new("Undo")).clicked() {
                self.undo();
            }
            if ui.add_enabled(self.session.can_redo(), egui::Button::new("Redo")).clicked() {
                self.redo();
            }
            if ui
                .add_enabled(self.session.selected_id().is_some(), egui::Button::new("Delete"))
                .clicked()
            {
                if let Err(e) = self.session.delete_selected() {
                    warn!(error = %e, "Delete failed");
                }
            }

            ui.separator();
            if ui.button("Save").clicked() {
                self.save();
            }
        });
    }

    fn library(&mut self, ui: &mut egui::Ui) {
        ui.heading("Library");
        ui.separator();
        if self.pending_assets.is_some() {
            ui.spinner();
            return;
        }
        let mut inserted = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for asset in &self.assets {
                let Ok(payload) = serde_json::to_string(asset) else {
                    continue;
                };
                let id = egui::Id::new(("asset", asset.id.as_str()));
                let item = ui.dnd_drag_source(id, payload, |ui| {
                    ui.add(
                        egui::Label::new(format!("{} · {}", asset.name, asset_kind_label(asset)))
                            .sense(egui::Sense::click()),
                    )
                });
                if item.inner.double_clicked() {
                    inserted = Some(asset.clone());
                }
            }
        });
        if let Some(asset) = inserted {
            self.session.insert_asset(&asset);
        }
    }
}

fn asset_kind_label(asset: &Asset) -> &'static str {
    match asset.kind {
        cineflow_timeline::AssetKind::Image => "image",
        cineflow_timeline::AssetKind::Video => "video",
        cineflow_timeline::AssetKind::Audio => "audio",
        cineflow_timeline::AssetKind::Text => "text",
    }
}

fn open_session(path: Option<&PathBuf>, config: EditorConfig) -> EditorSession {
    if let Some(path) = path.filter(|p| p.exists()) {
        match std::fs::read(path)
            .map_err(anyhow::Error::from)
            .and_then(|bytes| {
                EditorSession::from_file_bytes(&bytes, config.clone()).map_err(anyhow::Error::from)
            })
        {
            Ok(session) => {
                info!(path = %path.display(), "Opened project");
                return session;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to open project, starting fresh")
            }
        }
    }
    let project = fallback::templates()
        .first()
        .map(Project::from_template)
        .unwrap_or_else(|| Project::new("Untitled"));
    EditorSession::new(project, config)
}

impl eframe::App for CineFlowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_catalog();
        self.handle_shortcuts(ctx);

        if self.session.is_playing() {
            let dt = ctx.input(|i| i.stable_dt) as f64;
            self.session.tick(dt);
            ctx.request_repaint();
        }
        if self.pending_assets.is_some() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| self.top_bar(ui));

        egui::TopBottomPanel::bottom("timeline_bar")
            .frame(Theme::timeline_frame())
            .exact_height(Theme::TIMELINE_HEIGHT)
            .show(ctx, |ui| self.timeline.show(ui, &mut self.session));

        egui::SidePanel::left("library_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| self.library(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Theme::bg()))
            .show(ctx, |ui| {
                self.canvas.show(ui, &mut self.session);
            });

        self.register_players();
    }
}
