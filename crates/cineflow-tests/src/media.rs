//! Integration tests for the media collaborators.
//!
//! Exercises cineflow-media feeding the editing session, and the export
//! stages working on one bundle.

use cineflow_core::{EditorConfig, Rect, Vec2};
use cineflow_media::{verify_bundle, Catalog, ExportCancel, FrameExport, MediaError, MuxJob};
use cineflow_timeline::{AssetKind, Project};
use cineflow_ui::{ClockPlayback, EditorSession};

// ── Catalog → session ──────────────────────────────────────────

#[tokio::test]
async fn offline_catalog_assets_can_be_dropped() {
    let assets = Catalog::http("http://127.0.0.1:9").get_assets().await;
    let audio = assets.iter().find(|a| a.kind == AssetKind::Audio).unwrap();

    let mut s = EditorSession::new(Project::new("Offline"), EditorConfig::default());
    s.attach();
    s.on_container_resize(Rect::new(0.0, 0.0, 1920.0, 1080.0));
    let id = s
        .drop_asset(&serde_json::to_string(audio).unwrap(), Vec2::new(400.0, 400.0))
        .unwrap();

    let element = s.project().element(id).unwrap();
    assert_eq!(Some(element.duration()), audio.duration);
    assert!(s.register_player(id, Box::new(ClockPlayback::new())));
}

#[tokio::test]
async fn offline_templates_open_as_projects() {
    let templates = Catalog::http("http://127.0.0.1:9").get_templates().await;
    assert_eq!(templates.len(), 3);
    for template in &templates {
        let project = Project::from_template(template);
        assert_eq!(project.aspect_ratio, template.aspect_ratio);
        assert_eq!(project.element_count(), template.elements.len());
    }
}

// ── Export ─────────────────────────────────────────────────────

fn png(len: usize) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.resize(len, 7);
    bytes
}

#[test]
fn exported_bundle_feeds_mux_job() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = dir.path().join("frames");
    let frames: Vec<Vec<u8>> = (0..4).map(|_| png(512)).collect();

    let report = FrameExport::new(&bundle)
        .write_frames(&frames, &ExportCancel::new())
        .unwrap();
    assert_eq!(report.frames, 4);
    assert_eq!(verify_bundle(&bundle).unwrap(), report);

    let args = MuxJob::new(&bundle, dir.path().join("out.mp4")).ffmpeg_args();
    let input = bundle.join("frame_%05d.png");
    assert!(args.contains(&input.to_string_lossy().into_owned()));
}

#[test]
fn cancelled_export_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let cancel = ExportCancel::new();
    let handle = cancel.clone();
    handle.cancel();

    let err = FrameExport::new(dir.path())
        .write_frames([png(2048)], &cancel)
        .unwrap_err();
    assert!(matches!(err, MediaError::Cancelled));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
