//! Integration tests for the editing session.
//!
//! Exercises cineflow-ui driving cineflow-timeline documents built from
//! cineflow-core geometry and config.

use cineflow_core::{format_time, EditorConfig, Rect, Vec2};
use cineflow_media::fallback;
use cineflow_timeline::{AssetKind, Project};
use cineflow_ui::{EditorSession, InputEvent, TrackGeometry};

// ── Helpers ────────────────────────────────────────────────────

fn session_for(project: Project) -> EditorSession {
    let mut s = EditorSession::new(project, EditorConfig::default());
    s.attach();
    s.on_container_resize(Rect::new(0.0, 0.0, 1920.0, 1080.0));
    s
}

fn drag(s: &mut EditorSession, from: Vec2, to: Vec2) {
    s.handle_input(&InputEvent::PointerDown { pos: from, time_ms: 0.0 });
    s.handle_input(&InputEvent::PointerMove { pos: to, time_ms: 40.0 });
    s.handle_input(&InputEvent::PointerUp { pos: to, time_ms: 80.0 });
}

fn payload(kind: AssetKind) -> String {
    let asset = fallback::assets()
        .into_iter()
        .find(|a| a.kind == kind)
        .expect("fallback library covers every media kind");
    serde_json::to_string(&asset).unwrap()
}

// ── Editing & persistence ──────────────────────────────────────

#[test]
fn edits_survive_save_and_reopen() {
    let mut s = session_for(Project::new("Round Trip"));
    let id = s.double_click_asset(&payload(AssetKind::Image)).unwrap();
    drag(&mut s, Vec2::new(150.0, 150.0), Vec2::new(250.0, 250.0));
    let moved = s.project().element(id).unwrap().position;
    assert_eq!(moved, Vec2::new(200.0, 200.0));

    let bytes = s.save().unwrap();
    let reopened = EditorSession::from_file_bytes(&bytes, EditorConfig::default()).unwrap();
    assert_eq!(reopened.project().name, "Round Trip");
    assert_eq!(reopened.project().element(id).unwrap().position, moved);
    assert!(!reopened.can_undo());
}

#[test]
fn undo_walks_back_through_mixed_edits() {
    let mut s = session_for(Project::new("History"));
    let image = s.double_click_asset(&payload(AssetKind::Image)).unwrap();
    drag(&mut s, Vec2::new(150.0, 150.0), Vec2::new(350.0, 150.0));
    let video = s.drop_asset(&payload(AssetKind::Video), Vec2::new(900.0, 500.0)).unwrap();
    assert_eq!(s.project().element_count(), 2);

    assert!(s.delete_selected().unwrap());
    assert!(s.project().element(video).is_none());

    s.undo().unwrap();
    assert!(s.project().element(video).is_some());
    s.undo().unwrap();
    assert!(s.project().element(video).is_none());
    s.undo().unwrap();
    assert_eq!(s.project().element(image).unwrap().position, Vec2::new(100.0, 100.0));
    s.undo().unwrap();
    assert_eq!(s.project().element_count(), 0);
    assert!(!s.can_undo());
}

#[test]
fn template_project_fits_vertical_canvas() {
    let template = fallback::templates()
        .into_iter()
        .find(|t| t.id == "tpl-story")
        .unwrap();
    let s = session_for(Project::from_template(&template));
    let size = s.canvas().canvas_size();
    assert!((size.width / size.height - 9.0 / 16.0).abs() < 1e-3);
    assert!(size.height <= 1080.0 + 1e-3);
    assert_eq!(s.timeline().total_duration(), 30.0);
    assert_eq!(s.visible_elements().count(), 1);
}

// ── Playhead ───────────────────────────────────────────────────

#[test]
fn ruler_scrub_changes_visible_elements() {
    let mut s = session_for(Project::new("Scrub"));
    s.double_click_asset(&payload(AssetKind::Image)).unwrap();
    assert_eq!(s.visible_elements().count(), 1);

    let (playhead, timeline) = s.playhead_mut();
    playhead.set_track(TrackGeometry::new(0.0, 600.0));
    assert_eq!(playhead.press_ruler(300.0, timeline), Some(15.0));
    assert!(s.is_input_locked());
    assert!(s.playhead_mut().0.release());
    assert!(!s.is_input_locked());

    assert_eq!(format_time(s.timeline().current_time()), "00:15.00");
    assert_eq!(s.visible_elements().count(), 0);
}

#[test]
fn playback_runs_to_end_and_stops() {
    let mut s = session_for(Project::new("Play"));
    assert!(s.toggle_play());
    for _ in 0..40 {
        s.tick(1.0);
    }
    assert!(!s.is_playing());
    assert_eq!(s.timeline().current_time(), s.timeline().total_duration());
}
