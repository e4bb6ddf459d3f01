//! Element presenters: project an element and the playhead clock onto
//! what should be drawn and whether its media should be playing.

use cineflow_core::Rect;
use cineflow_timeline::{CanvasElement, EditCommand};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Global state every presenter reads.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderContext {
    pub current_time: f64,
    pub is_playing: bool,
    pub is_selected: bool,
}

/// How one element should appear at the current time.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub id: Uuid,
    pub visible: bool,
    /// Media should be running: visible and the clock is playing.
    pub should_play: bool,
    /// Seconds into the element's own media.
    pub media_offset: f64,
    pub volume: Option<f32>,
    pub rect: Rect,
    pub selected: bool,
}

/// Compute the presentation of `element` under `ctx`.
pub fn present(element: &CanvasElement, ctx: &RenderContext) -> Presentation {
    let visible = element.is_visible_at(ctx.current_time);
    Presentation {
        id: element.id,
        visible,
        should_play: visible && ctx.is_playing && element.kind.is_playable(),
        media_offset: element.media_offset(ctx.current_time),
        volume: element.volume(),
        rect: element.rect(),
        selected: ctx.is_selected,
    }
}

// ── Media playback ─────────────────────────────────────────────

/// Errors from a media backend.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlaybackError {
    /// The platform refused to start playback without a user gesture.
    #[error("Autoplay blocked")]
    AutoplayBlocked,

    #[error("Media error: {0}")]
    Media(String),
}

/// A native media player the presenter drives.
pub trait MediaPlayback {
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    /// Jump to `seconds` into the media.
    fn seek(&mut self, seconds: f64);
    fn set_volume(&mut self, volume: f32);
    fn is_paused(&self) -> bool;
    /// A user gesture happened; backends that gate autoplay may now allow it.
    fn user_activation(&mut self) {}
}

impl<P: MediaPlayback + ?Sized> MediaPlayback for Box<P> {
    fn play(&mut self) -> Result<(), PlaybackError> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn seek(&mut self, seconds: f64) {
        (**self).seek(seconds)
    }

    fn set_volume(&mut self, volume: f32) {
        (**self).set_volume(volume)
    }

    fn is_paused(&self) -> bool {
        (**self).is_paused()
    }

    fn user_activation(&mut self) {
        (**self).user_activation()
    }
}

/// Keeps a [`MediaPlayback`] in step with the playhead.
pub struct MediaPresenter<P> {
    element_id: Uuid,
    player: P,
    active: bool,
    needs_user_gesture: bool,
    volume: f32,
}

impl<P: MediaPlayback> MediaPresenter<P> {
    pub fn new(element: &CanvasElement, mut player: P) -> Self {
        let volume = element.volume().unwrap_or(1.0);
        player.set_volume(volume);
        player.pause();
        Self {
            element_id: element.id,
            player,
            active: false,
            needs_user_gesture: false,
            volume,
        }
    }

    pub fn element_id(&self) -> Uuid {
        self.element_id
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    /// Playback was attempted and not since stopped.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Show a "click to play" affordance.
    pub fn needs_user_gesture(&self) -> bool {
        self.needs_user_gesture
    }

    /// Apply a presentation to the player.
    ///
    /// Starting playback always seeks to the media offset first. While
    /// paused, a visible element tracks the playhead so scrubbing shows the
    /// right frame.
    pub fn sync(&mut self, presentation: &Presentation) {
        if presentation.should_play {
            if !self.active {
                self.player.seek(presentation.media_offset);
                self.start();
            }
            return;
        }

        if self.active {
            self.player.pause();
            self.active = false;
        }
        self.needs_user_gesture = false;
        if presentation.visible {
            self.player.seek(presentation.media_offset);
        }
    }

    /// Like [`sync`](Self::sync), after the clock jumped (seek, scrub, undo).
    ///
    /// Media that is already running re-seeks to the new offset.
    pub fn sync_after_jump(&mut self, presentation: &Presentation) {
        if self.active && presentation.should_play {
            self.player.seek(presentation.media_offset);
        }
        self.sync(presentation);
    }

    fn start(&mut self) {
        // Only one attempt per activation; a blocked start waits for `click_to_play`.
        self.active = true;
        match self.player.play() {
            Ok(()) => self.needs_user_gesture = false,
            Err(PlaybackError::AutoplayBlocked) => {
                debug!(id = %self.element_id, "Autoplay blocked, waiting for user gesture");
                self.needs_user_gesture = true;
            }
            Err(e) => warn!(id = %self.element_id, error = %e, "Playback failed"),
        }
    }

    /// The user clicked the "click to play" affordance.
    pub fn click_to_play(&mut self) -> Result<(), PlaybackError> {
        if !self.needs_user_gesture {
            return Ok(());
        }
        self.player.user_activation();
        self.player.play()?;
        self.needs_user_gesture = false;
        Ok(())
    }

    /// Local volume, independent of the stored element volume.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.player.set_volume(self.volume);
    }

    /// Edit that writes the local volume back into the element, if it differs.
    pub fn persist_volume(&self, element: &CanvasElement) -> Option<EditCommand> {
        let stored = element.volume()?;
        if (stored - self.volume).abs() <= f32::EPSILON {
            return None;
        }
        Some(EditCommand::SetVolume {
            id: element.id,
            from: stored,
            to: self.volume,
        })
    }
}

// ── Clock-driven player ────────────────────────────────────────

/// A player with no decoder that only tracks position, for previews
/// without media and for tests.
#[derive(Debug, Clone)]
pub struct ClockPlayback {
    position: f64,
    paused: bool,
    volume: f32,
    autoplay_allowed: bool,
}

impl ClockPlayback {
    pub fn new() -> Self {
        Self {
            position: 0.0,
            paused: true,
            volume: 1.0,
            autoplay_allowed: true,
        }
    }

    /// A player that refuses to start until a user gesture.
    pub fn requiring_gesture() -> Self {
        Self {
            autoplay_allowed: false,
            ..Self::new()
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Advance while playing.
    pub fn advance(&mut self, dt: f64) {
        if !self.paused && dt > 0.0 {
            self.position += dt;
        }
    }
}

impl Default for ClockPlayback {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaPlayback for ClockPlayback {
    fn play(&mut self) -> Result<(), PlaybackError> {
        if !self.autoplay_allowed {
            return Err(PlaybackError::AutoplayBlocked);
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn seek(&mut self, seconds: f64) {
        self.position = seconds.max(0.0);
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn user_activation(&mut self) {
        self.autoplay_allowed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cineflow_core::{Size, Vec2};
    use cineflow_timeline::ElementKind;

    fn video(start: f64, duration: f64) -> CanvasElement {
        CanvasElement::new(
            ElementKind::Video {
                src: "clip.mp4".into(),
                volume: 0.8,
            },
            Vec2::ZERO,
            Size::new(300.0, 200.0),
            start,
            duration,
        )
    }

    fn ctx(time: f64, playing: bool) -> RenderContext {
        RenderContext {
            current_time: time,
            is_playing: playing,
            is_selected: false,
        }
    }

    /// Records calls in order.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        block: bool,
    }

    impl MediaPlayback for Recorder {
        fn play(&mut self) -> Result<(), PlaybackError> {
            self.calls.push("play".into());
            if self.block {
                Err(PlaybackError::AutoplayBlocked)
            } else {
                Ok(())
            }
        }
        fn pause(&mut self) {
            self.calls.push("pause".into());
        }
        fn seek(&mut self, seconds: f64) {
            self.calls.push(format!("seek {seconds}"));
        }
        fn set_volume(&mut self, _volume: f32) {}
        fn is_paused(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_visibility_window_half_open() {
        let e = video(5.0, 10.0);
        assert!(present(&e, &ctx(5.0, false)).visible);
        assert!(present(&e, &ctx(14.999, false)).visible);
        assert!(!present(&e, &ctx(15.0, false)).visible);
        assert!(!present(&e, &ctx(4.999, false)).visible);
    }

    #[test]
    fn test_should_play_requires_playing_and_visible() {
        let e = video(5.0, 10.0);
        assert!(present(&e, &ctx(6.0, true)).should_play);
        assert!(!present(&e, &ctx(6.0, false)).should_play);
        assert!(!present(&e, &ctx(20.0, true)).should_play);

        let size = Size::new(10.0, 10.0);
        let text = CanvasElement::new(ElementKind::text("Hi"), Vec2::ZERO, size, 0.0, 5.0);
        assert!(!present(&text, &ctx(1.0, true)).should_play);
    }

    #[test]
    fn test_seek_precedes_play() {
        let e = video(5.0, 10.0);
        let mut p = MediaPresenter::new(&e, Recorder::default());
        p.player_mut().calls.clear();

        p.sync(&present(&e, &ctx(7.5, true)));
        assert_eq!(p.player().calls, vec!["seek 2.5", "play"]);

        // Already running: no re-seek.
        p.sync(&present(&e, &ctx(7.6, true)));
        assert_eq!(p.player().calls.len(), 2);

        p.sync(&present(&e, &ctx(7.7, false)));
        assert_eq!(p.player().calls[2], "pause");
        assert!(!p.is_active());
    }

    #[test]
    fn test_leaving_window_pauses() {
        let e = video(5.0, 10.0);
        let mut p = MediaPresenter::new(&e, ClockPlayback::new());
        p.sync(&present(&e, &ctx(6.0, true)));
        assert!(!p.player().is_paused());
        p.sync(&present(&e, &ctx(15.0, true)));
        assert!(p.player().is_paused());
    }

    #[test]
    fn test_autoplay_block_sets_affordance() {
        let e = video(0.0, 10.0);
        let mut p = MediaPresenter::new(&e, ClockPlayback::requiring_gesture());
        p.sync(&present(&e, &ctx(1.0, true)));
        assert!(p.needs_user_gesture());
        assert!(p.player().is_paused());

        assert_eq!(p.click_to_play(), Ok(()));
        assert!(!p.needs_user_gesture());
        assert!(!p.player().is_paused());
        assert_eq!(p.player().position(), 1.0);
    }

    #[test]
    fn test_blocked_start_not_retried_every_frame() {
        let e = video(0.0, 10.0);
        let mut p = MediaPresenter::new(
            &e,
            Recorder {
                block: true,
                ..Default::default()
            },
        );
        p.sync(&present(&e, &ctx(1.0, true)));
        p.sync(&present(&e, &ctx(1.1, true)));
        let plays = p.player().calls.iter().filter(|c| *c == "play").count();
        assert_eq!(plays, 1);
    }

    #[test]
    fn test_volume_is_local_until_persisted() {
        let e = video(0.0, 10.0);
        let mut p = MediaPresenter::new(&e, ClockPlayback::new());
        assert_eq!(p.volume(), 0.8);
        assert_eq!(p.persist_volume(&e), None);

        p.set_volume(1.5);
        assert_eq!(p.volume(), 1.0);
        assert_eq!(p.player().volume(), 1.0);
        assert_eq!(e.volume(), Some(0.8));
        assert_eq!(
            p.persist_volume(&e),
            Some(EditCommand::SetVolume {
                id: e.id,
                from: 0.8,
                to: 1.0
            })
        );
    }

    #[test]
    fn test_clock_advances_only_while_playing() {
        let e = video(0.0, 10.0);
        let mut p = MediaPresenter::new(&e, ClockPlayback::new());
        p.player_mut().advance(1.0);
        assert_eq!(p.player().position(), 0.0);

        p.sync(&present(&e, &ctx(2.0, true)));
        p.player_mut().advance(0.5);
        assert_eq!(p.player().position(), 2.5);
    }

    #[test]
    fn test_jump_reseeks_running_media() {
        let e = video(0.0, 20.0);
        let mut p = MediaPresenter::new(&e, Recorder::default());
        p.sync(&present(&e, &ctx(0.5, true)));
        p.player_mut().calls.clear();

        p.sync_after_jump(&present(&e, &ctx(8.1, true)));
        assert_eq!(p.player().calls, vec!["seek 8.1"]);
        assert!(p.is_active());
    }
}
