//! Playhead: scrubbing, ruler seeking, inline time entry and the playback clock.

use cineflow_core::{format_time, parse_time, position_to_time, time_to_position, TimelineState};
use tracing::{debug, warn};

use crate::lock::{InputLock, InputLockHost};

/// Horizontal extent of the time track in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackGeometry {
    pub left: f32,
    pub width: f32,
}

impl TrackGeometry {
    pub fn new(left: f32, width: f32) -> Self {
        Self { left, width }
    }

    /// Time under screen x, clamped to `[0, duration]`.
    pub fn time_at(&self, x: f32, duration: f64) -> f64 {
        position_to_time(f64::from(x - self.left), duration, f64::from(self.width))
            .min(duration.max(0.0))
    }

    /// Screen x for a time.
    pub fn x_for(&self, time: f64, duration: f64) -> f32 {
        self.left + time_to_position(time, duration, f64::from(self.width)) as f32
    }
}

/// Keys the inline time editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Enter,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScrubSource {
    Handle,
    Ruler,
}

struct Scrub {
    source: ScrubSource,
    _lock: InputLock,
}

/// Drives the playhead from the timeline bar.
pub struct PlayheadController {
    track: TrackGeometry,
    scrub: Option<Scrub>,
    edit_text: Option<String>,
    playing: bool,
    locks: InputLockHost,
    attached: bool,
}

impl PlayheadController {
    pub fn new(locks: InputLockHost) -> Self {
        Self {
            track: TrackGeometry::default(),
            scrub: None,
            edit_text: None,
            playing: false,
            locks,
            attached: false,
        }
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// Stop reacting to input: ends scrubbing, closes the editor without
    /// committing and pauses playback.
    pub fn detach(&mut self) {
        self.scrub = None;
        self.edit_text = None;
        self.playing = false;
        self.attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn track(&self) -> TrackGeometry {
        self.track
    }

    /// Update the track layout, e.g. after the timeline bar was resized.
    pub fn set_track(&mut self, track: TrackGeometry) {
        self.track = track;
    }

    pub fn is_scrubbing(&self) -> bool {
        self.scrub.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_editing(&self) -> bool {
        self.edit_text.is_some()
    }

    /// Text in the inline editor, when open.
    pub fn edit_text(&self) -> Option<&str> {
        self.edit_text.as_deref()
    }

    /// Screen x of the playhead.
    pub fn x_for_time(&self, timeline: &TimelineState) -> f32 {
        self.track.x_for(timeline.current_time(), timeline.total_duration())
    }

    // ── Scrubbing ──────────────────────────────────────────────

    /// Pointer down on the playhead handle.
    pub fn press_handle(&mut self) -> bool {
        self.begin_scrub(ScrubSource::Handle)
    }

    /// Pointer down on the ruler: seek straight to the clicked time.
    pub fn press_ruler(&mut self, x: f32, timeline: &mut TimelineState) -> Option<f64> {
        if !self.begin_scrub(ScrubSource::Ruler) {
            return None;
        }
        Some(timeline.seek(self.track.time_at(x, timeline.total_duration())))
    }

    fn begin_scrub(&mut self, source: ScrubSource) -> bool {
        if !self.attached || self.scrub.is_some() {
            return false;
        }
        let reason = match source {
            ScrubSource::Handle => "scrub",
            ScrubSource::Ruler => "ruler-seek",
        };
        self.scrub = Some(Scrub {
            source,
            _lock: self.locks.acquire(reason),
        });
        debug!(?source, "Scrub started");
        true
    }

    /// Pointer moved while scrubbing. Returns the new time.
    pub fn drag(&mut self, x: f32, timeline: &mut TimelineState) -> Option<f64> {
        self.scrub.as_ref()?;
        Some(timeline.seek(self.track.time_at(x, timeline.total_duration())))
    }

    /// Pointer released. Returns whether a scrub ended.
    pub fn release(&mut self) -> bool {
        match self.scrub.take() {
            Some(scrub) => {
                debug!(source = ?scrub.source, "Scrub ended");
                true
            }
            None => false,
        }
    }

    // ── Inline time entry ──────────────────────────────────────

    /// Click on the time label opens the editor, unless scrubbing.
    pub fn click_label(&mut self, timeline: &TimelineState) -> bool {
        if !self.attached || self.is_scrubbing() || self.is_editing() {
            return false;
        }
        self.edit_text = Some(format_time(timeline.current_time()));
        true
    }

    pub fn set_edit_text(&mut self, text: impl Into<String>) {
        if let Some(current) = self.edit_text.as_mut() {
            *current = text.into();
        }
    }

    /// Enter commits, Escape discards.
    pub fn key(&mut self, key: EditKey, timeline: &mut TimelineState) -> Option<f64> {
        match key {
            EditKey::Enter => self.commit(timeline),
            EditKey::Escape => {
                self.edit_text = None;
                None
            }
        }
    }

    /// Losing focus commits like Enter.
    pub fn blur(&mut self, timeline: &mut TimelineState) -> Option<f64> {
        self.commit(timeline)
    }

    fn commit(&mut self, timeline: &mut TimelineState) -> Option<f64> {
        let text = self.edit_text.take()?;
        match parse_time(&text) {
            Some(seconds) => Some(timeline.seek(seconds)),
            None => {
                warn!(input = %text, "Ignoring malformed time");
                None
            }
        }
    }

    // ── Playback clock ─────────────────────────────────────────

    /// Start or pause playback. Playing from the end restarts at zero.
    pub fn toggle_play(&mut self, timeline: &mut TimelineState) -> bool {
        if self.playing {
            self.playing = false;
        } else {
            if timeline.at_end() {
                timeline.seek(0.0);
            }
            self.playing = timeline.total_duration() > 0.0;
        }
        self.playing
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Advance the clock by `dt` seconds. Stops at the end of the document.
    /// The clock holds still while scrubbing.
    pub fn tick(&mut self, dt: f64, timeline: &mut TimelineState) -> bool {
        if !self.playing || self.is_scrubbing() || !(dt > 0.0) {
            return false;
        }
        timeline.seek(timeline.current_time() + dt);
        if timeline.at_end() {
            self.playing = false;
            debug!(time = timeline.current_time(), "Playback reached end");
        }
        true
    }
}
