//! Timeline time: pixel mapping, `MM:SS.CC` formatting and parsing.
//!
//! Times are seconds as `f64`. Every mapping guards a zero duration or
//! zero width by returning 0 instead of NaN/infinity.

use serde::{Deserialize, Serialize};

/// Map a time to a horizontal pixel position on a track of `width` pixels.
pub fn time_to_position(time: f64, duration: f64, width: f64) -> f64 {
    if !(duration > 0.0) || !(width > 0.0) {
        return 0.0;
    }
    let position = time / duration * width;
    if position.is_finite() {
        position.max(0.0)
    } else {
        0.0
    }
}

/// Map a horizontal pixel position back to a time.
pub fn position_to_time(position: f64, duration: f64, width: f64) -> f64 {
    if !(duration > 0.0) || !(width > 0.0) {
        return 0.0;
    }
    let time = position / width * duration;
    if time.is_finite() {
        time.max(0.0)
    } else {
        0.0
    }
}

/// Format seconds as `MM:SS.CC` (minutes, seconds, hundredths).
///
/// Negative and non-finite inputs format as `00:00.00`.
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    };
    let centis = (seconds * 100.0).round() as u64;
    let minutes = centis / 6000;
    let secs = (centis / 100) % 60;
    let hundredths = centis % 100;
    format!("{:02}:{:02}.{:02}", minutes, secs, hundredths)
}

/// Parse `MM:SS` or `MM:SS.CC` into seconds.
///
/// Returns `None` for seconds ≥ 60, a hundredths field longer than two
/// digits, or any non-numeric field. Callers keep their previous time on `None`.
pub fn parse_time(s: &str) -> Option<f64> {
    let (minutes, rest) = s.trim().split_once(':')?;
    let (secs, hundredths) = match rest.split_once('.') {
        Some((secs, hundredths)) => (secs, Some(hundredths)),
        None => (rest, None),
    };

    let minutes = parse_digits(minutes, usize::MAX)?;
    let secs = parse_digits(secs, 2)?;
    if secs >= 60 {
        return None;
    }
    let hundredths = match hundredths {
        Some(h) => parse_digits(h, 2)?,
        None => 0,
    };
    if hundredths >= 100 {
        return None;
    }

    Some(minutes as f64 * 60.0 + secs as f64 + hundredths as f64 / 100.0)
}

/// Parse a non-empty run of ASCII digits no longer than `max_len`.
fn parse_digits(field: &str, max_len: usize) -> Option<u64> {
    if field.is_empty() || field.len() > max_len || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Playhead position within the document duration.
///
/// Invariant: `0 ≤ current_time ≤ total_duration`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineState {
    current_time: f64,
    total_duration: f64,
}

impl TimelineState {
    /// Create a timeline state, clamping the current time into range.
    pub fn new(current_time: f64, total_duration: f64) -> Self {
        let total_duration = if total_duration.is_finite() {
            total_duration.max(0.0)
        } else {
            0.0
        };
        let mut state = Self {
            current_time: 0.0,
            total_duration,
        };
        state.seek(current_time);
        state
    }

    /// Current playhead time in seconds.
    #[inline]
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Total document duration in seconds.
    #[inline]
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Move the playhead, clamped to `[0, total_duration]`. Returns the applied time.
    pub fn seek(&mut self, time: f64) -> f64 {
        self.current_time = if time.is_finite() {
            time.clamp(0.0, self.total_duration)
        } else {
            0.0
        };
        self.current_time
    }

    /// Change the total duration, pulling the playhead back if needed.
    pub fn set_total_duration(&mut self, total_duration: f64) {
        *self = Self::new(self.current_time, total_duration);
    }

    /// Whether the playhead sits at the end of the document.
    pub fn at_end(&self) -> bool {
        self.current_time >= self.total_duration
    }
}

impl Default for TimelineState {
    fn default() -> Self {
        Self::new(0.0, 30.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_time_position_zero_guards() {
        assert_eq!(time_to_position(5.0, 0.0, 800.0), 0.0);
        assert_eq!(time_to_position(5.0, 10.0, 0.0), 0.0);
        assert_eq!(position_to_time(400.0, 0.0, 800.0), 0.0);
        assert_eq!(position_to_time(400.0, 10.0, 0.0), 0.0);
    }

    #[test]
    fn test_time_position_linear() {
        assert_eq!(time_to_position(5.0, 10.0, 800.0), 400.0);
        assert_eq!(position_to_time(200.0, 10.0, 800.0), 2.5);
        assert_eq!(position_to_time(-50.0, 10.0, 800.0), 0.0);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00.00");
        assert_eq!(format_time(1.29), "00:01.29");
        assert_eq!(format_time(75.5), "01:15.50");
        assert_eq!(format_time(-3.0), "00:00.00");
        assert_eq!(format_time(f64::NAN), "00:00.00");
        assert_eq!(format_time(59.999), "01:00.00");
    }

    #[test]
    fn test_parse_time_valid() {
        assert_eq!(parse_time("01:15.50"), Some(75.5));
        assert_eq!(parse_time("00:10"), Some(10.0));
        assert_eq!(parse_time(" 02:00.05 "), Some(120.05));
    }

    #[test]
    fn test_parse_time_rejects() {
        for s in [
            "01:60",
            "00:10.100",
            "00:60.00",
            "00:10.",
            "abc",
            "1:2:3",
            "-1:00",
            "00:-5",
            "00:5x",
            "",
            ":",
        ] {
            assert_eq!(parse_time(s), None, "{s}");
        }
    }

    #[test]
    fn test_timeline_state_clamps() {
        let mut t = TimelineState::new(50.0, 30.0);
        assert_eq!(t.current_time(), 30.0);
        assert!(t.at_end());
        assert_eq!(t.seek(-4.0), 0.0);
        t.seek(20.0);
        t.set_total_duration(10.0);
        assert_eq!(t.current_time(), 10.0);
    }

    proptest! {
        #[test]
        fn prop_time_position_round_trip(
            duration in 0.01f64..10_000.0,
            width in 1.0f64..10_000.0,
            fraction in 0.0f64..=1.0,
        ) {
            let time = duration * fraction;
            let back = position_to_time(time_to_position(time, duration, width), duration, width);
            prop_assert!((back - time).abs() < 1e-6 * duration.max(1.0));
        }

        #[test]
        fn prop_format_parse_round_trip(m in 0u32..100, s in 0u32..60, c in 0u32..100) {
            let text = format!("{:02}:{:02}.{:02}", m, s, c);
            let parsed = parse_time(&text).unwrap();
            prop_assert_eq!(format_time(parsed), text);
        }

        #[test]
        fn prop_parse_rejects_out_of_range_seconds(m in 0u32..100, s in 60u32..100) {
            let text = format!("{:02}:{:02}", m, s);
            prop_assert!(parse_time(&text).is_none());
        }
    }
}
