//! Rate limiting for drag and resize updates.

/// Passes at most one value per interval and keeps the latest skipped one.
///
/// Driven by event timestamps so it needs no timer; `flush` hands back the
/// trailing value when the interaction ends and `cancel` drops it on teardown.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    interval_ms: f64,
    last_fire_ms: Option<f64>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            last_fire_ms: None,
            pending: None,
        }
    }

    /// Offer a value at `now_ms`. Returns it if the interval has elapsed,
    /// otherwise stores it as pending.
    pub fn offer(&mut self, value: T, now_ms: f64) -> Option<T> {
        let ready = match self.last_fire_ms {
            None => true,
            Some(last) => now_ms - last >= self.interval_ms,
        };
        if ready {
            self.last_fire_ms = Some(now_ms);
            self.pending = None;
            Some(value)
        } else {
            self.pending = Some(value);
            None
        }
    }

    /// Take the pending value, if any, and reset the interval.
    pub fn flush(&mut self) -> Option<T> {
        self.last_fire_ms = None;
        self.pending.take()
    }

    /// Drop any pending value and reset the interval.
    pub fn cancel(&mut self) {
        self.last_fire_ms = None;
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
