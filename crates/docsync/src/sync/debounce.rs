//! Coalescing of rapid inputs into the last one after a quiet period.
//!
//! Time is passed in by the caller, so the same type works under any event
//! loop (or none, in tests).

use std::time::{Duration, Instant};

#[derive(Debug)]
struct Pending<T> {
    payload: T,
    deadline: Instant,
}

/// A single cancellable deferred payload.
///
/// Scheduling while a payload is pending replaces it and restarts the quiet
/// period; only the last payload of a burst is ever handed out.
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Schedule `payload` to fire once `window` has passed since `now`.
    ///
    /// Returns `true` if a pending payload was replaced.
    pub fn schedule(&mut self, payload: T, now: Instant) -> bool {
        let replaced = self.pending.is_some();
        self.pending = Some(Pending {
            payload,
            deadline: now + self.window,
        });
        replaced
    }

    /// Hand out the pending payload if its quiet period has elapsed at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => self.take(),
            _ => None,
        }
    }

    /// Hand out the pending payload immediately.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.payload)
    }

    /// Drop the pending payload. Returns `true` if there was one.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(300);

    #[test]
    fn fires_after_quiet_period() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        assert!(!d.schedule("a", t0));
        assert_eq!(d.poll(t0 + Duration::from_millis(299)), None);
        assert_eq!(d.poll(t0 + WINDOW), Some("a"));
        assert!(!d.is_pending());
        assert_eq!(d.poll(t0 + WINDOW * 2), None);
    }

    #[test]
    fn burst_keeps_last_and_restarts_window() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        d.schedule("a", t0);
        assert!(d.schedule("ab", t0 + Duration::from_millis(200)));
        assert!(d.schedule("abc", t0 + Duration::from_millis(400)));
        assert_eq!(d.poll(t0 + Duration::from_millis(600)), None);
        assert_eq!(d.deadline(), Some(t0 + Duration::from_millis(700)));
        assert_eq!(d.poll(t0 + Duration::from_millis(700)), Some("abc"));
    }

    #[test]
    fn cancel_and_take() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        assert!(!d.cancel());
        d.schedule(1, t0);
        assert!(d.cancel());
        assert_eq!(d.poll(t0 + WINDOW), None);
        d.schedule(2, t0);
        assert_eq!(d.take(), Some(2));
        assert_eq!(d.take(), None);
    }

    #[test]
    fn zero_window_fires_on_next_poll() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::ZERO);
        d.schedule("x", t0);
        assert_eq!(d.poll(t0), Some("x"));
    }
}
