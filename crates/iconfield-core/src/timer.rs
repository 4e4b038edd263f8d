//! Deadline timers and idle slots driven by the host loop.
//!
//! Nothing here runs on its own: the host calls the container's
//! `process_timers(now)` and `process_idle()`, which poll these.

#[cfg(not(target_arch = "wasm32"))]
pub use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
pub use web_time::{Duration, Instant};

/// A repeating timer. Dropping it cancels it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    interval: Duration,
    next_fire: Instant,
}

impl Timer {
    /// Timer firing every `interval`, first at `now + interval`.
    pub fn new(now: Instant, interval: Duration) -> Self {
        Self {
            interval,
            next_fire: now + interval,
        }
    }

    /// Timer firing first at `now + delay`, then every `interval`.
    pub fn with_delay(now: Instant, delay: Duration, interval: Duration) -> Self {
        Self {
            interval,
            next_fire: now + delay,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the timer fires next.
    pub fn deadline(&self) -> Instant {
        self.next_fire
    }

    /// Returns true if the deadline has passed and schedules the next one.
    /// Missed ticks are collapsed into one.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_fire {
            return false;
        }
        self.next_fire = now + self.interval;
        true
    }
}

/// A request to run something once the host is idle. Requesting twice
/// before it runs is a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdleSlot {
    pending: bool,
}

impl IdleSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule. Returns false if already scheduled.
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    pub fn cancel(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the request. Returns true if one was pending.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_fires_after_interval() {
        let start = Instant::now();
        let mut timer = Timer::new(start, Duration::from_millis(100));
        assert!(!timer.poll(start + Duration::from_millis(99)));
        assert!(timer.poll(start + Duration::from_millis(100)));
        assert!(!timer.poll(start + Duration::from_millis(150)));
        assert!(timer.poll(start + Duration::from_millis(200)));
    }

    #[test]
    fn test_timer_collapses_missed_ticks() {
        let start = Instant::now();
        let mut timer = Timer::new(start, Duration::from_millis(10));
        let late = start + Duration::from_millis(100);
        assert!(timer.poll(late));
        assert!(!timer.poll(late));
        assert_eq!(timer.deadline(), late + Duration::from_millis(10));
    }

    #[test]
    fn test_timer_with_delay() {
        let start = Instant::now();
        let mut timer = Timer::with_delay(start, Duration::ZERO, Duration::from_millis(50));
        assert!(timer.poll(start));
        assert!(!timer.poll(start + Duration::from_millis(10)));
    }

    #[test]
    fn test_idle_slot() {
        let mut slot = IdleSlot::new();
        assert!(slot.request());
        assert!(!slot.request());
        assert!(slot.take());
        assert!(!slot.take());

        slot.request();
        slot.cancel();
        assert!(!slot.is_pending());
        assert!(!slot.take());
    }
}
