//! Scrolling the container while a drag hovers near its edges.

use crate::timer::{Duration, Instant, Timer};
use kurbo::{Point, Size, Vec2};

/// Width of the band along each edge that triggers scrolling.
pub const AUTOSCROLL_MARGIN: f64 = 20.0;
pub const AUTOSCROLL_MIN_DELTA: f64 = 5.0;
pub const AUTOSCROLL_MAX_DELTA: f64 = 50.0;
pub const AUTOSCROLL_INTERVAL: Duration = Duration::from_millis(100);
/// Time the pointer must stay in the margin before the first scroll.
pub const AUTOSCROLL_INITIAL_DELAY: Duration = Duration::from_millis(100);

/// Tick of the rubberband selection scroll.
pub const RUBBERBAND_SCROLL_INTERVAL: Duration = Duration::from_millis(10);

/// Whether a widget-space pointer lies in the autoscroll margin.
pub fn in_margin(pointer: Point, size: Size) -> bool {
    pointer.x < AUTOSCROLL_MARGIN
        || pointer.y < AUTOSCROLL_MARGIN
        || pointer.x > size.width - AUTOSCROLL_MARGIN
        || pointer.y > size.height - AUTOSCROLL_MARGIN
}

fn axis_delta(position: f64, length: f64) -> f64 {
    let ramp = |depth: f64| {
        let depth = depth.clamp(0.0, AUTOSCROLL_MARGIN);
        AUTOSCROLL_MIN_DELTA
            + (AUTOSCROLL_MAX_DELTA - AUTOSCROLL_MIN_DELTA) * depth / AUTOSCROLL_MARGIN
    };
    if position < AUTOSCROLL_MARGIN {
        -ramp(AUTOSCROLL_MARGIN - position)
    } else if position > length - AUTOSCROLL_MARGIN {
        ramp(position - (length - AUTOSCROLL_MARGIN))
    } else {
        0.0
    }
}

/// Scroll step for a pointer position. The deeper into the margin, the
/// faster; the left and top edges win over the right and bottom ones.
pub fn autoscroll_delta(pointer: Point, size: Size) -> Vec2 {
    Vec2::new(
        axis_delta(pointer.x, size.width),
        axis_delta(pointer.y, size.height),
    )
}

/// Scroll step while rubberbanding: how far the pointer lies outside the
/// widget.
pub fn rubberband_delta(pointer: Point, size: Size) -> Vec2 {
    let outside = |position: f64, length: f64| {
        if position < 0.0 {
            position
        } else if position > length {
            position - length
        } else {
            0.0
        }
    };
    Vec2::new(outside(pointer.x, size.width), outside(pointer.y, size.height))
}

/// A running autoscroll. The first step comes after the initial delay,
/// later ones every interval.
#[derive(Debug, Clone, Copy)]
pub struct Autoscroll {
    timer: Timer,
}

impl Autoscroll {
    pub fn start(now: Instant) -> Self {
        Self::with_delay(now, AUTOSCROLL_INITIAL_DELAY)
    }

    pub fn with_delay(now: Instant, delay: Duration) -> Self {
        log::debug!("Autoscroll started");
        Self {
            timer: Timer::with_delay(now, delay, AUTOSCROLL_INTERVAL),
        }
    }

    pub fn deadline(&self) -> Instant {
        self.timer.deadline()
    }

    /// Poll the timer. Returns the step to scroll by when a tick is due and
    /// the pointer is in the margin.
    pub fn tick(&mut self, now: Instant, pointer: Point, size: Size) -> Option<Vec2> {
        if !self.timer.poll(now) {
            return None;
        }
        let delta = autoscroll_delta(pointer, size);
        (delta != Vec2::ZERO).then_some(delta)
    }
}
