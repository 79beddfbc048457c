use std::time::Duration;

const MIN_INTERVAL: Duration = Duration::from_nanos(1);

/// The drop cadence: fires once every `interval` of elapsed time while armed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropTimer {
    interval: Option<Duration>,
    // invariant: less than `interval` while armed, zero while stopped
    elapsed: Duration,
}

impl DropTimer {
    /// Cancel whatever was running and start over at `interval`.
    pub fn arm(&mut self, interval: Duration) {
        self.interval = Some(interval.max(MIN_INTERVAL));
        self.elapsed = Duration::ZERO;
    }

    pub fn stop(&mut self) {
        self.interval = None;
        self.elapsed = Duration::ZERO;
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Let up to `budget` pass.
    ///
    /// Returns `Some(leftover)` if the timer fired, having consumed only the
    /// time up to the firing, and `None` if the whole budget went by (or the
    /// timer is stopped) without a firing.
    pub fn advance(&mut self, budget: Duration) -> Option<Duration> {
        let interval = self.interval?;
        let until_fire = interval - self.elapsed;
        if budget < until_fire {
            self.elapsed += budget;
            None
        } else {
            self.elapsed = Duration::ZERO;
            Some(budget - until_fire)
        }
    }
}
