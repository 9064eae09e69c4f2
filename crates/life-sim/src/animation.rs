use std::time::{Duration, Instant};

/// Default delay between automatic ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(60);

/// Fixed-interval tick schedule polled by the host loop.
///
/// Stopping clears the pending deadline, so no poll after [`stop`] returns
/// can fire.
///
/// [`stop`]: Animation::stop
#[derive(Debug, Clone)]
pub struct Animation {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Animation {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            next_due: None,
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Arms the schedule; the first tick is due one interval after `now`.
    /// Starting an already running schedule keeps its deadline.
    pub fn start(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now + self.interval);
        }
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// Returns the new running state.
    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.is_running() {
            self.stop();
        } else {
            self.start(now);
        }
        self.is_running()
    }

    /// Returns true if a tick is due at `now` and re-arms the schedule.
    ///
    /// Missed deadlines collapse into a single tick.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn fires_after_interval() {
        let t0 = Instant::now();
        let mut a = Animation::new(60 * MS);
        a.start(t0);
        assert!(!a.poll(t0 + 59 * MS));
        assert!(a.poll(t0 + 60 * MS));
        assert!(!a.poll(t0 + 61 * MS));
        assert!(a.poll(t0 + 120 * MS));
    }

    #[test]
    fn late_poll_fires_once() {
        let t0 = Instant::now();
        let mut a = Animation::new(60 * MS);
        a.start(t0);
        assert!(a.poll(t0 + 1000 * MS));
        assert!(!a.poll(t0 + 1001 * MS));
    }

    #[test]
    fn stopped_schedule_never_fires() {
        let t0 = Instant::now();
        let mut a = Animation::new(60 * MS);
        assert!(a.toggle(t0));
        assert!(!a.toggle(t0 + 10 * MS));
        for k in 1..50 {
            assert!(!a.poll(t0 + k * 100 * MS));
        }
    }
}
