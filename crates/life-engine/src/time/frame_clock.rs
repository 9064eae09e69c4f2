use std::time::Instant;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Monotonic timestamp taken at the tick. The animation schedule is
    /// polled against this.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Per-window frame clock.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    frame_index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let ft = FrameTime {
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn frames_count_from_zero() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new();

        let a = clock.tick_at(t0);
        assert_eq!(a.frame_index, 0);
        assert_eq!(a.now, t0);

        let b = clock.tick_at(t0 + Duration::from_secs(10));
        assert_eq!(b.frame_index, 1);
        assert_eq!(b.now, t0 + Duration::from_secs(10));
    }
}
