use std::time::{SystemTime, UNIX_EPOCH};

/// Receiver of the once-per-second frame rate.
pub trait FpsSink {
    fn report(&mut self, fps: u32);
}

impl<F> FpsSink for F
where
    F: FnMut(u32),
{
    fn report(&mut self, fps: u32) {
        self(fps)
    }
}

/// Steps-per-wall-clock-second counter.
///
/// Counts calls within one epoch second; on the first call of a new second the
/// finished count is published and counting restarts.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    second: Option<u64>,
    count: u32,
    last: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one frame at epoch second `second`.
    ///
    /// Returns the previous second's count when a boundary was crossed.
    pub fn record(&mut self, second: u64) -> Option<u32> {
        match self.second {
            Some(s) if s == second => {
                self.count += 1;
                None
            }
            Some(_) => {
                let finished = self.count;
                self.second = Some(second);
                self.count = 1;
                self.last = finished;
                Some(finished)
            }
            None => {
                self.second = Some(second);
                self.count = 1;
                None
            }
        }
    }

    /// Most recently published value.
    #[inline]
    pub fn last(&self) -> u32 {
        self.last
    }
}

/// Current wall-clock time in whole epoch seconds.
pub fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publishes_once_per_boundary() {
        let mut c = FpsCounter::new();
        assert_eq!(c.record(10), None);
        assert_eq!(c.record(10), None);
        assert_eq!(c.record(10), None);
        assert_eq!(c.record(11), Some(3));
        assert_eq!(c.last(), 3);
        assert_eq!(c.record(11), None);
        assert_eq!(c.record(14), Some(2));
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen: Vec<u32> = Vec::new();
        {
            let mut sink = |fps: u32| seen.push(fps);
            sink.report(42);
        }
        assert_eq!(seen, vec![42]);
    }
}
