//! Event timestamps.
use std::time::Instant;

/// Where event timestamps come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timebase {
    /// Seconds of wall time since the session was prepared, read from a
    /// monotonic clock when each block arrives.
    Wall,
    /// Seconds of audio processed before the block, derived from the sample
    /// count. Deterministic, which suits offline rendering.
    Samples,
}

/// Produces the timestamp of each block. Readings never decrease.
#[derive(Debug, Clone)]
pub(crate) struct Clock {
    timebase: Timebase,
    started: Instant,
    sample_rate: f64,
    samples: u64,
    last: f64,
}

impl Clock {
    pub(crate) fn new(timebase: Timebase, sample_rate: f64) -> Self {
        Clock {
            timebase,
            started: Instant::now(),
            sample_rate,
            samples: 0,
            last: 0.0,
        }
    }

    pub(crate) fn now(&mut self) -> f64 {
        let reading = match self.timebase {
            Timebase::Wall => self.started.elapsed().as_secs_f64(),
            Timebase::Samples => self.samples as f64 / self.sample_rate,
        };
        self.last = self.last.max(reading);
        self.last
    }

    pub(crate) fn advance(&mut self, samples: usize) {
        self.samples += samples as u64;
    }
}
