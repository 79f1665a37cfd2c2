use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::timer::TimerKind;

/// Half-open millisecond range `[min_ms, max_ms)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DurationRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub fn is_empty(&self) -> bool {
        self.min_ms >= self.max_ms
    }

    pub fn contains(&self, duration: Duration) -> bool {
        let ms = duration.as_millis() as u64;
        ms >= self.min_ms && ms < self.max_ms
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.is_empty() {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rng.gen_range(self.min_ms..self.max_ms))
    }
}

pub trait DurationProvider: Send + Sync {
    fn next_duration(&self, kind: TimerKind) -> Duration;
}

#[derive(Debug, Clone)]
pub struct RandomDurations {
    tick: DurationRange,
    advance: DurationRange,
}

impl RandomDurations {
    pub fn new(tick: DurationRange, advance: DurationRange) -> Self {
        Self { tick, advance }
    }
}

impl Default for RandomDurations {
    fn default() -> Self {
        Self::new(DurationRange::new(2000, 4000), DurationRange::new(1200, 2400))
    }
}

impl DurationProvider for RandomDurations {
    fn next_duration(&self, kind: TimerKind) -> Duration {
        let mut rng = rand::thread_rng();
        match kind {
            TimerKind::Tick => self.tick.sample(&mut rng),
            TimerKind::Advance => self.advance.sample(&mut rng),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedDurations {
    pub tick: Duration,
    pub advance: Duration,
}

impl FixedDurations {
    pub fn new(tick: Duration, advance: Duration) -> Self {
        Self { tick, advance }
    }

    /// Lower bound of each default range.
    pub fn fastest() -> Self {
        Self::new(Duration::from_millis(2000), Duration::from_millis(1200))
    }
}

impl DurationProvider for FixedDurations {
    fn next_duration(&self, kind: TimerKind) -> Duration {
        match kind {
            TimerKind::Tick => self.tick,
            TimerKind::Advance => self.advance,
        }
    }
}
