//! Request pacing
//!
//! Pacing keeps a warm run from becoming the load spike it is meant to
//! prevent. Parallel tasks get a deterministic stagger keyed by their position
//! so a burst of semaphore releases does not fire at the same instant.

use std::time::Duration;

/// Stagger added per position within a cycle
pub const JITTER_STEP: Duration = Duration::from_millis(50);

/// Positions per stagger cycle
pub const JITTER_CYCLE: usize = 10;

/// Sequential mode pauses after this many requests
pub const BATCH_SIZE: usize = 10;

/// Length of the sequential batch pause
pub const BATCH_PAUSE: Duration = Duration::from_secs(1);

/// Delay schedule derived from the configured base delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    base_delay: Duration,
}

impl Pacing {
    pub fn new(base_delay: Duration) -> Self {
        Self { base_delay }
    }

    /// `(index mod 10) * 50ms`
    pub fn jitter(index: usize) -> Duration {
        JITTER_STEP * (index % JITTER_CYCLE) as u32
    }

    /// Sleep before the parallel request at `index`
    pub fn parallel_delay(&self, index: usize) -> Duration {
        self.base_delay + Self::jitter(index)
    }

    /// Sleep before the sequential request at `index`; none before the first
    pub fn sequential_delay(&self, index: usize) -> Duration {
        if index == 0 {
            Duration::ZERO
        } else {
            self.base_delay * 2
        }
    }

    /// Extra pause after `completed` sequential requests, if one is due
    pub fn batch_pause(completed: usize) -> Option<Duration> {
        (completed > 0 && completed % BATCH_SIZE == 0).then_some(BATCH_PAUSE)
    }
}
