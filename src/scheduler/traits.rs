/*!
 * Scheduler Traits
 * Injection points for the engine's only source of non-determinism
 */

use crate::core::limits::{DEFAULT_IO_WAIT_MAX, DEFAULT_IO_WAIT_MIN};
use crate::core::types::SimTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of simulated I/O wait durations
#[cfg_attr(test, mockall::automock)]
pub trait IoWaitSource: Send {
    /// Duration of the next I/O wait in ms
    fn next_wait(&mut self) -> SimTime;
}

/// Uniform I/O waits drawn from a seedable generator
#[derive(Debug, Clone)]
pub struct SeededIoWait {
    rng: StdRng,
    min: SimTime,
    max: SimTime,
}

impl SeededIoWait {
    /// Default range `[500, 999]`; `None` seeds from OS entropy
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_range(seed, DEFAULT_IO_WAIT_MIN, DEFAULT_IO_WAIT_MAX)
    }

    /// Inclusive range `[min, max]`; bounds are swapped if given backwards
    pub fn with_range(seed: Option<u64>, min: SimTime, max: SimTime) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            min: min.min(max),
            max: max.max(min),
        }
    }
}

impl IoWaitSource for SeededIoWait {
    fn next_wait(&mut self) -> SimTime {
        self.rng.gen_range(self.min..=self.max)
    }
}

/// Constant I/O wait, for reproducible scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedIoWait(pub SimTime);

impl IoWaitSource for FixedIoWait {
    fn next_wait(&mut self) -> SimTime {
        self.0
    }
}
