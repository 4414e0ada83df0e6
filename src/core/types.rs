/*!
 * Core Types
 * Common types used across the simulator
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical simulation time in milliseconds
pub type SimTime = u64;

/// Priority level (1-10, higher is more important)
pub type Priority = u8;

/// Aging factor applied to ready-queue wait time
pub type AgingFactor = u32;

/// Stable handle of a process inside a single simulation run
///
/// Handles index the engine's append-only registry and are invalidated by reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub usize);

impl ProcessId {
    /// Registry index
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
