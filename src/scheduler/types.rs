/*!
 * Scheduler Types
 * Configuration, tick outcomes and read-only views of the engine
 */

use crate::core::limits::{DEFAULT_AGING_FACTOR, DEFAULT_TIME_QUANTUM};
use crate::core::types::{AgingFactor, SimTime};
use crate::process::ProcessSnapshot;
use serde::{Deserialize, Serialize};

/// Ordering among ready processes with equal dynamic priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The process that has waited less goes first
    #[default]
    ShortestWait,
    /// The process that has waited longer goes first
    LongestWait,
}

impl TieBreak {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ShortestWait => "shortest_wait",
            Self::LongestWait => "longest_wait",
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Contiguous CPU time after which the running process is preempted
    pub time_quantum: SimTime,
    /// Priority points earned per second of ready-queue wait
    pub aging_factor: AgingFactor,
    pub tie_break: TieBreak,
    /// Record a `running` entry one unit before `completed` so a process that
    /// completes keeps a non-empty running interval on its timeline
    pub close_running_interval: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_quantum: DEFAULT_TIME_QUANTUM,
            aging_factor: DEFAULT_AGING_FACTOR,
            tie_break: TieBreak::default(),
            close_running_interval: true,
        }
    }
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickOutcome {
    /// The clock moved forward; active processes remain (or none were admitted)
    Advanced,
    /// Every admitted process has completed
    RunComplete,
}

impl TickOutcome {
    #[inline(always)]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::RunComplete)
    }
}

/// Throughput and latency metrics
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub completed_tasks: u64,
    /// Mean ready-queue wait of completed processes, 0 when none completed
    pub avg_waiting_time: f64,
    /// Completed processes per simulated second, 0 at time zero
    pub throughput: f64,
    pub current_time: SimTime,
    pub total_processes: usize,
}

/// Read-only view of all queues and metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub current_time: SimTime,
    pub ready: Vec<ProcessSnapshot>,
    pub waiting: Vec<ProcessSnapshot>,
    pub running: Option<ProcessSnapshot>,
    pub metrics: Metrics,
}
