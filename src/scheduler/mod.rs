/*!
 * Scheduling Engine
 * Tick-driven dynamic-priority scheduler with aging, quantum preemption and I/O waits
 */

use crate::core::data_structures::InlineString;
use crate::core::limits::TRANSITION_LOG_CAPACITY;
use crate::core::types::{AgingFactor, ProcessId, SimTime};
use crate::process::Process;
use ahash::AHashMap;
use std::collections::VecDeque;
use tracing::info;

mod invariants;
mod operations;
mod policy;
mod stats;
mod tick;
pub mod traits;
pub mod transitions;
pub mod types;

pub use policy::dispatch_order;
pub use traits::{FixedIoWait, IoWaitSource, SeededIoWait};
pub use transitions::{TransitionEntry, TransitionLog};
pub use types::{EngineConfig, EngineSnapshot, Metrics, TickOutcome, TieBreak};

/// Single-CPU scheduling engine
///
/// Owns every process of a run. An active process is a member of exactly one
/// of the ready queue, the waiting queue or the running slot; a completed
/// process is a member of none. Only the engine moves processes between them.
pub struct SchedulerEngine {
    // Append-only registry indexed by `ProcessId`
    processes: Vec<Process>,
    names: AHashMap<InlineString, ProcessId>,

    // Sorted only right before a dispatch decision
    ready_queue: VecDeque<ProcessId>,
    waiting_queue: Vec<ProcessId>,
    running: Option<ProcessId>,

    current_time: SimTime,
    config: EngineConfig,

    completed_tasks: u64,
    total_waiting_time: u64,

    transitions: TransitionLog,
    io_wait: Box<dyn IoWaitSource>,
}

impl std::fmt::Debug for SchedulerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerEngine")
            .field("current_time", &self.current_time)
            .field("processes", &self.processes.len())
            .field("ready", &self.ready_queue)
            .field("waiting", &self.waiting_queue)
            .field("running", &self.running)
            .field("config", &self.config)
            .field("completed_tasks", &self.completed_tasks)
            .field("transitions", &self.transitions)
            .finish()
    }
}

impl SchedulerEngine {
    /// Engine with default configuration and entropy-seeded I/O waits
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> SchedulerEngineBuilder {
        SchedulerEngineBuilder::new()
    }

    #[inline]
    pub fn current_time(&self) -> SimTime {
        self.current_time
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn completed_tasks(&self) -> u64 {
        self.completed_tasks
    }

    #[inline]
    pub fn total_waiting_time(&self) -> u64 {
        self.total_waiting_time
    }

    /// Process currently holding the CPU
    #[inline]
    pub fn running(&self) -> Option<ProcessId> {
        self.running
    }

    /// Ready queue in its current order
    pub fn ready_queue(&self) -> impl Iterator<Item = ProcessId> + '_ {
        self.ready_queue.iter().copied()
    }

    pub fn waiting_queue(&self) -> impl Iterator<Item = ProcessId> + '_ {
        self.waiting_queue.iter().copied()
    }

    /// Number of admitted processes, completed ones included
    #[inline]
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// True once at least one process was admitted and all have completed
    pub fn is_run_complete(&self) -> bool {
        !self.processes.is_empty() && self.processes.iter().all(Process::is_completed)
    }

    #[inline]
    pub fn transitions(&self) -> &TransitionLog {
        &self.transitions
    }
}

impl Default for SchedulerEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for SchedulerEngine
pub struct SchedulerEngineBuilder {
    config: EngineConfig,
    seed: Option<u64>,
    io_wait_range: Option<(SimTime, SimTime)>,
    io_wait: Option<Box<dyn IoWaitSource>>,
    transition_capacity: usize,
}

impl SchedulerEngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            seed: None,
            io_wait_range: None,
            io_wait: None,
            transition_capacity: TRANSITION_LOG_CAPACITY,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_time_quantum(mut self, quantum: SimTime) -> Self {
        self.config.time_quantum = quantum;
        self
    }

    pub fn with_aging_factor(mut self, factor: AgingFactor) -> Self {
        self.config.aging_factor = factor;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.config.tie_break = tie_break;
        self
    }

    pub fn with_close_running_interval(mut self, enabled: bool) -> Self {
        self.config.close_running_interval = enabled;
        self
    }

    /// Seed the default I/O wait generator
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Inclusive range of the default I/O wait generator
    pub fn with_io_wait_range(mut self, min: SimTime, max: SimTime) -> Self {
        self.io_wait_range = Some((min, max));
        self
    }

    /// Replace the I/O wait generator entirely
    pub fn with_io_wait_source(mut self, source: impl IoWaitSource + 'static) -> Self {
        self.io_wait = Some(Box::new(source));
        self
    }

    pub fn with_transition_capacity(mut self, capacity: usize) -> Self {
        self.transition_capacity = capacity;
        self
    }

    pub fn build(self) -> SchedulerEngine {
        let seed = self.seed;
        let io_wait: Box<dyn IoWaitSource> = match (self.io_wait, self.io_wait_range) {
            (Some(source), _) => source,
            (None, Some((min, max))) => Box::new(SeededIoWait::with_range(seed, min, max)),
            (None, None) => Box::new(SeededIoWait::new(seed)),
        };

        info!(
            time_quantum = self.config.time_quantum,
            aging_factor = self.config.aging_factor,
            tie_break = self.config.tie_break.as_str(),
            seeded = seed.is_some(),
            "Scheduling engine initialized"
        );

        SchedulerEngine {
            processes: Vec::new(),
            names: AHashMap::new(),
            ready_queue: VecDeque::new(),
            waiting_queue: Vec::new(),
            running: None,
            current_time: 0,
            config: self.config,
            completed_tasks: 0,
            total_waiting_time: 0,
            transitions: TransitionLog::with_capacity(self.transition_capacity),
            io_wait,
        }
    }
}

impl Default for SchedulerEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
