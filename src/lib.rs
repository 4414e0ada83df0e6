/*!
 * Aging Scheduler Simulator Library
 * Dynamic-priority process scheduling with aging, quantum preemption and simulated I/O
 */

pub mod core;
pub mod driver;
pub mod monitoring;
pub mod process;
pub mod scheduler;

// Re-exports
pub use crate::core::{
    ErrorKind, InlineString, ProcessId, ProcessSpec, Result, SchedulerError, SchedulerResult,
    SimTime, SimulationConfig, SimulatorError,
};
pub use driver::{DriverCommand, DriverState, DriverStatus, TickDriver};
pub use monitoring::init_tracing;
pub use process::{
    Process, ProcessSnapshot, ProcessState, ProcessType, StepSeries, Timeline, TimelinePoint,
};
pub use scheduler::{
    EngineConfig, EngineSnapshot, FixedIoWait, IoWaitSource, Metrics, SchedulerEngine,
    SchedulerEngineBuilder, SeededIoWait, TickOutcome, TieBreak, TransitionEntry, TransitionLog,
};
