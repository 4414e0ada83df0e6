/*!
 * Process Module
 * Simulated processes: lifecycle, priority policy, I/O bursts and timelines
 */

pub mod core;
pub mod entity;
pub mod io;
pub mod priority;
pub mod timeline;
pub mod validation;

// Re-export for convenience
pub use self::core::types::{
    ExecOutcome, ProcessSnapshot, ProcessState, ProcessType, StateRecord,
};
pub use entity::Process;
pub use io::IoBurstPlan;
pub use timeline::{StepSeries, Timeline, TimelineIter, TimelinePoint};
