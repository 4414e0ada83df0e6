/*!
 * Process Types
 * Common types for simulated processes
 */

use crate::core::data_structures::InlineString;
use crate::core::errors::SchedulerError;
use crate::core::types::{Priority, ProcessId, SimTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workload class of a process
///
/// The class only affects priority aging and I/O burst generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessType {
    /// CPU-bound: no I/O, penalized after heavy CPU use
    #[serde(alias = "cpu-bound")]
    Cpu,
    /// I/O-bound: periodic I/O bursts, moderate aging bonus
    #[serde(alias = "io-bound")]
    Io,
    /// Interactive: no I/O bursts, strongest aging bonus
    Interactive,
}

impl ProcessType {
    /// Priority points added on every aging pass
    #[inline(always)]
    pub const fn aging_bonus(self) -> i64 {
        match self {
            Self::Cpu => 0,
            Self::Io => 1,
            Self::Interactive => 2,
        }
    }

    /// Whether this class generates I/O bursts
    #[inline(always)]
    pub const fn performs_io(self) -> bool {
        matches!(self, Self::Io)
    }

    /// Whether heavy CPU use lowers this class's priority
    #[inline(always)]
    pub const fn penalized_for_cpu(self) -> bool {
        matches!(self, Self::Cpu)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Io => "io",
            Self::Interactive => "interactive",
        }
    }

    /// Human-readable class name
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Cpu => "CPU-bound",
            Self::Io => "I/O-bound",
            Self::Interactive => "Interactive",
        }
    }
}

impl FromStr for ProcessType {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cpu" | "cpu-bound" | "cpu_bound" => Ok(Self::Cpu),
            "io" | "i/o" | "io-bound" | "io_bound" | "i/o-bound" | "i/o_bound" => Ok(Self::Io),
            "interactive" => Ok(Self::Interactive),
            _ => Err(SchedulerError::InvalidProcessType(s.into())),
        }
    }
}

impl fmt::Display for ProcessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process state
///
/// `Created → Ready → Running → (Waiting ⇄ Ready)* → Running → Completed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Transient, recorded once at construction
    Created,
    /// Queued for the CPU
    Ready,
    /// Holding the CPU
    Running,
    /// Performing simulated I/O
    Waiting,
    /// Terminal
    Completed,
}

impl ProcessState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Waiting => "waiting",
            Self::Completed => "completed",
        }
    }

    #[inline(always)]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry of a process's state history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    pub state: ProcessState,
    pub time: SimTime,
    /// Dynamic priority at the moment of the transition
    pub priority: Priority,
}

/// Result of running a process for one slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOutcome {
    /// Work remains and no I/O is due
    StillRunning,
    /// An I/O burst was triggered; the process must leave the CPU
    NeedsIo,
    /// Remaining time reached zero
    Completed,
}

/// Read-only view of a process for presentation layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSnapshot {
    pub id: ProcessId,
    pub name: InlineString,
    #[serde(rename = "type")]
    pub kind: ProcessType,
    pub dynamic_priority: Priority,
    pub original_priority: Priority,
    pub remaining_time: SimTime,
    pub execution_time: SimTime,
    pub status: ProcessState,
    /// Share of execution time already consumed, 0-100
    pub progress: f64,
}
