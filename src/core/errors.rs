/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use crate::core::data_structures::InlineString;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad class of a scheduler error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Request carried missing or out-of-range fields
    Validation,
    /// Request referenced an unknown process
    Lookup,
    /// Internal bookkeeping is inconsistent
    InvariantViolation,
}

/// Scheduler errors with serialization support
///
/// Every variant is reported synchronously to the caller of a command; a
/// rejected command never mutates engine state.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SchedulerError {
    #[error("Process name must not be empty")]
    #[diagnostic(
        code(scheduler::empty_name),
        help("Give the process a non-blank name; names are used as lookup keys.")
    )]
    EmptyName,

    #[error("Process '{0}' already exists")]
    #[diagnostic(
        code(scheduler::duplicate_name),
        help("Process names must be unique within a simulation run.")
    )]
    DuplicateName(InlineString),

    #[error("Priority out of range: {0}")]
    #[diagnostic(
        code(scheduler::invalid_priority),
        help("Priority must be between 1 and 10.")
    )]
    InvalidPriority(u8),

    #[error("Invalid execution time: {0}ms")]
    #[diagnostic(
        code(scheduler::invalid_execution_time),
        help("Execution time must be greater than zero.")
    )]
    InvalidExecutionTime(u64),

    #[error("Invalid process type '{0}'")]
    #[diagnostic(
        code(scheduler::invalid_process_type),
        help("Use cpu, io, or interactive.")
    )]
    InvalidProcessType(InlineString),

    #[error("Invalid time quantum: {0}ms")]
    #[diagnostic(
        code(scheduler::invalid_quantum),
        help("The time quantum must be greater than zero.")
    )]
    InvalidQuantum(u64),

    #[error("Invalid speed multiplier: {0}")]
    #[diagnostic(
        code(scheduler::invalid_speed),
        help("Speed must be a finite number greater than zero.")
    )]
    InvalidSpeed(InlineString),

    #[error("Process '{0}' not found")]
    #[diagnostic(
        code(scheduler::process_not_found),
        help("Priority overrides address processes by the name they were admitted with.")
    )]
    ProcessNotFound(InlineString),

    #[error("Scheduler invariant violated: {0}")]
    #[diagnostic(
        code(scheduler::invariant_violation),
        help("This indicates a scheduler bug. Please report it with the transition log.")
    )]
    InvariantViolation(InlineString),
}

impl SchedulerError {
    /// Classify the error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ProcessNotFound(_) => ErrorKind::Lookup,
            Self::InvariantViolation(_) => ErrorKind::InvariantViolation,
            _ => ErrorKind::Validation,
        }
    }
}

/// Scheduler operation result
pub type SchedulerResult<T> = std::result::Result<T, SchedulerError>;

/// Top-level simulator error with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum SimulatorError {
    #[error("Scheduler error: {0}")]
    #[diagnostic(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(simulator::configuration_error),
        help("Invalid configuration. Review the config file and SIM_* environment variables.")
    )]
    Configuration(InlineString),

    #[error("I/O error: {0}")]
    #[diagnostic(
        code(simulator::io_error),
        help("Reading or writing a simulator file failed. Check the path and permissions.")
    )]
    Io(InlineString),

    #[error("JSON error: {0}")]
    #[diagnostic(
        code(simulator::json_error),
        help("The document is not valid simulator JSON.")
    )]
    Json(InlineString),

    #[error("Tick driver has stopped")]
    #[diagnostic(
        code(simulator::driver_stopped),
        help("The driver task exited or was shut down before the request completed.")
    )]
    DriverStopped,
}

impl From<std::io::Error> for SimulatorError {
    fn from(err: std::io::Error) -> Self {
        SimulatorError::Io(err.to_string().into())
    }
}

impl From<serde_json::Error> for SimulatorError {
    fn from(err: serde_json::Error) -> Self {
        SimulatorError::Json(err.to_string().into())
    }
}

/// Result type for simulator operations
pub type Result<T> = std::result::Result<T, SimulatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduler_error_serialization() {
        let error = SchedulerError::ProcessNotFound("P9".into());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("process_not_found"));
        let deserialized: SchedulerError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, deserialized);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(SchedulerError::InvalidPriority(11).kind(), ErrorKind::Validation);
        assert_eq!(SchedulerError::EmptyName.kind(), ErrorKind::Validation);
        assert_eq!(
            SchedulerError::ProcessNotFound("x".into()).kind(),
            ErrorKind::Lookup
        );
        assert_eq!(
            SchedulerError::InvariantViolation("two queues".into()).kind(),
            ErrorKind::InvariantViolation
        );
    }

    #[test]
    fn test_result_aliases_propagate() {
        fn lookup(name: &str) -> SchedulerResult<u8> {
            Err(SchedulerError::ProcessNotFound(name.into()))
        }
        fn run() -> Result<u8> {
            Ok(lookup("P1")?)
        }

        assert_eq!(lookup("P1"), Err(SchedulerError::ProcessNotFound("P1".into())));
        assert!(matches!(
            run(),
            Err(SimulatorError::Scheduler(SchedulerError::ProcessNotFound(_)))
        ));
    }

    #[test]
    fn test_simulator_error_display() {
        let error = SimulatorError::Configuration("speed is negative".into());
        assert_eq!(error.to_string(), "Configuration error: speed is negative");

        let error: SimulatorError = SchedulerError::InvalidQuantum(0).into();
        assert_eq!(
            error.to_string(),
            "Scheduler error: Invalid time quantum: 0ms"
        );
    }

    #[test]
    fn test_simulator_error_from_json() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: SimulatorError = err.into();
        assert!(matches!(error, SimulatorError::Json(_)));
    }
}
