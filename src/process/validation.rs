/*!
 * Process Admission Validation
 * Field checks applied before a process is admitted or re-prioritized
 */

use crate::core::errors::{SchedulerError, SchedulerResult};
use crate::core::limits::{MAX_PRIORITY, MIN_PRIORITY};
use crate::core::types::{Priority, SimTime};

/// Validate a process name
///
/// Blank names are rejected; any other name is kept exactly as given, since it
/// is the lookup key for later overrides.
pub fn validate_name(name: &str) -> SchedulerResult<&str> {
    if name.trim().is_empty() {
        return Err(SchedulerError::EmptyName);
    }
    Ok(name)
}

/// Validate priority value
///
/// # Performance
/// Hot path - called on every priority change operation
#[inline(always)]
pub fn validate_priority(priority: Priority) -> SchedulerResult<Priority> {
    if (MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
        Ok(priority)
    } else {
        Err(SchedulerError::InvalidPriority(priority))
    }
}

/// Validate total execution time
pub fn validate_execution_time(execution_time: SimTime) -> SchedulerResult<SimTime> {
    if execution_time == 0 {
        return Err(SchedulerError::InvalidExecutionTime(execution_time));
    }
    Ok(execution_time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_validation() {
        assert_eq!(validate_name("  P1 ").unwrap(), "  P1 ");
        assert_eq!(validate_name(""), Err(SchedulerError::EmptyName));
        assert_eq!(validate_name("   "), Err(SchedulerError::EmptyName));
    }

    #[test]
    fn test_priority_bounds() {
        assert!(validate_priority(0).is_err());
        assert_eq!(validate_priority(1).unwrap(), 1);
        assert_eq!(validate_priority(10).unwrap(), 10);
        assert_eq!(
            validate_priority(11),
            Err(SchedulerError::InvalidPriority(11))
        );
    }

    #[test]
    fn test_execution_time_validation() {
        assert!(validate_execution_time(0).is_err());
        assert_eq!(validate_execution_time(1).unwrap(), 1);
    }
}
