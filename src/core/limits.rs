/*!
 * Simulation Limits and Constants
 *
 * Centralized location for every fixed step, default and threshold used by
 * the scheduling engine and its tick driver. Grouped by domain.
 */

use std::time::Duration;

// =============================================================================
// LOGICAL TIME
// =============================================================================

/// Logical time added to the simulation clock by every tick
pub const TICK_MS: u64 = 100;

/// CPU time handed to the running process on every tick
pub const TIME_SLICE_MS: u64 = TICK_MS;

// =============================================================================
// PRIORITY POLICY
// =============================================================================

/// Lowest valid priority
pub const MIN_PRIORITY: u8 = 1;

/// Highest valid priority
pub const MAX_PRIORITY: u8 = 10;

/// Default preemption threshold (ms of contiguous CPU)
pub const DEFAULT_TIME_QUANTUM: u64 = 500;

/// Default aging factor
pub const DEFAULT_AGING_FACTOR: u32 = 5;

/// Wait window over which `aging_factor` priority points are earned
pub const AGING_WINDOW_MS: u64 = 1000;

/// CPU-bound processes past this much CPU time start losing priority
pub const CPU_PENALTY_THRESHOLD_MS: u64 = 2000;

/// One penalty point per this much consumed CPU time
pub const CPU_PENALTY_UNIT_MS: u64 = 1000;

// =============================================================================
// I/O MODEL
// =============================================================================

/// One I/O burst per this much execution time (at least one burst)
pub const IO_OPERATION_SPAN_MS: u64 = 1000;

/// Shortest simulated I/O wait
pub const DEFAULT_IO_WAIT_MIN: u64 = 500;

/// Longest simulated I/O wait (inclusive)
pub const DEFAULT_IO_WAIT_MAX: u64 = 999;

// =============================================================================
// OBSERVABILITY
// =============================================================================

/// Number of state transitions retained by the transition log
pub const TRANSITION_LOG_CAPACITY: usize = 50;

// =============================================================================
// TICK DRIVER
// =============================================================================

/// Wall-clock period between ticks at speed 1.0
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Default speed multiplier
pub const DEFAULT_SPEED: f64 = 1.0;

/// Upper bound on ticks executed by a headless run
pub const MAX_HEADLESS_TICKS: u64 = 1_000_000;
