/*!
 * Process Priority Policy
 * Aging credit, type bonus and CPU penalty for dynamic priorities
 */

use super::core::types::ProcessType;
use crate::core::limits::{
    AGING_WINDOW_MS, CPU_PENALTY_THRESHOLD_MS, CPU_PENALTY_UNIT_MS, MAX_PRIORITY, MIN_PRIORITY,
};
use crate::core::types::{AgingFactor, Priority, SimTime};

/// Priority points earned after waiting `wait` ms
///
/// Equivalent to `floor(wait / (1000 / aging_factor))` evaluated exactly;
/// an aging factor of zero disables aging.
#[inline]
pub fn aging_credit(wait: SimTime, aging_factor: AgingFactor) -> i64 {
    let credit = u128::from(wait) * u128::from(aging_factor) / u128::from(AGING_WINDOW_MS);
    i64::try_from(credit).unwrap_or(i64::MAX)
}

/// Priority points lost by a CPU-bound process after heavy CPU use
#[inline]
pub fn cpu_penalty(kind: ProcessType, total_cpu_time: SimTime) -> i64 {
    if kind.penalized_for_cpu() && total_cpu_time > CPU_PENALTY_THRESHOLD_MS {
        (total_cpu_time / CPU_PENALTY_UNIT_MS) as i64
    } else {
        0
    }
}

/// Clamp an arbitrary priority score into `[MIN_PRIORITY, MAX_PRIORITY]`
#[inline(always)]
pub fn clamp_priority(score: i64) -> Priority {
    score.clamp(i64::from(MIN_PRIORITY), i64::from(MAX_PRIORITY)) as Priority
}

/// Dynamic priority of a ready process
pub fn dynamic_priority(
    original: Priority,
    kind: ProcessType,
    wait: SimTime,
    total_cpu_time: SimTime,
    aging_factor: AgingFactor,
) -> Priority {
    let change = aging_credit(wait, aging_factor)
        .saturating_add(kind.aging_bonus())
        .saturating_sub(cpu_penalty(kind, total_cpu_time));
    clamp_priority(i64::from(original).saturating_add(change))
}
