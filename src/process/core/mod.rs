/*!
 * Process Core Types
 * Fundamental types for simulated processes
 */

pub mod types;

// Re-export everything for convenience
pub use types::*;
