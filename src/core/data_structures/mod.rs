/*!
 * Data Structures
 *
 * Specialized data structures shared across the simulator:
 * - Inline strings for process names and transition labels
 *
 * # Performance
 *
 * - Inline strings: Avoids heap allocation for strings ≤23 bytes, which
 *   covers nearly every process name and every state label
 */

mod inline_string;

pub use inline_string::InlineString;
