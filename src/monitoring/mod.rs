/*!
 * Monitoring
 * Tracing subscriber setup and simulation spans
 */

mod tracer;

pub use tracer::{init_tracing, span_run, span_tick, RunSpan, TRACE_JSON_ENV};
