/*!
 * Structured Tracing
 * Subscriber setup and spans for ticks and driver runs
 *
 * Features:
 * - RUST_LOG filtering with an `info` default
 * - JSON output for log shipping, compact output for terminals
 * - Everything on stderr so stdout stays free for reports
 * - Per-tick spans carrying the simulation time
 * - Run spans recording tick count and wall-clock duration on close
 */

use crate::core::types::SimTime;
use std::time::Instant;
use tracing::{debug, info, span, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Environment variable toggling JSON output
pub const TRACE_JSON_ENV: &str = "SIM_TRACE_JSON";

fn json_requested() -> bool {
    std::env::var(TRACE_JSON_ENV)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false)
}

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - SIM_TRACE_JSON: Enable JSON output (default: false)
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if json_requested() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_span_events(FmtSpan::NONE)
                    .compact(),
            )
            .try_init()
    };

    if installed.is_ok() {
        info!(json = json_requested(), "Structured tracing initialized");
    }
}

/// Trace-level span wrapping a single tick
#[inline]
pub fn span_tick(time: SimTime) -> Span {
    span!(Level::TRACE, "tick", time)
}

/// Span covering one continuous driver run, from start to pause or completion
pub struct RunSpan {
    span: Span,
    start: Instant,
    ticks: u64,
}

impl RunSpan {
    pub fn new(speed: f64) -> Self {
        let span = span!(
            Level::DEBUG,
            "simulation_run",
            speed,
            ticks = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );
        span.in_scope(|| debug!(speed, "Run started"));

        Self {
            span,
            start: Instant::now(),
            ticks: 0,
        }
    }

    #[inline]
    pub fn record_tick(&mut self) {
        self.ticks += 1;
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Close the run with an outcome label such as `paused` or `completed`
    pub fn finish(self, outcome: &'static str) {
        self.span.record("outcome", outcome);
    }
}

impl Drop for RunSpan {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        self.span.record("ticks", self.ticks);
        self.span.record("duration_ms", elapsed.as_millis() as u64);
        self.span
            .in_scope(|| debug!(ticks = self.ticks, elapsed_ms = elapsed.as_millis() as u64, "Run ended"));
    }
}

/// Helper to create a run span
#[inline]
pub fn span_run(speed: f64) -> RunSpan {
    RunSpan::new(speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_test_tracing() {
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::new("trace"))
            .with(tracing_subscriber::fmt::layer().compact().with_test_writer())
            .try_init();
    }

    #[test]
    fn test_run_span_counts_ticks() {
        init_test_tracing();

        let mut run = span_run(2.0);
        for _ in 0..3 {
            run.record_tick();
        }
        assert_eq!(run.ticks(), 3);
        run.finish("paused");
    }

    #[test]
    fn test_tick_span_nests_under_run() {
        init_test_tracing();

        let run = span_run(1.0);
        let _run_guard = run.span().enter();
        let tick = span_tick(100);
        let _tick_guard = tick.enter();
        debug!("inside tick");
    }

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing();
        init_tracing();
    }
}
