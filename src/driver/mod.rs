/*!
 * Tick Driver
 *
 * Background task that advances the scheduling engine at a paced wall-clock
 * cadence. Logical time is owned by the engine; the driver only decides when
 * the next tick happens. Stops on its own once every process has completed.
 */

mod pacing;

pub use pacing::{period_for, Pacer, MAX_TICK_PERIOD};

use crate::core::config::SimulationConfig;
use crate::core::errors::{Result, SchedulerError, SchedulerResult, SimulatorError};
use crate::core::limits::{DEFAULT_SPEED, DEFAULT_TICK_INTERVAL};
use crate::core::types::{AgingFactor, Priority, ProcessId, SimTime};
use crate::monitoring::{span_run, RunSpan};
use crate::process::ProcessType;
use crate::scheduler::{EngineSnapshot, Metrics, SchedulerEngine};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Notify};
use tracing::{info, warn};

/// Control messages for the driver task
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriverCommand {
    /// Begin or resume ticking
    Start,
    /// Stop ticking; engine state is kept
    Pause,
    /// Pause, clear the engine and restore speed 1
    Reset,
    /// Change the speed multiplier
    SetSpeed(f64),
    /// Exit the driver task
    Shutdown,
}

/// Lifecycle of the driver task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    /// Never started, or reset
    Idle,
    Running,
    Paused,
    /// Ticking stopped because every process completed
    Completed,
    /// The task has exited
    Stopped,
}

/// Observable driver state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriverState {
    pub status: DriverStatus,
    pub speed: f64,
    /// Ticks executed by the driver since spawn or the last reset
    pub ticks: u64,
}

/// State shared between the handle and the task
struct Shared {
    state: RwLock<DriverState>,
    changed: Notify,
}

impl Shared {
    fn update(&self, f: impl FnOnce(&mut DriverState)) {
        f(&mut self.state.write());
        self.changed.notify_waiters();
    }
}

/// Validate a speed multiplier
pub fn validate_speed(speed: f64) -> SchedulerResult<f64> {
    if speed.is_finite() && speed > 0.0 {
        Ok(speed)
    } else {
        Err(SchedulerError::InvalidSpeed(speed.to_string().into()))
    }
}

/// Handle to the driver task
///
/// Engine reads and mutations from the handle take the same lock as ticks, so
/// they never observe a half-applied tick.
pub struct TickDriver {
    engine: Arc<Mutex<SchedulerEngine>>,
    shared: Arc<Shared>,
    command_tx: mpsc::UnboundedSender<DriverCommand>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TickDriver {
    /// Spawn a driver with the default 500ms base interval
    pub fn spawn(engine: SchedulerEngine) -> Self {
        Self::spawn_with_interval(engine, DEFAULT_TICK_INTERVAL, DEFAULT_SPEED)
    }

    /// Spawn a driver; `speed` must already be valid
    pub fn spawn_with_interval(engine: SchedulerEngine, tick_interval: Duration, speed: f64) -> Self {
        let engine = Arc::new(Mutex::new(engine));
        let shared = Arc::new(Shared {
            state: RwLock::new(DriverState {
                status: DriverStatus::Idle,
                speed,
                ticks: 0,
            }),
            changed: Notify::new(),
        });
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(run_driver_loop(
            engine.clone(),
            shared.clone(),
            tick_interval,
            command_rx,
        ));

        info!(
            interval_ms = tick_interval.as_millis() as u64,
            speed,
            "Tick driver spawned"
        );

        Self {
            engine,
            shared,
            command_tx,
            handle: Some(handle),
        }
    }

    /// Build the engine and driver described by a configuration
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        let engine = config.build_engine()?;
        Ok(Self::spawn_with_interval(
            engine,
            config.tick_interval(),
            config.speed,
        ))
    }

    fn send(&self, command: DriverCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| SimulatorError::DriverStopped)
    }

    pub fn start(&self) -> Result<()> {
        self.send(DriverCommand::Start)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(DriverCommand::Pause)
    }

    pub fn reset(&self) -> Result<()> {
        self.send(DriverCommand::Reset)
    }

    /// Change the speed multiplier; logical time per tick is unaffected
    pub fn set_speed(&self, speed: f64) -> Result<()> {
        let speed = validate_speed(speed)?;
        self.send(DriverCommand::SetSpeed(speed))
    }

    pub fn state(&self) -> DriverState {
        *self.shared.state.read()
    }

    #[inline]
    pub fn status(&self) -> DriverStatus {
        self.state().status
    }

    /// Wait until the driver reaches `status`
    ///
    /// Fails if the task stops first.
    pub async fn wait_for(&self, status: DriverStatus) -> Result<DriverState> {
        loop {
            let notified = self.shared.changed.notified();
            let state = self.state();
            if state.status == status {
                return Ok(state);
            }
            if state.status == DriverStatus::Stopped {
                return Err(SimulatorError::DriverStopped);
            }
            notified.await;
        }
    }

    /// Shared engine, for callers that need more than the convenience methods
    pub fn engine(&self) -> Arc<Mutex<SchedulerEngine>> {
        self.engine.clone()
    }

    pub fn admit(
        &self,
        name: &str,
        kind: ProcessType,
        priority: Priority,
        execution_time: SimTime,
    ) -> SchedulerResult<ProcessId> {
        self.engine.lock().admit(name, kind, priority, execution_time)
    }

    pub fn set_priority(&self, name: &str, priority: Priority) -> SchedulerResult<()> {
        self.engine.lock().set_priority(name, priority)
    }

    pub fn set_priorities<I, S>(&self, names: I, priority: Priority) -> SchedulerResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.engine.lock().set_priorities(names, priority)
    }

    pub fn set_time_quantum(&self, quantum: SimTime) -> SchedulerResult<()> {
        self.engine.lock().set_time_quantum(quantum)
    }

    pub fn set_aging_factor(&self, factor: AgingFactor) {
        self.engine.lock().set_aging_factor(factor)
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        self.engine.lock().snapshot()
    }

    pub fn metrics(&self) -> Metrics {
        self.engine.lock().metrics()
    }

    /// Shutdown the driver task gracefully
    pub async fn shutdown(mut self) {
        let _ = self.command_tx.send(DriverCommand::Shutdown);

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Tick driver shutdown error");
            } else {
                info!("Tick driver shutdown complete");
            }
        }
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if self.command_tx.send(DriverCommand::Shutdown).is_err() {
                handle.abort();
            }
        }
    }
}

/// Driver loop: ticks while running, handles commands in between
async fn run_driver_loop(
    engine: Arc<Mutex<SchedulerEngine>>,
    shared: Arc<Shared>,
    base_interval: Duration,
    mut command_rx: mpsc::UnboundedReceiver<DriverCommand>,
) {
    let mut speed = shared.state.read().speed;
    let mut pacer = Pacer::new(base_interval, speed);
    let mut run: Option<RunSpan> = None;

    info!(period_ms = pacer.period().as_millis() as u64, "Tick driver loop started");

    loop {
        let running = run.is_some();
        let deadline = pacer.next_deadline();

        tokio::select! {
            _ = tokio::time::sleep_until(deadline), if running => {
                pacer.advance_to(deadline);
                let outcome = {
                    let mut engine = engine.lock();
                    match run.as_ref() {
                        Some(active) => active.span().in_scope(|| engine.advance_tick()),
                        None => engine.advance_tick(),
                    }
                };
                if let Some(active) = run.as_mut() {
                    active.record_tick();
                }

                if outcome.is_complete() {
                    if let Some(active) = run.take() {
                        active.finish("completed");
                    }
                    info!("Run complete, tick driver stopped");
                    shared.update(|s| {
                        s.ticks += 1;
                        s.status = DriverStatus::Completed;
                    });
                } else {
                    shared.update(|s| s.ticks += 1);
                }
            }

            command = command_rx.recv() => {
                let Some(command) = command else {
                    break;
                };
                match command {
                    DriverCommand::Start => {
                        if run.is_some() {
                            continue;
                        }
                        if engine.lock().is_run_complete() {
                            info!("Start ignored, every process has completed");
                            shared.update(|s| s.status = DriverStatus::Completed);
                            continue;
                        }
                        pacer.restart();
                        run = Some(span_run(speed));
                        info!(speed, "Tick driver started");
                        shared.update(|s| s.status = DriverStatus::Running);
                    }

                    DriverCommand::Pause => {
                        if let Some(active) = run.take() {
                            active.finish("paused");
                            info!("Tick driver paused");
                            shared.update(|s| s.status = DriverStatus::Paused);
                        }
                    }

                    DriverCommand::Reset => {
                        if let Some(active) = run.take() {
                            active.finish("reset");
                        }
                        engine.lock().reset();
                        speed = DEFAULT_SPEED;
                        pacer.set_speed(speed);
                        shared.update(|s| {
                            *s = DriverState {
                                status: DriverStatus::Idle,
                                speed,
                                ticks: 0,
                            }
                        });
                    }

                    DriverCommand::SetSpeed(new_speed) => {
                        speed = new_speed;
                        pacer.set_speed(speed);
                        info!(speed, period_ms = pacer.period().as_millis() as u64, "Tick speed updated");
                        shared.update(|s| s.speed = speed);
                    }

                    DriverCommand::Shutdown => {
                        info!("Tick driver shutting down");
                        break;
                    }
                }
            }
        }
    }

    if let Some(active) = run.take() {
        active.finish("shutdown");
    }
    shared.update(|s| s.status = DriverStatus::Stopped);
}
