/*!
 * Scheduler Simulator - Main Entry Point
 *
 * Loads a configuration and workload, drives the scheduling engine until every
 * process has completed, and prints a JSON report with metrics, final process
 * states and the transition feed.
 */

use aging_scheduler::core::limits::MAX_HEADLESS_TICKS;
use aging_scheduler::{
    init_tracing, DriverStatus, Metrics, ProcessSnapshot, Result, SchedulerEngine,
    SimulationConfig, TickDriver, TransitionEntry,
};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// scheduler-sim: dynamic-priority scheduler simulator
///
/// Processes age while they wait in the ready queue, lose the CPU when their
/// time quantum expires, and leave it for simulated I/O bursts. Every tick
/// advances logical time by 100ms.
#[derive(Debug, Parser)]
#[command(name = "scheduler-sim", version)]
struct Opts {
    /// JSON configuration file with engine settings and a workload.
    /// A built-in demo workload is used when omitted.
    config: Option<PathBuf>,

    /// Tick as fast as possible instead of pacing ticks on the wall clock.
    #[arg(long)]
    headless: bool,

    /// Upper bound on ticks in headless mode.
    #[arg(long, env = "SIM_MAX_TICKS", default_value_t = MAX_HEADLESS_TICKS)]
    max_ticks: u64,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,
}

/// Final report written to stdout
#[derive(Debug, Serialize)]
struct SimulationReport {
    metrics: Metrics,
    processes: Vec<ProcessSnapshot>,
    /// Most recent first
    transitions: Vec<TransitionEntry>,
}

impl SimulationReport {
    fn from_engine(engine: &SchedulerEngine) -> Self {
        Self {
            metrics: engine.metrics(),
            processes: engine.process_list(),
            transitions: engine.transition_feed(),
        }
    }
}

fn load_config(opts: &Opts) -> Result<SimulationConfig> {
    let mut config = match &opts.config {
        Some(path) => SimulationConfig::from_file(path)?,
        None => {
            info!("No configuration given, using the demo workload");
            SimulationConfig::demo()
        }
    };
    config.apply_env_overrides()?;
    config.validate()?;
    Ok(config)
}

fn run_headless(config: &SimulationConfig, max_ticks: u64) -> Result<SimulationReport> {
    let mut engine = config.build_engine()?;
    let mut ticks = 0;

    while ticks < max_ticks {
        ticks += 1;
        if engine.advance_tick().is_complete() {
            break;
        }
    }
    if !engine.is_run_complete() {
        warn!(ticks, "Tick limit reached before every process completed");
    }

    info!(ticks, time = engine.current_time(), "Headless run finished");
    Ok(SimulationReport::from_engine(&engine))
}

async fn run_paced(config: &SimulationConfig) -> Result<SimulationReport> {
    let driver = TickDriver::from_config(config)?;
    driver.start()?;

    tokio::select! {
        state = driver.wait_for(DriverStatus::Completed) => {
            let state = state?;
            info!(ticks = state.ticks, "Paced run finished");
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, pausing the simulation");
            driver.pause()?;
            driver.wait_for(DriverStatus::Paused).await?;
        }
    }

    let report = {
        let engine = driver.engine();
        let engine = engine.lock();
        SimulationReport::from_engine(&engine)
    };
    driver.shutdown().await;
    Ok(report)
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    init_tracing();
    let opts = Opts::parse();

    let config = load_config(&opts)?;
    if config.workload.is_empty() {
        warn!("Workload is empty; the run will not complete on its own");
    }

    info!(
        processes = config.workload.len(),
        time_quantum = config.time_quantum,
        aging_factor = config.aging_factor,
        speed = config.speed,
        headless = opts.headless,
        "Scheduler simulator starting"
    );

    let report = if opts.headless {
        run_headless(&config, opts.max_ticks)?
    } else {
        run_paced(&config).await?
    };

    let json = if opts.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .map_err(aging_scheduler::SimulatorError::from)?;
    println!("{}", json);

    Ok(())
}
