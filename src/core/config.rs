/*!
 * Simulation Configuration
 * JSON file loading, SIM_* environment overrides and validation
 */

use super::data_structures::InlineString;
use super::errors::{Result, SchedulerError, SimulatorError};
use super::limits::{
    DEFAULT_AGING_FACTOR, DEFAULT_IO_WAIT_MAX, DEFAULT_IO_WAIT_MIN, DEFAULT_SPEED,
    DEFAULT_TICK_INTERVAL, DEFAULT_TIME_QUANTUM, TRANSITION_LOG_CAPACITY,
};
use super::types::{AgingFactor, Priority, SimTime};
use crate::process::ProcessType;
use crate::scheduler::{EngineConfig, SchedulerEngine, TieBreak};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// One process of a preset workload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub name: InlineString,
    #[serde(rename = "type")]
    pub kind: ProcessType,
    pub priority: Priority,
    pub execution_time: SimTime,
}

impl ProcessSpec {
    pub fn new(name: &str, kind: ProcessType, priority: Priority, execution_time: SimTime) -> Self {
        Self {
            name: name.into(),
            kind,
            priority,
            execution_time,
        }
    }
}

/// Full simulator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub time_quantum: SimTime,
    pub aging_factor: AgingFactor,
    /// Wall-clock milliseconds between ticks at speed 1.0
    pub tick_interval_ms: u64,
    pub speed: f64,
    /// Seed for I/O wait durations; OS entropy when absent
    pub seed: Option<u64>,
    pub io_wait_min: SimTime,
    pub io_wait_max: SimTime,
    pub transition_log_capacity: usize,
    pub close_running_interval: bool,
    pub tie_break: TieBreak,
    pub workload: Vec<ProcessSpec>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_quantum: DEFAULT_TIME_QUANTUM,
            aging_factor: DEFAULT_AGING_FACTOR,
            tick_interval_ms: DEFAULT_TICK_INTERVAL.as_millis() as u64,
            speed: DEFAULT_SPEED,
            seed: None,
            io_wait_min: DEFAULT_IO_WAIT_MIN,
            io_wait_max: DEFAULT_IO_WAIT_MAX,
            transition_log_capacity: TRANSITION_LOG_CAPACITY,
            close_running_interval: true,
            tie_break: TieBreak::default(),
            workload: Vec::new(),
        }
    }
}

fn parse_env<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| {
        SimulatorError::Configuration(format!("{} has unparsable value '{}'", key, raw).into())
    })
}

impl SimulationConfig {
    /// Default settings with a small mixed workload
    pub fn demo() -> Self {
        Self {
            workload: vec![
                ProcessSpec::new("compiler", ProcessType::Cpu, 4, 2500),
                ProcessSpec::new("backup", ProcessType::Io, 6, 3000),
                ProcessSpec::new("editor", ProcessType::Interactive, 3, 1200),
                ProcessSpec::new("indexer", ProcessType::Cpu, 2, 1500),
            ],
            ..Self::default()
        }
    }

    /// Load a JSON configuration file; omitted fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        info!(path = %path.display(), processes = config.workload.len(), "Configuration loaded");
        Ok(config)
    }

    /// Apply `SIM_*` overrides from the process environment
    ///
    /// Recognized: SIM_TIME_QUANTUM, SIM_AGING_FACTOR, SIM_SPEED, SIM_SEED,
    /// SIM_TICK_INTERVAL_MS.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("SIM_TIME_QUANTUM") {
            self.time_quantum = parse_env("SIM_TIME_QUANTUM", &raw)?;
        }
        if let Some(raw) = lookup("SIM_AGING_FACTOR") {
            self.aging_factor = parse_env("SIM_AGING_FACTOR", &raw)?;
        }
        if let Some(raw) = lookup("SIM_SPEED") {
            self.speed = parse_env("SIM_SPEED", &raw)?;
        }
        if let Some(raw) = lookup("SIM_SEED") {
            self.seed = Some(parse_env("SIM_SEED", &raw)?);
        }
        if let Some(raw) = lookup("SIM_TICK_INTERVAL_MS") {
            self.tick_interval_ms = parse_env("SIM_TICK_INTERVAL_MS", &raw)?;
        }
        debug!(
            seed = ?self.seed,
            time_quantum = self.time_quantum,
            aging_factor = self.aging_factor,
            speed = self.speed,
            "Environment overrides applied"
        );
        Ok(())
    }

    /// Reject settings the engine or driver cannot run with
    ///
    /// Workload entries are validated on admission instead.
    pub fn validate(&self) -> Result<()> {
        if self.time_quantum == 0 {
            return Err(SchedulerError::InvalidQuantum(self.time_quantum).into());
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(SchedulerError::InvalidSpeed(self.speed.to_string().into()).into());
        }
        if self.tick_interval_ms == 0 {
            return Err(SimulatorError::Configuration(
                "tick_interval_ms must be greater than zero".into(),
            ));
        }
        if self.io_wait_min > self.io_wait_max {
            return Err(SimulatorError::Configuration(
                format!(
                    "io_wait_min ({}) exceeds io_wait_max ({})",
                    self.io_wait_min, self.io_wait_max
                )
                .into(),
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            time_quantum: self.time_quantum,
            aging_factor: self.aging_factor,
            tie_break: self.tie_break,
            close_running_interval: self.close_running_interval,
        }
    }

    /// Build an engine and admit the workload
    pub fn build_engine(&self) -> Result<SchedulerEngine> {
        self.validate()?;
        let mut builder = SchedulerEngine::builder()
            .with_config(self.engine_config())
            .with_io_wait_range(self.io_wait_min, self.io_wait_max)
            .with_transition_capacity(self.transition_log_capacity);
        if let Some(seed) = self.seed {
            builder = builder.with_seed(seed);
        }

        let mut engine = builder.build();
        for spec in &self.workload {
            engine.admit_spec(spec)?;
        }
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.time_quantum, 500);
        assert_eq!(config.aging_factor, 5);
        assert_eq!(config.tick_interval(), Duration::from_millis(500));
        assert_eq!(config.speed, 1.0);
        assert!(config.workload.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "time_quantum": 300,
                "seed": 7,
                "workload": [
                    {{"name": "P1", "type": "cpu", "priority": 5, "execution_time": 300}},
                    {{"name": "P2", "type": "io-bound", "priority": 3, "execution_time": 2000}}
                ]
            }}"#
        )
        .unwrap();

        let config = SimulationConfig::from_file(file.path()).unwrap();
        assert_eq!(config.time_quantum, 300);
        assert_eq!(config.aging_factor, 5);
        assert_eq!(config.seed, Some(7));
        assert_eq!(
            config.workload,
            vec![
                ProcessSpec::new("P1", ProcessType::Cpu, 5, 300),
                ProcessSpec::new("P2", ProcessType::Io, 3, 2000),
            ]
        );
    }

    #[test]
    fn test_from_file_errors() {
        let missing = SimulationConfig::from_file("/nonexistent/sim.json");
        assert!(matches!(missing, Err(SimulatorError::Io(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let broken = SimulationConfig::from_file(file.path());
        assert!(matches!(broken, Err(SimulatorError::Json(_))));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SIM_TIME_QUANTUM", "200"),
            ("SIM_SPEED", "2.5"),
            ("SIM_SEED", "99"),
        ]
        .into_iter()
        .collect();

        let mut config = SimulationConfig::default();
        config
            .apply_overrides_from(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.time_quantum, 200);
        assert_eq!(config.speed, 2.5);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.aging_factor, 5);
    }

    #[test]
    fn test_unparsable_override() {
        let mut config = SimulationConfig::default();
        let result = config.apply_overrides_from(|key| {
            (key == "SIM_AGING_FACTOR").then(|| "fast".to_string())
        });
        assert!(matches!(result, Err(SimulatorError::Configuration(_))));
    }

    #[test]
    fn test_validation() {
        let config = SimulationConfig {
            time_quantum: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimulatorError::Scheduler(SchedulerError::InvalidQuantum(0)))
        ));

        for speed in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = SimulationConfig {
                speed,
                ..SimulationConfig::default()
            };
            assert!(config.validate().is_err(), "speed {} accepted", speed);
        }

        let config = SimulationConfig {
            io_wait_min: 900,
            io_wait_max: 100,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimulatorError::Configuration(_))
        ));
    }

    #[test]
    fn test_build_engine_admits_workload() {
        let config = SimulationConfig {
            seed: Some(1),
            ..SimulationConfig::demo()
        };
        let engine = config.build_engine().unwrap();
        assert_eq!(engine.len(), 4);
        assert_eq!(engine.ready_queue().count(), 4);
    }

    #[test]
    fn test_build_engine_rejects_bad_workload() {
        let config = SimulationConfig {
            workload: vec![ProcessSpec::new("P1", ProcessType::Cpu, 12, 100)],
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.build_engine(),
            Err(SimulatorError::Scheduler(SchedulerError::InvalidPriority(12)))
        ));
    }
}
