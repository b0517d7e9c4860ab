//! YAML Configuration for the Growth Cycle Simulator
//!
//! This module handles loading run parameters (balance, period, active
//! weekdays and the gain/loss cycle) from YAML files.

use crate::calendar::{parse_date, ActiveWeekdays};
use crate::cycle::{build_cycle, Cycle, CycleRules, StartPreference};
use crate::error::InputError;
use crate::rates::RateInput;
use crate::simulation::{simulate, SimulationResult};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Balance, period and operating days
    pub simulation: SimulationConfig,
    /// Gain/loss cycle
    #[serde(default)]
    pub cycle: CycleConfig,
}

/// Simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Starting balance
    #[serde(default = "default_initial_balance")]
    pub initial_balance: f64,
    /// First day, dd/mm/yyyy or yyyy-mm-dd
    pub start_date: String,
    /// Last day (inclusive), same formats
    pub end_date: String,
    /// Weekday names or 0-6 indices (0 = Monday)
    #[serde(default = "default_active_weekdays")]
    pub active_weekdays: Vec<String>,
}

/// Cycle configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Gain per gain day, e.g. "10,00%" or 10.0
    #[serde(default = "default_gain_rate")]
    pub gain_rate: RateInput,
    /// Loss per loss day; sign depends on `loss_convention`
    #[serde(default = "default_loss_rate")]
    pub loss_rate: RateInput,
    #[serde(default = "default_gain_days")]
    pub gain_days: u32,
    #[serde(default = "default_loss_days")]
    pub loss_days: u32,
    #[serde(default)]
    pub starts_with: StartPreference,
    /// Rate bounds and loss-sign convention
    #[serde(flatten)]
    pub rules: CycleRules,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            gain_rate: default_gain_rate(),
            loss_rate: default_loss_rate(),
            gain_days: default_gain_days(),
            loss_days: default_loss_days(),
            starts_with: StartPreference::Gain,
            rules: CycleRules::default(),
        }
    }
}

impl CycleConfig {
    /// Validate rates and day counts and build the cycle
    pub fn build(&self) -> Result<Cycle, InputError> {
        build_cycle(
            self.gain_rate.to_rate()?,
            self.loss_rate.to_rate()?,
            self.gain_days,
            self.loss_days,
            self.starts_with,
            &self.rules,
        )
    }
}

/// Fully validated inputs, ready to simulate
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub initial_balance: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub active: ActiveWeekdays,
    pub cycle: Cycle,
}

impl RunPlan {
    pub fn run(&self) -> Result<SimulationResult, InputError> {
        simulate(
            self.initial_balance,
            self.start,
            self.end,
            &self.active,
            &self.cycle,
        )
    }
}

impl Config {
    /// Load and validate configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a YAML file without validating it, so callers can patch values
    /// before calling [`Config::plan`]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading config");
        let contents = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Default configuration: 30 days from `start`, Monday to Friday,
    /// two +10% days then one -5% day
    pub fn default_cycle(start: NaiveDate) -> Self {
        let end = start + Duration::days(30);
        Self {
            simulation: SimulationConfig {
                initial_balance: default_initial_balance(),
                start_date: start.format("%d/%m/%Y").to_string(),
                end_date: end.format("%d/%m/%Y").to_string(),
                active_weekdays: default_active_weekdays(),
            },
            cycle: CycleConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.plan().map(|_| ())
    }

    /// Resolve every input into a [`RunPlan`]
    pub fn plan(&self) -> Result<RunPlan, ConfigError> {
        let sim = &self.simulation;

        if !sim.initial_balance.is_finite() || sim.initial_balance < 0.0 {
            return Err(InputError::InvalidBalance(sim.initial_balance).into());
        }

        let start = parse_date(&sim.start_date)?;
        let end = parse_date(&sim.end_date)?;
        if start > end {
            return Err(InputError::InvalidDateRange { start, end }.into());
        }

        let active = ActiveWeekdays::from_names(sim.active_weekdays.as_slice())?;
        let cycle = self.cycle.build()?;

        Ok(RunPlan {
            initial_balance: sim.initial_balance,
            start,
            end,
            active,
            cycle,
        })
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Validation error: {0}")]
    Input(#[from] InputError),
}

// Default value functions
fn default_initial_balance() -> f64 {
    1000.0
}

fn default_active_weekdays() -> Vec<String> {
    ["mon", "tue", "wed", "thu", "fri"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_gain_rate() -> RateInput {
    RateInput::Text("10,00".to_string())
}

fn default_loss_rate() -> RateInput {
    RateInput::Text("5,00".to_string())
}

fn default_gain_days() -> u32 {
    2
}

fn default_loss_days() -> u32 {
    1
}
