//! Growth Cycle Simulator
//!
//! Applies a repeating cycle of percentage gains and losses to a balance on
//! selected weekdays over a date range, and records every applied operation.
//!
//! - `rates` - comma-decimal percentage parsing and range checks
//! - `cycle` - block cycle construction
//! - `calendar` - active weekdays, date parsing, inclusive day walk
//! - `simulation` - the day-stepping simulator and its summary
//! - `ledger` - append-only record of applied operations
//! - `config` - YAML run files
//! - `report` - text output for the CLI

pub mod calendar;
pub mod config;
pub mod cycle;
pub mod error;
pub mod ledger;
pub mod rates;
pub mod report;
pub mod simulation;

pub use calendar::ActiveWeekdays;
pub use config::{Config, ConfigError, RunPlan};
pub use cycle::{
    build_cycle, build_cycle_from_text, Cycle, CycleRules, Factor, OperationKind, StartPreference,
};
pub use error::InputError;
pub use ledger::{Ledger, LedgerEntry};
pub use rates::{LossConvention, PercentageRate, RateInput, RateLimits};
pub use simulation::{simulate, SimulationOutcome, SimulationResult, Summary};
