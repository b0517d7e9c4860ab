//! Input errors shared by the cycle builder, calendar and simulator.

use thiserror::Error;

/// Anything the caller has to fix before a simulation can run.
///
/// An empty ledger is not an error; see [`crate::simulation::SimulationOutcome`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// Rate text does not match `-?ddd,dd%`
    #[error("malformed rate '{0}': use the format '20,00%' or '-15,00%'")]
    MalformedRate(String),

    /// Rate parsed but falls outside the allowed bounds
    #[error("{kind} rate {value:.2}% out of range: must be {bounds}")]
    RateOutOfRange {
        kind: &'static str,
        value: f64,
        bounds: String,
    },

    /// Loss rate sign disagrees with the configured convention
    #[error("loss rate {value:.2}% has the wrong sign for the {convention} convention")]
    WrongLossSign {
        value: f64,
        convention: &'static str,
    },

    /// Both day counts are zero
    #[error("cycle needs at least one gain or loss day")]
    EmptyCycle,

    /// Date text is neither dd/mm/yyyy nor yyyy-mm-dd
    #[error("malformed date '{0}': use dd/mm/yyyy, e.g. 07/08/2025")]
    MalformedDate(String),

    /// Start date after end date
    #[error("start date {start} must be on or before end date {end}")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    /// Weekday index or name not recognised
    #[error("invalid weekday '{0}'")]
    InvalidWeekday(String),

    /// Initial balance negative or not finite
    #[error("initial balance must be a finite amount >= 0, got {0}")]
    InvalidBalance(f64),
}
