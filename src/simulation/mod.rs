//! Trajectory Simulator
//!
//! Walks the calendar from start to end (inclusive) and applies the next
//! cycle factor on each active weekday. Inactive days never move the cycle
//! cursor; the cursor wraps at the end of the cycle regardless of week
//! boundaries.

pub mod summary;

use crate::calendar::{ActiveWeekdays, DateRange};
use crate::cycle::{Cycle, OperationKind};
use crate::error::InputError;
use crate::ledger::{Ledger, LedgerEntry};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

pub use summary::{CycleProgress, Streak, Summary};

/// Whether any operation was applied
///
/// `NoOperations` is a valid result, not an input problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SimulationOutcome {
    Completed { operations: usize },
    NoOperations,
}

/// Ledger plus the inputs needed to summarise it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub initial_balance: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub cycle_len: usize,
    pub ledger: Ledger,
}

impl SimulationResult {
    /// Balance after the last operation, or the initial balance if none ran
    pub fn final_balance(&self) -> f64 {
        self.ledger
            .last()
            .map_or(self.initial_balance, |e| e.balance)
    }

    pub fn operations(&self) -> usize {
        self.ledger.len()
    }

    pub fn outcome(&self) -> SimulationOutcome {
        if self.ledger.is_empty() {
            SimulationOutcome::NoOperations
        } else {
            SimulationOutcome::Completed {
                operations: self.ledger.len(),
            }
        }
    }

    pub fn summary(&self) -> Summary {
        Summary::from_result(self)
    }

    pub fn streak(&self) -> Streak {
        Streak::trailing(&self.ledger)
    }

    pub fn progress(&self) -> Option<CycleProgress> {
        CycleProgress::of(&self.ledger)
    }
}

/// Run the simulation.
///
/// # Arguments
/// * `initial_balance` - Starting amount, finite and >= 0
/// * `start` / `end` - Inclusive date range, `start <= end`
/// * `active` - Weekdays that carry an operation (may be empty)
/// * `cycle` - Factors applied in order, repeating (may be empty)
///
/// An empty `active` set or empty `cycle` yields an empty ledger and leaves
/// the balance untouched.
pub fn simulate(
    initial_balance: f64,
    start: NaiveDate,
    end: NaiveDate,
    active: &ActiveWeekdays,
    cycle: &Cycle,
) -> Result<SimulationResult, InputError> {
    if !initial_balance.is_finite() || initial_balance < 0.0 {
        return Err(InputError::InvalidBalance(initial_balance));
    }
    if start > end {
        return Err(InputError::InvalidDateRange { start, end });
    }

    debug!(
        %start,
        %end,
        active_days = ?active.names(),
        cycle_len = cycle.len(),
        initial_balance,
        "starting simulation"
    );

    let runnable = !cycle.is_empty() && !active.is_empty();
    let mut ledger = if runnable {
        Ledger::with_capacity(active.active_days_between(start, end))
    } else {
        Ledger::new()
    };
    let mut balance = initial_balance;
    let mut cursor = 0usize;

    if runnable {
        for date in DateRange::new(start, end) {
            if !active.is_active(date) {
                continue;
            }
            let Some(factor) = cycle.get(cursor) else {
                break;
            };

            balance = factor.apply(balance);
            let variation_pct = factor.variation_pct();
            let entry = LedgerEntry {
                date,
                kind: OperationKind::from_variation(variation_pct),
                variation_pct,
                balance,
                factor: factor.value,
                cycle_index: cursor,
                cycle_len: cycle.len(),
            };
            trace!(%date, cursor, factor = factor.value, balance, "applied operation");

            ledger.append(entry);
            cursor = (cursor + 1) % cycle.len();
        }
    }

    let result = SimulationResult {
        initial_balance,
        start,
        end,
        cycle_len: cycle.len(),
        ledger,
    };

    match result.outcome() {
        SimulationOutcome::Completed { operations } => info!(
            operations,
            final_balance = result.final_balance(),
            "simulation finished"
        ),
        SimulationOutcome::NoOperations => info!("no operations in range"),
    }

    Ok(result)
}
