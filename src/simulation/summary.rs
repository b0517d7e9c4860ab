//! Derived statistics over a finished simulation

use super::SimulationResult;
use crate::cycle::OperationKind;
use crate::ledger::Ledger;
use serde::{Deserialize, Serialize};

/// Headline numbers of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub initial_balance: f64,
    pub final_balance: f64,
    /// Absolute profit (negative for a loss)
    pub profit: f64,
    /// Total return in percent
    pub return_pct: f64,
    pub operations: usize,
    /// Geometric mean return per operation, in percent
    pub avg_return_per_operation_pct: f64,
    pub gains: usize,
    pub losses: usize,
    pub cycle_len: usize,
}

impl Summary {
    pub fn from_result(result: &SimulationResult) -> Self {
        let initial = result.initial_balance;
        let final_balance = result.final_balance();
        let operations = result.ledger.len();

        let growth = if initial > 0.0 {
            Some(final_balance / initial)
        } else {
            None
        };

        let return_pct = growth.map_or(0.0, |g| (g - 1.0) * 100.0);
        let avg_return_per_operation_pct = match growth {
            Some(g) if operations > 0 => (g.powf(1.0 / operations as f64) - 1.0) * 100.0,
            _ => 0.0,
        };

        Self {
            initial_balance: initial,
            final_balance,
            profit: final_balance - initial,
            return_pct,
            operations,
            avg_return_per_operation_pct,
            gains: result.ledger.count_by_kind(OperationKind::Gain),
            losses: result.ledger.count_by_kind(OperationKind::Loss),
            cycle_len: result.cycle_len,
        }
    }
}

/// Trailing run of same-kind operations at the end of the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub kind: OperationKind,
    pub length: usize,
}

impl Streak {
    pub fn trailing(ledger: &Ledger) -> Self {
        let Some(last) = ledger.last() else {
            return Self {
                kind: OperationKind::Neutral,
                length: 0,
            };
        };

        let length = ledger
            .entries()
            .iter()
            .rev()
            .take_while(|e| e.kind == last.kind)
            .count();

        Self {
            kind: last.kind,
            length,
        }
    }
}

/// Where the last operation sits inside the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleProgress {
    /// 1-based position of the last consumed slot
    pub position: usize,
    pub cycle_len: usize,
    /// `position / cycle_len` as a whole percent
    pub percent: u32,
    pub kind: OperationKind,
}

impl CycleProgress {
    pub fn of(ledger: &Ledger) -> Option<Self> {
        let last = ledger.last()?;
        let position = last.cycle_index + 1;
        let cycle_len = last.cycle_len.max(1);
        let percent = ((position as f64 / cycle_len as f64) * 100.0).round() as u32;

        Some(Self {
            position,
            cycle_len,
            percent,
            kind: last.kind,
        })
    }
}
