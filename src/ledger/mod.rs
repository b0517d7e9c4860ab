//! Operation Ledger
//!
//! Every applied operation is recorded as an immutable entry.
//! The balance trajectory is read back from the entries in order.

use crate::cycle::OperationKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One applied operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub kind: OperationKind,
    /// Percent change applied on this day, e.g. 20.0 or -15.0
    pub variation_pct: f64,
    /// Balance after the operation
    pub balance: f64,
    pub factor: f64,
    /// Cycle slot consumed (0-based)
    pub cycle_index: usize,
    pub cycle_len: usize,
}

/// Append-only, chronological list of ledger entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Append an entry to the ledger
    pub fn append(&mut self, entry: LedgerEntry) {
        debug_assert!(
            self.entries.last().map_or(true, |last| last.date < entry.date),
            "ledger entries must be strictly chronological"
        );
        self.entries.push(entry);
    }

    /// All entries in order
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LedgerEntry> {
        self.entries.last()
    }

    /// Entry recorded on `date`, if any
    pub fn on(&self, date: NaiveDate) -> Option<&LedgerEntry> {
        self.entries
            .binary_search_by_key(&date, |e| e.date)
            .ok()
            .map(|i| &self.entries[i])
    }

    /// Balance after each operation
    pub fn balances(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.balance).collect()
    }

    pub fn count_by_kind(&self, kind: OperationKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LedgerEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a LedgerEntry;
    type IntoIter = std::slice::Iter<'a, LedgerEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
