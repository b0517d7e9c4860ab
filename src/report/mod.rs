//! Text output for the command-line runner
//!
//! Money is printed as `R$ 1.234,56` and percentages as `12,34%`.

use crate::calendar::{format_date, DateRange};
use crate::cycle::OperationKind;
use crate::ledger::LedgerEntry;
use crate::simulation::{SimulationOutcome, SimulationResult};
use std::fmt::Write;

/// Format a number with `.` thousands and `,` decimals, two places.
/// Infinite values print as `∞`/`-∞` and NaN as `n/a`.
pub fn br_number(value: f64) -> String {
    if value.is_nan() {
        return "n/a".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    format!("{}{},{}", sign, grouped, frac_part)
}

pub fn br_money(value: f64) -> String {
    format!("R$ {}", br_number(value))
}

pub fn br_percent(value: f64) -> String {
    format!("{}%", br_number(value))
}

fn kind_label(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Gain => "Gain",
        OperationKind::Loss => "Loss",
        OperationKind::Neutral => "Neutral",
    }
}

fn entry_row(entry: &LedgerEntry) -> String {
    format!(
        "{:<12} {:<8} {:>10} {:>18}   {}/{}",
        format_date(entry.date),
        kind_label(entry.kind),
        br_percent(entry.variation_pct),
        br_money(entry.balance),
        entry.cycle_index + 1,
        entry.cycle_len,
    )
}

/// Ledger table. With `show_idle_days`, days without an operation are listed
/// as no-op rows carrying the current balance; the ledger itself is unchanged.
pub fn ledger_table(result: &SimulationResult, show_idle_days: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:<8} {:>10} {:>18}   {}",
        "Date", "Kind", "Change", "Balance", "Cycle"
    );

    if !show_idle_days {
        for entry in &result.ledger {
            let _ = writeln!(out, "{}", entry_row(entry));
        }
        return out;
    }

    let mut balance = result.initial_balance;
    for date in DateRange::new(result.start, result.end) {
        match result.ledger.on(date) {
            Some(entry) => {
                balance = entry.balance;
                let _ = writeln!(out, "{}", entry_row(entry));
            }
            None => {
                let _ = writeln!(
                    out,
                    "{:<12} {:<8} {:>10} {:>18}   -",
                    format_date(date),
                    "-",
                    br_percent(0.0),
                    br_money(balance),
                );
            }
        }
    }
    out
}

/// Final balance, profit, return, operation count, streak and cycle progress
pub fn summary_block(result: &SimulationResult) -> String {
    let summary = result.summary();
    let mut out = String::new();

    if result.outcome() == SimulationOutcome::NoOperations {
        let _ = writeln!(out, "No operations in the selected period and weekdays.");
    }
    if !summary.final_balance.is_finite() {
        let _ = writeln!(
            out,
            "Balance overflow: the balance exceeded the largest representable amount."
        );
    }

    let _ = writeln!(out, "Final balance:       {}", br_money(summary.final_balance));
    let _ = writeln!(out, "Profit / loss:       {}", br_money(summary.profit));
    let _ = writeln!(out, "Return:              {}", br_percent(summary.return_pct));
    let _ = writeln!(
        out,
        "Operations:          {} ({} gains, {} losses)",
        summary.operations, summary.gains, summary.losses
    );
    let _ = writeln!(
        out,
        "Avg per operation:   {}",
        br_percent(summary.avg_return_per_operation_pct)
    );

    let streak = result.streak();
    if streak.length > 0 && streak.kind != OperationKind::Neutral {
        let sign = if streak.kind == OperationKind::Gain { "+" } else { "-" };
        let _ = writeln!(
            out,
            "Streak:              {}{} {}",
            sign,
            streak.length,
            kind_label(streak.kind).to_lowercase()
        );
    }

    if let Some(progress) = result.progress() {
        let _ = writeln!(
            out,
            "Cycle progress:      {}/{} ({}%) {}",
            progress.position,
            progress.cycle_len,
            progress.percent,
            kind_label(progress.kind)
        );
    }
    out
}
