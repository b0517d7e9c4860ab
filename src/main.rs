//! Growth Cycle Simulator - command-line runner
//!
//! Loads a YAML run file (or the built-in default), applies any flag
//! overrides, runs the simulation and prints the ledger and summary.
//!
//! Usage:
//!   cargo run -- config/gain_loss_cycle.yaml
//!   cargo run -- --start 07/08/2025 --end 14/08/2025 --days mon,tue,thu \
//!       --balance 200 --gain 20,00% --loss 15,00%

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use growth_cycle_simulator::calendar::format_date;
use growth_cycle_simulator::cycle::StartPreference;
use growth_cycle_simulator::rates::{LossConvention, RateInput};
use growth_cycle_simulator::report::{br_money, ledger_table, summary_block};
use growth_cycle_simulator::Config;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "growth-cycle-simulator")]
#[command(about = "Simulate a balance under a repeating cycle of gains and losses")]
struct Args {
    /// YAML run file; the built-in default is used when omitted
    config: Option<PathBuf>,

    /// First day (dd/mm/yyyy or yyyy-mm-dd)
    #[arg(long)]
    start: Option<String>,

    /// Last day, inclusive
    #[arg(long)]
    end: Option<String>,

    /// Initial balance
    #[arg(short, long)]
    balance: Option<f64>,

    /// Gain rate, e.g. 20,00%
    #[arg(long, allow_hyphen_values = true)]
    gain: Option<String>,

    /// Loss rate, e.g. 15,00% (or -15,00% with --loss-convention signed)
    #[arg(long, allow_hyphen_values = true)]
    loss: Option<String>,

    /// Gain days per cycle
    #[arg(long)]
    gain_days: Option<u32>,

    /// Loss days per cycle
    #[arg(long)]
    loss_days: Option<u32>,

    /// Which block the cycle starts with (gain or loss)
    #[arg(long)]
    starts_with: Option<StartPreference>,

    /// How the loss rate sign is read (magnitude or signed)
    #[arg(long, value_parser = parse_convention)]
    loss_convention: Option<LossConvention>,

    /// Active weekdays, comma separated (mon,tue,... or 0-6)
    #[arg(long, value_delimiter = ',')]
    days: Option<Vec<String>>,

    /// List days without an operation as no-op rows
    #[arg(long)]
    show_idle_days: bool,

    /// Write the effective configuration to this YAML file
    #[arg(long)]
    save: Option<PathBuf>,
}

fn parse_convention(s: &str) -> Result<LossConvention, String> {
    match s.trim().to_lowercase().as_str() {
        "magnitude" => Ok(LossConvention::Magnitude),
        "signed" => Ok(LossConvention::Signed),
        other => Err(format!("unknown loss convention: {}", other)),
    }
}

/// Apply command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, args: &Args) {
    let sim = &mut config.simulation;
    if let Some(start) = &args.start {
        sim.start_date = start.clone();
    }
    if let Some(end) = &args.end {
        sim.end_date = end.clone();
    }
    if let Some(balance) = args.balance {
        sim.initial_balance = balance;
    }
    if let Some(days) = &args.days {
        sim.active_weekdays = days.clone();
    }

    let cycle = &mut config.cycle;
    if let Some(gain) = &args.gain {
        cycle.gain_rate = RateInput::Text(gain.clone());
    }
    if let Some(loss) = &args.loss {
        cycle.loss_rate = RateInput::Text(loss.clone());
    }
    if let Some(n) = args.gain_days {
        cycle.gain_days = n;
    }
    if let Some(n) = args.loss_days {
        cycle.loss_days = n;
    }
    if let Some(start) = args.starts_with {
        cycle.starts_with = start;
    }
    if let Some(convention) = args.loss_convention {
        cycle.rules.loss_convention = convention;
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .init();

    let args = Args::parse();

    println!("Growth Cycle Simulator\n");

    // Load configuration from file or use default
    let mut config = match &args.config {
        Some(path) => {
            println!("Loading configuration from: {}", path.display());
            Config::load(path).with_context(|| format!("failed to load {}", path.display()))?
        }
        None => {
            let today = Local::now().date_naive();
            info!(%today, "no config given, using default cycle");
            Config::default_cycle(today)
        }
    };
    apply_overrides(&mut config, &args);

    let plan = config.plan().context("invalid simulation input")?;

    if let Some(path) = &args.save {
        config
            .save_to_file(path)
            .with_context(|| format!("failed to save {}", path.display()))?;
        println!("Configuration saved to: {}", path.display());
    }

    println!("Simulation Parameters:");
    println!("  Initial balance: {}", br_money(plan.initial_balance));
    println!(
        "  Period: {} to {}",
        format_date(plan.start),
        format_date(plan.end)
    );
    println!("  Active weekdays: {}", plan.active.names().join(", "));
    println!(
        "  Cycle ({} slots): {:?}",
        plan.cycle.len(),
        plan.cycle.values()
    );
    println!();

    if plan.active.is_empty() {
        warn!("no active weekdays selected");
    }

    let result = plan.run()?;

    print!("{}", ledger_table(&result, args.show_idle_days));
    println!();
    print!("{}", summary_block(&result));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_config_values() {
        let args = Args::parse_from([
            "growth-cycle-simulator",
            "--start",
            "07/08/2025",
            "--end",
            "13/08/2025",
            "--balance",
            "200",
            "--gain",
            "20,00%",
            "--loss",
            "-15,00%",
            "--loss-convention",
            "signed",
            "--days",
            "mon,tue,thu",
        ]);
        let start = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let mut config = Config::default_cycle(start);
        apply_overrides(&mut config, &args);

        let result = config.plan().unwrap().run().unwrap();
        assert_eq!(result.operations(), 3);
        assert!((result.final_balance() - 244.8).abs() < 1e-9);
    }

    #[test]
    fn test_starts_with_flag() {
        let args = Args::parse_from(["growth-cycle-simulator", "--starts-with", "loss"]);
        assert_eq!(args.starts_with, Some(StartPreference::Loss));
        assert!(parse_convention("sideways").is_err());
    }
}
