//! Cycle Builder
//!
//! Turns gain/loss rates and day counts into a fixed, repeating sequence of
//! multiplicative factors. Gains form one contiguous block and losses another;
//! the start preference decides which block comes first.

use crate::error::InputError;
use crate::rates::{LossConvention, PercentageRate, RateLimits};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Kind of a single operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Gain,
    Loss,
    Neutral,
}

impl OperationKind {
    /// Classify a percent variation
    pub fn from_variation(variation_pct: f64) -> Self {
        if variation_pct > 0.0 {
            OperationKind::Gain
        } else if variation_pct < 0.0 {
            OperationKind::Loss
        } else {
            OperationKind::Neutral
        }
    }
}

/// Which block the cycle starts with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartPreference {
    #[default]
    #[serde(alias = "ganho")]
    Gain,
    #[serde(alias = "perda")]
    Loss,
}

impl std::str::FromStr for StartPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gain" | "ganho" => Ok(StartPreference::Gain),
            "loss" | "perda" => Ok(StartPreference::Loss),
            other => Err(format!("unknown start preference: {}", other)),
        }
    }
}

/// One slot of the cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub value: f64,
    pub kind: OperationKind,
}

impl Factor {
    pub fn gain(rate_pct: f64) -> Self {
        Self {
            value: 1.0 + rate_pct / 100.0,
            kind: if rate_pct == 0.0 {
                OperationKind::Neutral
            } else {
                OperationKind::Gain
            },
        }
    }

    /// `magnitude_pct` is the positive size of the loss
    pub fn loss(magnitude_pct: f64) -> Self {
        Self {
            value: 1.0 - magnitude_pct / 100.0,
            kind: if magnitude_pct == 0.0 {
                OperationKind::Neutral
            } else {
                OperationKind::Loss
            },
        }
    }

    /// Percent change this factor applies
    pub fn variation_pct(&self) -> f64 {
        (self.value - 1.0) * 100.0
    }

    pub fn apply(&self, balance: f64) -> f64 {
        balance * self.value
    }
}

/// Immutable repeating sequence of factors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cycle {
    factors: Vec<Factor>,
}

impl Cycle {
    /// Wrap an explicit factor list. An empty cycle is allowed here and
    /// simply produces no operations.
    pub fn from_factors(factors: Vec<Factor>) -> Self {
        Self { factors }
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Factor> {
        self.factors.get(index)
    }

    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// Raw multiplier values in cycle order
    pub fn values(&self) -> Vec<f64> {
        self.factors.iter().map(|f| f.value).collect()
    }

    /// Product of all factors: balance multiplier for one full cycle
    pub fn growth_per_cycle(&self) -> f64 {
        self.factors.iter().map(|f| f.value).product()
    }
}

/// Rate bounds and loss-sign convention used while building a cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleRules {
    #[serde(flatten)]
    pub limits: RateLimits,
    #[serde(default)]
    pub loss_convention: LossConvention,
}

/// Build a block cycle of `gain_days + loss_days` factors.
///
/// Rates are validated against `rules` even when their block is empty.
pub fn build_cycle(
    gain_rate: PercentageRate,
    loss_rate: PercentageRate,
    gain_days: u32,
    loss_days: u32,
    start: StartPreference,
    rules: &CycleRules,
) -> Result<Cycle, InputError> {
    let gain_pct = rules.limits.check_gain(gain_rate)?;
    let loss_pct = rules.limits.check_loss(loss_rate, rules.loss_convention)?;

    if gain_days == 0 && loss_days == 0 {
        return Err(InputError::EmptyCycle);
    }

    let gain_block = std::iter::repeat(Factor::gain(gain_pct)).take(gain_days as usize);
    let loss_block = std::iter::repeat(Factor::loss(loss_pct)).take(loss_days as usize);

    let factors: Vec<Factor> = match start {
        StartPreference::Gain => gain_block.chain(loss_block).collect(),
        StartPreference::Loss => loss_block.chain(gain_block).collect(),
    };

    debug!(
        len = factors.len(),
        gain_pct,
        loss_pct,
        ?start,
        "built cycle"
    );

    Ok(Cycle { factors })
}

/// Same as [`build_cycle`] but takes comma-decimal text such as `"20,00%"`
pub fn build_cycle_from_text(
    gain_rate: &str,
    loss_rate: &str,
    gain_days: u32,
    loss_days: u32,
    start: StartPreference,
    rules: &CycleRules,
) -> Result<Cycle, InputError> {
    let gain = PercentageRate::parse(gain_rate)?;
    let loss = PercentageRate::parse(loss_rate)?;
    build_cycle(gain, loss, gain_days, loss_days, start, rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn rules() -> CycleRules {
        CycleRules::default()
    }

    fn close(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < EPS)
    }

    #[test]
    fn test_gain_first_block_order() {
        let cycle = build_cycle_from_text("20,00%", "15,00%", 2, 1, StartPreference::Gain, &rules())
            .unwrap();
        assert!(close(&cycle.values(), &[1.20, 1.20, 0.85]));
        assert_eq!(cycle.factors()[2].kind, OperationKind::Loss);
    }

    #[test]
    fn test_loss_first_block_order() {
        let cycle = build_cycle_from_text("20,00%", "15,00%", 2, 1, StartPreference::Loss, &rules())
            .unwrap();
        assert!(close(&cycle.values(), &[0.85, 1.20, 1.20]));
    }

    #[test]
    fn test_blocks_not_interleaved() {
        let cycle = build_cycle(
            PercentageRate::new(10.0),
            PercentageRate::new(5.0),
            3,
            3,
            StartPreference::Gain,
            &rules(),
        )
        .unwrap();
        let kinds: Vec<_> = cycle.factors().iter().map(|f| f.kind).collect();
        use OperationKind::*;
        assert_eq!(kinds, vec![Gain, Gain, Gain, Loss, Loss, Loss]);
    }

    #[test]
    fn test_length_is_sum_of_days() {
        for g in 0..6u32 {
            for l in 0..6u32 {
                if g + l == 0 {
                    continue;
                }
                let cycle = build_cycle(
                    PercentageRate::new(10.0),
                    PercentageRate::new(5.0),
                    g,
                    l,
                    StartPreference::Loss,
                    &rules(),
                )
                .unwrap();
                assert_eq!(cycle.len(), (g + l) as usize);
            }
        }
    }

    #[test]
    fn test_zero_days_rejected_regardless_of_rates() {
        for (gain, loss) in [(10.0, 5.0), (0.0, 0.0), (500.0, 99.0)] {
            let result = build_cycle(
                PercentageRate::new(gain),
                PercentageRate::new(loss),
                0,
                0,
                StartPreference::Gain,
                &rules(),
            );
            assert_eq!(result, Err(InputError::EmptyCycle));
        }
    }

    #[test]
    fn test_single_block_cycles() {
        let only_loss = build_cycle(
            PercentageRate::new(10.0),
            PercentageRate::new(5.0),
            0,
            2,
            StartPreference::Gain,
            &rules(),
        )
        .unwrap();
        assert!(close(&only_loss.values(), &[0.95, 0.95]));
    }

    #[test]
    fn test_signed_convention_matches_magnitude() {
        let signed = CycleRules {
            loss_convention: LossConvention::Signed,
            ..CycleRules::default()
        };
        let a = build_cycle_from_text("20,00%", "15,00%", 2, 1, StartPreference::Gain, &rules())
            .unwrap();
        let b = build_cycle_from_text("20,00%", "-15,00%", 2, 1, StartPreference::Gain, &signed)
            .unwrap();
        assert_eq!(a, b);

        // the other sign is rejected under each convention
        assert!(build_cycle_from_text("20,00%", "-15,00%", 2, 1, StartPreference::Gain, &rules())
            .is_err());
        assert!(build_cycle_from_text("20,00%", "15,00%", 2, 1, StartPreference::Gain, &signed)
            .is_err());
    }

    #[test]
    fn test_out_of_range_rates_rejected() {
        assert!(build_cycle_from_text("500,01", "5,00", 1, 1, StartPreference::Gain, &rules())
            .is_err());
        assert!(build_cycle_from_text("10,00", "100,00", 1, 1, StartPreference::Gain, &rules())
            .is_err());
        assert!(matches!(
            build_cycle_from_text("10.00", "5,00", 1, 1, StartPreference::Gain, &rules()),
            Err(InputError::MalformedRate(_))
        ));
    }

    #[test]
    fn test_zero_rate_is_neutral() {
        let cycle = build_cycle(
            PercentageRate::new(0.0),
            PercentageRate::new(0.0),
            1,
            1,
            StartPreference::Gain,
            &rules(),
        )
        .unwrap();
        assert!(cycle.factors().iter().all(|f| f.kind == OperationKind::Neutral));
        assert_eq!(cycle.growth_per_cycle(), 1.0);
    }

    #[test]
    fn test_start_preference_from_str() {
        assert_eq!("Gain".parse::<StartPreference>(), Ok(StartPreference::Gain));
        assert_eq!("perda".parse::<StartPreference>(), Ok(StartPreference::Loss));
        assert!("both".parse::<StartPreference>().is_err());
    }

    #[test]
    fn test_start_preference_serde_accepts_portuguese() {
        let loss: StartPreference = serde_yaml::from_str("perda").unwrap();
        assert_eq!(loss, StartPreference::Loss);
        let gain: StartPreference = serde_json::from_str("\"ganho\"").unwrap();
        assert_eq!(gain, StartPreference::Gain);
        assert_eq!(serde_yaml::to_string(&loss).unwrap().trim_start_matches("---").trim(), "loss");
        assert!(serde_yaml::from_str::<StartPreference>("both").is_err());
    }
}
