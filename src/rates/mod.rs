//! Percentage Rates
//!
//! Parsing and range checks for gain/loss percentages written with a comma
//! decimal separator, e.g. `20,00%` or `-15,00%`.

use crate::error::InputError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Up to three integer digits, exactly two decimals, optional trailing `%`
const RATE_PATTERN: &str = r"^-?\d{1,3},\d{2}%?$";

/// Default upper bound for gain rates (percent)
pub const DEFAULT_MAX_GAIN_PCT: f64 = 500.0;
/// Losses must stay strictly below this magnitude (percent)
pub const DEFAULT_MAX_LOSS_PCT: f64 = 100.0;

fn rate_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(RATE_PATTERN).expect("rate pattern is a valid regex"))
}

/// A signed percentage (20.0 means +20%)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct PercentageRate(f64);

impl PercentageRate {
    pub fn new(percent: f64) -> Self {
        Self(percent)
    }

    /// Parse a comma-decimal rate such as `"20,00%"`.
    ///
    /// Whitespace anywhere in the text is ignored. Dots, missing decimals and
    /// anything else outside the pattern are rejected, not coerced.
    pub fn parse(text: &str) -> Result<Self, InputError> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        if !rate_regex().is_match(&compact) {
            return Err(InputError::MalformedRate(text.to_string()));
        }

        let digits = compact.trim_end_matches('%').replace(',', ".");
        digits
            .parse::<f64>()
            .map(Self)
            .map_err(|_| InputError::MalformedRate(text.to_string()))
    }

    pub fn percent(&self) -> f64 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0.0
    }
}

impl FromStr for PercentageRate {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PercentageRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", format!("{:.2}", self.0).replace('.', ","))
    }
}

/// A rate as it arrives from YAML or JSON: either a number or BR-formatted text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RateInput {
    Number(f64),
    Text(String),
}

impl RateInput {
    pub fn to_rate(&self) -> Result<PercentageRate, InputError> {
        match self {
            RateInput::Number(v) if v.is_finite() => Ok(PercentageRate::new(*v)),
            RateInput::Number(v) => Err(InputError::MalformedRate(v.to_string())),
            RateInput::Text(s) => PercentageRate::parse(s),
        }
    }
}

impl From<&str> for RateInput {
    fn from(s: &str) -> Self {
        RateInput::Text(s.to_string())
    }
}

impl From<f64> for RateInput {
    fn from(v: f64) -> Self {
        RateInput::Number(v)
    }
}

/// How the sign of a loss rate is read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LossConvention {
    /// Loss given as a positive magnitude: `15,00%` means -15%
    #[default]
    Magnitude,
    /// Loss given as a negative percent: `-15,00%` means -15%
    Signed,
}

impl LossConvention {
    pub fn name(&self) -> &'static str {
        match self {
            LossConvention::Magnitude => "magnitude",
            LossConvention::Signed => "signed",
        }
    }
}

/// Bounds applied to gain and loss rates before building a cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateLimits {
    /// Largest accepted gain, inclusive
    #[serde(default = "default_max_gain_pct")]
    pub max_gain_pct: f64,
    /// Largest accepted loss magnitude; never reaches 100
    #[serde(default = "default_max_loss_pct")]
    pub max_loss_pct: f64,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            max_gain_pct: DEFAULT_MAX_GAIN_PCT,
            max_loss_pct: DEFAULT_MAX_LOSS_PCT,
        }
    }
}

impl RateLimits {
    /// Check a gain rate and return it as percent
    pub fn check_gain(&self, rate: PercentageRate) -> Result<f64, InputError> {
        let value = rate.percent();
        if !(0.0..=self.max_gain_pct).contains(&value) {
            return Err(InputError::RateOutOfRange {
                kind: "gain",
                value,
                bounds: format!(">= 0 and <= {:.2}", self.max_gain_pct),
            });
        }
        Ok(value)
    }

    /// Check a loss rate under `convention` and return its magnitude
    pub fn check_loss(
        &self,
        rate: PercentageRate,
        convention: LossConvention,
    ) -> Result<f64, InputError> {
        let value = rate.percent();
        let magnitude = match convention {
            LossConvention::Magnitude if value < 0.0 => {
                return Err(InputError::WrongLossSign {
                    value,
                    convention: convention.name(),
                })
            }
            LossConvention::Signed if value > 0.0 => {
                return Err(InputError::WrongLossSign {
                    value,
                    convention: convention.name(),
                })
            }
            _ => value.abs(),
        };

        let ceiling = self.max_loss_pct.min(DEFAULT_MAX_LOSS_PCT);
        let in_range = if ceiling >= DEFAULT_MAX_LOSS_PCT {
            magnitude < DEFAULT_MAX_LOSS_PCT
        } else {
            magnitude <= ceiling
        };
        if !in_range {
            let bounds = if ceiling >= DEFAULT_MAX_LOSS_PCT {
                format!(">= 0 and < {:.2}", DEFAULT_MAX_LOSS_PCT)
            } else {
                format!(">= 0 and <= {:.2}", ceiling)
            };
            return Err(InputError::RateOutOfRange {
                kind: "loss",
                value,
                bounds,
            });
        }
        Ok(magnitude)
    }
}

fn default_max_gain_pct() -> f64 {
    DEFAULT_MAX_GAIN_PCT
}

fn default_max_loss_pct() -> f64 {
    DEFAULT_MAX_LOSS_PCT
}
