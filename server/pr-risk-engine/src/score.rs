//! Composite risk score and score bands.

use serde::{Deserialize, Serialize};

use crate::config::RiskConfig;
use crate::types::{PullRequest, SeverityBreakdown};

/// Round to the nearest integer with halves going up (toward +inf), so -2.5 -> -2.
pub fn round_half_up(x: f64) -> f64 {
  if x - x.floor() == 0.5 {
    x.ceil()
  } else {
    x.round()
  }
}

/// Round to one decimal place, halves going up.
pub fn round_one_decimal(x: f64) -> f64 {
  round_half_up(x * 10.0) / 10.0
}

/// Score 0..=max_score: severity-weighted base, then the contextual multipliers
/// applied once each in fixed order (open, size, response, stale, very stale).
pub fn compute_score(
  pr: &PullRequest,
  breakdown: &SeverityBreakdown,
  response_rate: f64,
  age_days: f64,
  config: &RiskConfig,
) -> u8 {
  let mut score = f64::from(breakdown.critical) * config.critical_weight
    + f64::from(breakdown.high) * config.high_weight
    + f64::from(breakdown.medium) * config.medium_weight
    + f64::from(breakdown.low) * config.low_weight;

  if pr.is_open() {
    score *= config.open_multiplier;
  }
  if pr.lines_changed() > config.large_change_lines {
    score *= config.large_change_multiplier;
  }
  if response_rate < config.low_response_rate {
    score *= config.low_response_multiplier;
  }
  if age_days > config.stale_days {
    score *= config.stale_multiplier;
  }
  if age_days > config.very_stale_days {
    score *= config.very_stale_multiplier;
  }

  round_half_up(score.min(config.max_score)).clamp(0.0, 100.0) as u8
}

/// Coarse label for a score, matching the score-range histogram buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
  /// [0, 20)
  Low,
  /// [20, 40)
  Medium,
  /// [40, 70)
  High,
  /// [70, 100]
  Critical,
}

impl RiskBand {
  pub const ALL: [RiskBand; 4] = [
    RiskBand::Low,
    RiskBand::Medium,
    RiskBand::High,
    RiskBand::Critical,
  ];

  pub fn from_score(score: u8) -> Self {
    match score {
      0..=19 => Self::Low,
      20..=39 => Self::Medium,
      40..=69 => Self::High,
      _ => Self::Critical,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Low => "0-20 (Low)",
      Self::Medium => "20-40 (Medium)",
      Self::High => "40-70 (High)",
      Self::Critical => "70-100 (Critical)",
    }
  }
}
