//! Scoring configuration with the stock weights and multipliers as defaults.

use serde::Deserialize;

/// Tunable weights, thresholds, and multipliers for the composite risk score.
///
/// Any subset may be supplied in a batch; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
  /// Base points per critical finding.
  pub critical_weight: f64,
  /// Base points per high finding.
  pub high_weight: f64,
  /// Base points per medium finding.
  pub medium_weight: f64,
  /// Base points per low finding.
  pub low_weight: f64,
  /// Applied when the pull request is still open.
  pub open_multiplier: f64,
  /// Additions + deletions strictly above this count as a large change.
  pub large_change_lines: u64,
  pub large_change_multiplier: f64,
  /// Response rates strictly below this count as poorly answered.
  pub low_response_rate: f64,
  pub low_response_multiplier: f64,
  /// Age in days strictly above this counts as stale.
  pub stale_days: f64,
  pub stale_multiplier: f64,
  /// Age in days strictly above this counts as very stale (stacks with stale).
  pub very_stale_days: f64,
  pub very_stale_multiplier: f64,
  /// Saturation ceiling for the final score.
  pub max_score: f64,
}

impl Default for RiskConfig {
  fn default() -> Self {
    Self {
      critical_weight: 25.0,
      high_weight: 15.0,
      medium_weight: 5.0,
      low_weight: 1.0,
      open_multiplier: 1.5,
      large_change_lines: 500,
      large_change_multiplier: 1.2,
      low_response_rate: 0.5,
      low_response_multiplier: 1.3,
      stale_days: 7.0,
      stale_multiplier: 1.1,
      very_stale_days: 30.0,
      very_stale_multiplier: 1.3,
      max_score: 100.0,
    }
  }
}
