//! Analytics configuration with sane defaults.

use serde::Deserialize;

/// Tunables for time-relative and threshold-based aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
  /// Days counted as "recent" for the score trend.
  pub trend_window_days: i64,
  /// Scores at or above this count as high risk in view stats.
  pub high_risk_threshold: u8,
}

impl Default for AnalyticsConfig {
  fn default() -> Self {
    Self {
      trend_window_days: 7,
      high_risk_threshold: 70,
    }
  }
}
