//! Output types for the analytics engine (JSON contract with the presentation layer).

use chrono::NaiveDate;
use pr_risk_engine::{RiskBand, Severity};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Severity totals
// ---------------------------------------------------------------------------

/// One slice of the proportion breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityShare {
  pub severity: Severity,
  pub count: u64,
  /// `count / total * 100`, one decimal; 0 when total is 0.
  pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityTotals {
  pub critical: u64,
  pub high: u64,
  pub medium: u64,
  pub low: u64,
  pub none: u64,
  /// Critical, high, medium, low in that order.
  pub shares: Vec<SeverityShare>,
}

impl SeverityTotals {
  /// Sum of the four non-none levels.
  pub fn total(&self) -> u64 {
    self.critical + self.high + self.medium + self.low
  }
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
  pub date: NaiveDate,
  pub critical: u64,
  pub high: u64,
  pub medium: u64,
  pub low: u64,
}

impl TimelinePoint {
  pub fn new(date: NaiveDate) -> Self {
    Self {
      date,
      critical: 0,
      high: 0,
      medium: 0,
      low: 0,
    }
  }
}

// ---------------------------------------------------------------------------
// Per-repository rollup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepoRollup {
  pub repository_id: u64,
  pub full_name: String,
  pub short_name: String,
  pub total_prs: u64,
  pub open_prs: u64,
  pub critical_findings: u64,
  pub total_risk_score: u64,
  /// `total_risk_score / total_prs`; 0 when there are no PRs.
  pub avg_risk_score: f64,
}

// ---------------------------------------------------------------------------
// Histograms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngagementLevel {
  /// rate >= 0.8
  High,
  /// 0.5 <= rate < 0.8
  Medium,
  /// rate < 0.5
  Low,
}

impl EngagementLevel {
  pub const ALL: [EngagementLevel; 3] = [Self::High, Self::Medium, Self::Low];

  pub fn from_rate(rate: f64) -> Self {
    if rate >= 0.8 {
      Self::High
    } else if rate >= 0.5 {
      Self::Medium
    } else {
      Self::Low
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::High => "High (>=80%)",
      Self::Medium => "Medium (50-79%)",
      Self::Low => "Low (<50%)",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBucket {
  /// age <= 1
  SameDay,
  /// 1 < age <= 3
  #[serde(rename = "within_3_days")]
  Within3Days,
  /// 3 < age <= 7
  #[serde(rename = "within_1_week")]
  Within1Week,
  /// age > 7
  #[serde(rename = "over_1_week")]
  Over1Week,
}

impl AgeBucket {
  pub const ALL: [AgeBucket; 4] = [
    Self::SameDay,
    Self::Within3Days,
    Self::Within1Week,
    Self::Over1Week,
  ];

  pub fn from_age(age_days: i64) -> Self {
    match age_days {
      i64::MIN..=1 => Self::SameDay,
      2..=3 => Self::Within3Days,
      4..=7 => Self::Within1Week,
      _ => Self::Over1Week,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::SameDay => "Same Day",
      Self::Within3Days => "1-3 Days",
      Self::Within1Week => "4-7 Days",
      Self::Over1Week => "Over 1 Week",
    }
  }
}

/// One histogram bar: the bucket, its display label, and how many PRs fell in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCount<B> {
  pub bucket: B,
  pub label: &'static str,
  pub count: u64,
}

pub type ScoreHistogram = Vec<BucketCount<RiskBand>>;
pub type EngagementHistogram = Vec<BucketCount<EngagementLevel>>;
pub type AgeHistogram = Vec<BucketCount<AgeBucket>>;

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
  pub total_prs: u64,
  pub open_prs: u64,
  pub critical_findings: u64,
  pub high_findings: u64,
  /// Rounded to the nearest integer; 0 for an empty batch.
  pub avg_risk_score: u64,
  /// Percent change of recent vs. older mean score, one decimal; 0 when older mean is 0.
  pub trend_7d: f64,
  pub unresponded_findings: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseMetrics {
  /// Mean response rate as a rounded percentage.
  pub avg_response_rate_pct: u64,
  /// Mean reported age in days, one decimal.
  pub avg_days_open: f64,
  pub total_findings: u64,
}

/// Everything `aggregate` computes in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
  pub severity_totals: SeverityTotals,
  pub timeline: Vec<TimelinePoint>,
  pub repo_rollup: Vec<RepoRollup>,
  pub score_histogram: ScoreHistogram,
  pub engagement_histogram: EngagementHistogram,
  pub age_histogram: AgeHistogram,
  pub summary: Summary,
  pub response_metrics: ResponseMetrics,
}

// ---------------------------------------------------------------------------
// Query outputs
// ---------------------------------------------------------------------------

/// Headline counts for a (filtered) set of pull requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViewStats {
  pub total: u64,
  pub open: u64,
  pub high_risk: u64,
  pub critical_findings: u64,
}

/// One entry for the repository filter control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryOption {
  pub id: u64,
  pub name: String,
}
