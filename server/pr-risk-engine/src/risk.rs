//! Per pull request risk assessment: breakdown, dominant severity, response rate, age, score.

use chrono::{DateTime, Utc};

use crate::config::RiskConfig;
use crate::score::{compute_score, round_half_up};
use crate::types::*;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Count findings per severity bucket.
pub fn severity_breakdown(findings: &[Finding]) -> SeverityBreakdown {
  findings.iter().fold(SeverityBreakdown::default(), |mut acc, f| {
    acc.record(f.severity);
    acc
  })
}

/// Responses per finding; 1.0 when there are no findings.
pub fn response_rate(findings_count: usize, responses_count: usize) -> f64 {
  if findings_count == 0 {
    1.0
  } else {
    responses_count as f64 / findings_count as f64
  }
}

/// Fractional days between `created_at` and `now` (negative if created after `now`).
pub fn age_in_days(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
  (now - created_at).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Derive the full assessment. Pure and total: same inputs, same output.
pub fn assess(
  pr: &PullRequest,
  findings: &[Finding],
  responses: &[Response],
  now: DateTime<Utc>,
  config: &RiskConfig,
) -> RiskAssessment {
  let breakdown = severity_breakdown(findings);
  let rate = response_rate(findings.len(), responses.len());
  let age = age_in_days(pr.created_at, now);
  let overall_score = compute_score(pr, &breakdown, rate, age, config);

  RiskAssessment {
    overall_score,
    severity_breakdown: breakdown,
    dominant_severity: breakdown.dominant(),
    findings_count: findings.len() as u32,
    lines_changed: pr.lines_changed(),
    response_rate: rate,
    age_days: round_half_up(age) as i64,
  }
}

/// `assess` with the stock scoring configuration.
pub fn assess_with_defaults(
  pr: &PullRequest,
  findings: &[Finding],
  responses: &[Response],
  now: DateTime<Utc>,
) -> RiskAssessment {
  assess(pr, findings, responses, now, &RiskConfig::default())
}
