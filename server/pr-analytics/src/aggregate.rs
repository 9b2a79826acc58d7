//! Batch aggregates over enriched pull requests.
//!
//! Each function is an independent pure reduction over the full batch; none
//! reads another's output. Time-relative aggregates take one `now` snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use pr_risk_engine::score::{round_half_up, round_one_decimal};
use pr_risk_engine::{EnrichedPullRequest, RiskBand, Severity};
use tracing::debug;

use crate::config::AnalyticsConfig;
use crate::types::*;

fn percentage(count: u64, total: u64) -> f64 {
  if total == 0 {
    0.0
  } else {
    round_one_decimal(count as f64 / total as f64 * 100.0)
  }
}

fn mean_score<'a>(prs: impl Iterator<Item = &'a EnrichedPullRequest>) -> f64 {
  let (sum, count) = prs.fold((0u64, 0u64), |(sum, count), pr| {
    (sum + u64::from(pr.score()), count + 1)
  });
  if count == 0 {
    0.0
  } else {
    sum as f64 / count as f64
  }
}

/// Sum of each severity bucket across all PRs, with proportions of the non-none total.
pub fn severity_totals(prs: &[EnrichedPullRequest]) -> SeverityTotals {
  let mut totals = SeverityTotals {
    critical: 0,
    high: 0,
    medium: 0,
    low: 0,
    none: 0,
    shares: Vec::new(),
  };
  for pr in prs {
    let b = &pr.risk_assessment.severity_breakdown;
    totals.critical += u64::from(b.critical);
    totals.high += u64::from(b.high);
    totals.medium += u64::from(b.medium);
    totals.low += u64::from(b.low);
    totals.none += u64::from(b.none);
  }

  let total = totals.total();
  totals.shares = Severity::DESCENDING
    .into_iter()
    .map(|severity| {
      let count = match severity {
        Severity::Critical => totals.critical,
        Severity::High => totals.high,
        Severity::Medium => totals.medium,
        Severity::Low => totals.low,
        Severity::None => totals.none,
      };
      SeverityShare {
        severity,
        count,
        percentage: percentage(count, total),
      }
    })
    .collect();
  totals
}

/// UTC calendar date of a timestamp.
pub fn calendar_day(ts: &DateTime<Utc>) -> NaiveDate {
  ts.date_naive()
}

/// Per-day severity sums keyed by creation date, ascending.
pub fn timeline(prs: &[EnrichedPullRequest]) -> Vec<TimelinePoint> {
  let mut days: BTreeMap<NaiveDate, TimelinePoint> = BTreeMap::new();
  for pr in prs {
    let date = calendar_day(&pr.pull_request.created_at);
    let point = days.entry(date).or_insert_with(|| TimelinePoint::new(date));
    let b = &pr.risk_assessment.severity_breakdown;
    point.critical += u64::from(b.critical);
    point.high += u64::from(b.high);
    point.medium += u64::from(b.medium);
    point.low += u64::from(b.low);
  }
  days.into_values().collect()
}

/// Per-repository counts and mean score, ordered by qualified name.
pub fn repo_rollup(prs: &[EnrichedPullRequest]) -> Vec<RepoRollup> {
  let mut repos: BTreeMap<&str, RepoRollup> = BTreeMap::new();
  for pr in prs {
    let repo = pr.repository();
    let row = repos.entry(repo.full_name.as_str()).or_insert_with(|| RepoRollup {
      repository_id: repo.id,
      full_name: repo.full_name.clone(),
      short_name: repo.short_name().to_string(),
      total_prs: 0,
      open_prs: 0,
      critical_findings: 0,
      total_risk_score: 0,
      avg_risk_score: 0.0,
    });
    // Lowest id wins so the row is independent of input order.
    row.repository_id = row.repository_id.min(repo.id);
    row.total_prs += 1;
    if pr.pull_request.is_open() {
      row.open_prs += 1;
    }
    row.critical_findings += u64::from(pr.risk_assessment.severity_breakdown.critical);
    row.total_risk_score += u64::from(pr.score());
  }

  repos
    .into_values()
    .map(|mut row| {
      row.avg_risk_score = if row.total_prs == 0 {
        0.0
      } else {
        row.total_risk_score as f64 / row.total_prs as f64
      };
      row
    })
    .collect()
}

/// Counts per score band: [0,20) [20,40) [40,70) [70,100].
pub fn score_histogram(prs: &[EnrichedPullRequest]) -> ScoreHistogram {
  RiskBand::ALL
    .into_iter()
    .map(|band| BucketCount {
      bucket: band,
      label: band.label(),
      count: prs
        .iter()
        .filter(|pr| RiskBand::from_score(pr.score()) == band)
        .count() as u64,
    })
    .collect()
}

/// Counts per response-engagement level.
pub fn engagement_histogram(prs: &[EnrichedPullRequest]) -> EngagementHistogram {
  EngagementLevel::ALL
    .into_iter()
    .map(|level| BucketCount {
      bucket: level,
      label: level.label(),
      count: prs
        .iter()
        .filter(|pr| EngagementLevel::from_rate(pr.risk_assessment.response_rate) == level)
        .count() as u64,
    })
    .collect()
}

/// Counts per age bucket, on the rounded reported age.
pub fn age_histogram(prs: &[EnrichedPullRequest]) -> AgeHistogram {
  AgeBucket::ALL
    .into_iter()
    .map(|bucket| BucketCount {
      bucket,
      label: bucket.label(),
      count: prs
        .iter()
        .filter(|pr| AgeBucket::from_age(pr.risk_assessment.age_days) == bucket)
        .count() as u64,
    })
    .collect()
}

/// Percent change of the recent-window mean score against everything older.
///
/// The older window is unbounded. Returns 0 when the older mean is 0, and when
/// the window reaches past the representable time range (nothing is older).
pub fn score_trend(prs: &[EnrichedPullRequest], now: DateTime<Utc>, window_days: i64) -> f64 {
  let Some(cutoff) = TimeDelta::try_days(window_days).and_then(|d| now.checked_sub_signed(d))
  else {
    return 0.0;
  };
  let recent = mean_score(prs.iter().filter(|pr| pr.pull_request.created_at >= cutoff));
  let older = mean_score(prs.iter().filter(|pr| pr.pull_request.created_at < cutoff));
  if older > 0.0 {
    round_one_decimal((recent - older) / older * 100.0)
  } else {
    0.0
  }
}

/// Dashboard headline metrics.
pub fn summary(
  prs: &[EnrichedPullRequest],
  now: DateTime<Utc>,
  config: &AnalyticsConfig,
) -> Summary {
  let mut s = Summary {
    total_prs: prs.len() as u64,
    open_prs: 0,
    critical_findings: 0,
    high_findings: 0,
    avg_risk_score: 0,
    trend_7d: score_trend(prs, now, config.trend_window_days),
    unresponded_findings: 0,
  };
  for pr in prs {
    if pr.pull_request.is_open() {
      s.open_prs += 1;
    }
    s.critical_findings += u64::from(pr.risk_assessment.severity_breakdown.critical);
    s.high_findings += u64::from(pr.risk_assessment.severity_breakdown.high);
    s.unresponded_findings += u64::from(pr.unresponded());
  }
  s.avg_risk_score = round_half_up(mean_score(prs.iter())) as u64;
  s
}

/// Mean response rate, mean age, and total findings.
pub fn response_metrics(prs: &[EnrichedPullRequest]) -> ResponseMetrics {
  let total_findings = prs
    .iter()
    .map(|pr| {
      let b = &pr.risk_assessment.severity_breakdown;
      u64::from(b.critical + b.high + b.medium + b.low)
    })
    .sum();
  if prs.is_empty() {
    return ResponseMetrics {
      avg_response_rate_pct: 0,
      avg_days_open: 0.0,
      total_findings,
    };
  }

  let n = prs.len() as f64;
  // Summed in ascending order so the float total does not depend on input order.
  let mut rates: Vec<f64> = prs.iter().map(|pr| pr.risk_assessment.response_rate).collect();
  rates.sort_by(f64::total_cmp);
  let rate_sum: f64 = rates.iter().sum();
  let age_sum: i64 = prs.iter().map(|pr| pr.risk_assessment.age_days).sum();
  ResponseMetrics {
    avg_response_rate_pct: round_half_up(rate_sum / n * 100.0).max(0.0) as u64,
    avg_days_open: round_one_decimal(age_sum as f64 / n),
    total_findings,
  }
}

/// Compute every aggregate over one batch with a single `now` snapshot.
pub fn aggregate(
  prs: &[EnrichedPullRequest],
  now: DateTime<Utc>,
  config: &AnalyticsConfig,
) -> AnalyticsReport {
  let report = AnalyticsReport {
    severity_totals: severity_totals(prs),
    timeline: timeline(prs),
    repo_rollup: repo_rollup(prs),
    score_histogram: score_histogram(prs),
    engagement_histogram: engagement_histogram(prs),
    age_histogram: age_histogram(prs),
    summary: summary(prs, now, config),
    response_metrics: response_metrics(prs),
  };
  debug!(
    prs = prs.len(),
    days = report.timeline.len(),
    repos = report.repo_rollup.len(),
    "aggregated batch"
  );
  report
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::*;
  use pretty_assertions::assert_eq;
  use pr_risk_engine::Severity::{Critical, High, Low, Medium, None as Unrated};

  #[test]
  fn severity_totals_sum_buckets_and_shares() {
    let prs = vec![
      Fixture::new(1).findings(&[Critical, High, Low]).build(),
      Fixture::new(2).findings(&[Critical, Unrated]).build(),
    ];
    let totals = severity_totals(&prs);
    assert_eq!(
      (totals.critical, totals.high, totals.medium, totals.low, totals.none),
      (2, 1, 0, 1, 1)
    );
    let shares: Vec<(Severity, f64)> = totals.shares.iter().map(|s| (s.severity, s.percentage)).collect();
    assert_eq!(
      shares,
      vec![(Critical, 50.0), (High, 25.0), (Medium, 0.0), (Low, 25.0)]
    );
  }

  #[test]
  fn shares_round_to_one_decimal() {
    let prs = vec![Fixture::new(1).findings(&[Critical, High, Low]).build()];
    let totals = severity_totals(&prs);
    assert_eq!(totals.shares[0].percentage, 33.3);
    assert_eq!(totals.shares[2].percentage, 0.0);
  }

  #[test]
  fn empty_batch_degrades_to_zero_everywhere() {
    let now = ts("2025-03-10T00:00:00Z");
    let report = aggregate(&[], now, &AnalyticsConfig::default());
    assert_eq!(report.severity_totals.total(), 0);
    assert!(report.severity_totals.shares.iter().all(|s| s.percentage == 0.0));
    assert!(report.timeline.is_empty());
    assert!(report.repo_rollup.is_empty());
    assert!(report.score_histogram.iter().all(|b| b.count == 0));
    assert_eq!(report.summary.total_prs, 0);
    assert_eq!(report.summary.avg_risk_score, 0);
    assert_eq!(report.summary.trend_7d, 0.0);
    assert_eq!(report.response_metrics.avg_response_rate_pct, 0);
    assert_eq!(report.response_metrics.avg_days_open, 0.0);
  }

  #[test]
  fn timeline_groups_by_day_and_sorts_ascending() {
    let prs = vec![
      Fixture::new(1).created("2025-03-02T23:00:00Z").findings(&[Critical]).build(),
      Fixture::new(2).created("2025-03-01T01:00:00Z").findings(&[High]).build(),
      Fixture::new(3).created("2025-03-02T05:00:00Z").findings(&[Low, Low]).build(),
    ];
    let points = timeline(&prs);
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    assert_eq!((points[0].critical, points[0].high, points[0].low), (0, 1, 0));
    assert_eq!(points[1].date, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
    assert_eq!((points[1].critical, points[1].high, points[1].low), (1, 0, 2));
  }

  #[test]
  fn repo_rollup_groups_by_qualified_name() {
    let prs = vec![
      Fixture::new(1).repo(2, "acme/web").score(40).findings(&[Critical]).build(),
      Fixture::new(2).repo(1, "acme/api").score(10).closed().build(),
      Fixture::new(3).repo(2, "acme/web").score(61).closed().findings(&[Critical, Critical]).build(),
    ];
    let rows = repo_rollup(&prs);
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].full_name, "acme/api");
    assert_eq!(rows[0].total_prs, 1);
    assert_eq!(rows[0].open_prs, 0);
    assert_eq!(rows[0].avg_risk_score, 10.0);

    assert_eq!(rows[1].full_name, "acme/web");
    assert_eq!(rows[1].short_name, "web");
    assert_eq!(rows[1].repository_id, 2);
    assert_eq!(rows[1].total_prs, 2);
    assert_eq!(rows[1].open_prs, 1);
    assert_eq!(rows[1].critical_findings, 3);
    assert_eq!(rows[1].avg_risk_score, 50.5);
  }

  #[test]
  fn score_histogram_bucket_edges() {
    let prs: Vec<_> = [0u8, 19, 20, 39, 40, 69, 70, 100]
      .iter()
      .enumerate()
      .map(|(i, s)| Fixture::new(i as u64).score(*s).build())
      .collect();
    let counts: Vec<u64> = score_histogram(&prs).iter().map(|b| b.count).collect();
    assert_eq!(counts, vec![2, 2, 2, 2]);
  }

  #[test]
  fn engagement_histogram_bucket_edges() {
    let prs: Vec<_> = [1.0, 0.8, 0.79, 0.5, 0.49, 0.0]
      .iter()
      .enumerate()
      .map(|(i, r)| Fixture::new(i as u64).rate(*r).build())
      .collect();
    let hist = engagement_histogram(&prs);
    assert_eq!(hist[0].bucket, EngagementLevel::High);
    let counts: Vec<u64> = hist.iter().map(|b| b.count).collect();
    assert_eq!(counts, vec![2, 2, 2]);
  }

  #[test]
  fn age_histogram_bucket_edges() {
    let prs: Vec<_> = [0i64, 1, 2, 3, 4, 7, 8, 40]
      .iter()
      .enumerate()
      .map(|(i, a)| Fixture::new(i as u64).age(*a).build())
      .collect();
    let counts: Vec<u64> = age_histogram(&prs).iter().map(|b| b.count).collect();
    assert_eq!(counts, vec![2, 2, 2, 2]);
  }

  #[test]
  fn age_buckets_serialize_with_separated_numbers() {
    let names: Vec<serde_json::Value> = AgeBucket::ALL
      .iter()
      .map(|b| serde_json::to_value(b).unwrap())
      .collect();
    assert_eq!(
      names,
      vec!["same_day", "within_3_days", "within_1_week", "over_1_week"]
    );
  }

  #[test]
  fn summary_counts_and_trend() {
    let now = ts("2025-03-10T00:00:00Z");
    let prs = vec![
      Fixture::new(1)
        .created("2025-03-05T00:00:00Z")
        .score(60)
        .findings(&[Critical, High, High])
        .responses(1)
        .build(),
      // exactly on the cutoff counts as recent
      Fixture::new(2).created("2025-03-03T00:00:00Z").score(30).closed().build(),
      Fixture::new(3)
        .created("2025-02-20T00:00:00Z")
        .score(20)
        .findings(&[Critical])
        .responses(4)
        .build(),
      Fixture::new(4).created("2025-02-01T00:00:00Z").score(40).merged().build(),
    ];
    let s = summary(&prs, now, &AnalyticsConfig::default());
    assert_eq!(s.total_prs, 4);
    assert_eq!(s.open_prs, 2);
    assert_eq!(s.critical_findings, 2);
    assert_eq!(s.high_findings, 2);
    // 150 / 4 = 37.5
    assert_eq!(s.avg_risk_score, 38);
    // recent mean 45 vs older mean 30
    assert_eq!(s.trend_7d, 50.0);
    assert_eq!(s.unresponded_findings, 2);
  }

  #[test]
  fn negative_trend_rounds_to_one_decimal() {
    let now = ts("2025-03-10T00:00:00Z");
    let prs = vec![
      Fixture::new(1).created("2025-03-09T00:00:00Z").score(20).build(),
      Fixture::new(2).created("2025-01-01T00:00:00Z").score(30).build(),
    ];
    assert_eq!(score_trend(&prs, now, 7), -33.3);
  }

  #[test]
  fn trend_is_zero_without_older_signal() {
    let now = ts("2025-03-10T00:00:00Z");
    let only_recent = vec![Fixture::new(1).created("2025-03-09T00:00:00Z").score(80).build()];
    assert_eq!(score_trend(&only_recent, now, 7), 0.0);

    let zero_older = vec![
      Fixture::new(1).created("2025-03-09T00:00:00Z").score(80).build(),
      Fixture::new(2).created("2025-01-01T00:00:00Z").score(0).build(),
    ];
    assert_eq!(score_trend(&zero_older, now, 7), 0.0);
  }

  #[test]
  fn oversized_trend_window_yields_zero_trend() {
    let now = ts("2025-03-10T00:00:00Z");
    let prs = vec![
      Fixture::new(1).created("2025-03-09T00:00:00Z").score(20).build(),
      Fixture::new(2).created("2025-01-01T00:00:00Z").score(30).build(),
    ];
    assert_eq!(score_trend(&prs, now, 1_000_000_000), 0.0);
    assert_eq!(score_trend(&prs, now, i64::MAX), 0.0);
    assert_eq!(score_trend(&prs, now, i64::MIN), 0.0);

    let config: AnalyticsConfig =
      serde_json::from_str(r#"{"trend_window_days": 1000000000}"#).unwrap();
    let report = aggregate(&prs, now, &config);
    assert_eq!(report.summary.trend_7d, 0.0);
    assert_eq!(report.summary.total_prs, 2);
  }

  #[test]
  fn response_metrics_means() {
    let prs = vec![
      Fixture::new(1).rate(1.0).age(1).findings(&[High, Unrated]).build(),
      Fixture::new(2).rate(0.5).age(2).findings(&[Low]).build(),
      Fixture::new(3).rate(0.25).age(4).build(),
    ];
    let m = response_metrics(&prs);
    assert_eq!(m.avg_response_rate_pct, 58);
    assert_eq!(m.avg_days_open, 2.3);
    assert_eq!(m.total_findings, 2);
  }

  mod properties {
    use super::*;
    use proptest::prelude::*;

    const REPOS: [(u64, &str); 3] = [(1, "acme/api"), (2, "acme/web"), (3, "other/tool")];

    fn pr_strategy() -> impl Strategy<Value = EnrichedPullRequest> {
      (
        1u64..10_000,
        0u8..=100,
        0usize..REPOS.len(),
        0u32..20,
        (0usize..4, 0usize..4, 0usize..3),
        0.0f64..2.0,
        0i64..60,
        0usize..5,
        any::<bool>(),
      )
        .prop_map(|(id, score, repo, day, (crit, high, low), rate, age, responses, open)| {
          let mut severities = vec![Critical; crit];
          severities.extend(vec![High; high]);
          severities.extend(vec![Low; low]);
          let (repo_id, repo_name) = REPOS[repo];
          let created = format!("2025-02-{:02}T08:00:00Z", day + 1);
          let fixture = Fixture::new(id)
            .repo(repo_id, repo_name)
            .created(&created)
            .score(score)
            .rate(rate)
            .age(age)
            .findings(&severities)
            .responses(responses);
          if open { fixture.build() } else { fixture.closed().build() }
        })
    }

    fn batch_and_shuffle(
    ) -> impl Strategy<Value = (Vec<EnrichedPullRequest>, Vec<EnrichedPullRequest>)> {
      prop::collection::vec(pr_strategy(), 0..25).prop_flat_map(|prs| {
        let shuffled = Just(prs.clone()).prop_shuffle();
        (Just(prs), shuffled)
      })
    }

    proptest! {
      /// Property: aggregation does not depend on input order.
      #[test]
      fn aggregate_is_order_invariant((prs, shuffled) in batch_and_shuffle()) {
        let now = ts("2025-02-18T00:00:00Z");
        let config = AnalyticsConfig::default();
        prop_assert_eq!(aggregate(&prs, now, &config), aggregate(&shuffled, now, &config));
      }

      /// Property: histogram counts each cover every PR exactly once.
      #[test]
      fn histograms_partition_the_batch((prs, _) in batch_and_shuffle()) {
        let n = prs.len() as u64;
        prop_assert_eq!(score_histogram(&prs).iter().map(|b| b.count).sum::<u64>(), n);
        prop_assert_eq!(engagement_histogram(&prs).iter().map(|b| b.count).sum::<u64>(), n);
        prop_assert_eq!(age_histogram(&prs).iter().map(|b| b.count).sum::<u64>(), n);
      }
    }
  }
}
