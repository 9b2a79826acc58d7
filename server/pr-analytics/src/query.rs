//! Query engine: filter and stable sort over enriched pull requests.
//!
//! Filter and sort state is an explicit value owned by the caller.

use std::cmp::Ordering;
use std::collections::HashSet;

use pr_risk_engine::{EnrichedPullRequest, PrState, Severity};
use serde::{Deserialize, Serialize};

use crate::config::AnalyticsConfig;
use crate::types::{RepositoryOption, ViewStats};

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Lifecycle filter. `Merged` tests the merged flag, not the state field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateFilter {
  Open,
  Closed,
  Merged,
}

/// AND-combined filter criteria. `Default` is the cleared state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
  /// Match against the dominant severity.
  pub severity: Option<Severity>,
  pub state: Option<StateFilter>,
  pub repository_id: Option<u64>,
  /// Case-insensitive substring of title, id, or repository name. Empty means no search.
  pub search: Option<String>,
}

impl FilterCriteria {
  pub fn is_active(&self) -> bool {
    self.severity.is_some()
      || self.state.is_some()
      || self.repository_id.is_some()
      || self.search.as_deref().is_some_and(|q| !q.is_empty())
  }

  /// Whether one pull request satisfies every set criterion.
  pub fn matches(&self, pr: &EnrichedPullRequest) -> bool {
    if let Some(severity) = self.severity {
      if pr.dominant_severity() != severity {
        return false;
      }
    }
    if let Some(state) = self.state {
      let ok = match state {
        StateFilter::Merged => pr.pull_request.merged,
        StateFilter::Open => pr.pull_request.state == PrState::Open,
        StateFilter::Closed => pr.pull_request.state == PrState::Closed,
      };
      if !ok {
        return false;
      }
    }
    if let Some(repo_id) = self.repository_id {
      if pr.repository().id != repo_id {
        return false;
      }
    }
    match self.search.as_deref() {
      Some(q) if !q.is_empty() => search_matches(pr, &q.to_lowercase()),
      _ => true,
    }
  }
}

fn search_matches(pr: &EnrichedPullRequest, query: &str) -> bool {
  pr.pull_request.title.to_lowercase().contains(query)
    || pr.id().to_string().contains(query)
    || pr.repository().name.to_lowercase().contains(query)
}

/// Keep the pull requests matching `criteria`, in input order.
pub fn filter(prs: &[EnrichedPullRequest], criteria: &FilterCriteria) -> Vec<EnrichedPullRequest> {
  prs.iter().filter(|pr| criteria.matches(pr)).cloned().collect()
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
  Id,
  Title,
  Score,
  Severity,
  CreatedAt,
  Findings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
  Asc,
  Desc,
}

impl SortDirection {
  pub fn flipped(self) -> Self {
    match self {
      Self::Asc => Self::Desc,
      Self::Desc => Self::Asc,
    }
  }
}

/// Current sort column and direction. Defaults to score, descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortSpec {
  pub key: SortKey,
  pub direction: SortDirection,
}

impl Default for SortSpec {
  fn default() -> Self {
    Self {
      key: SortKey::Score,
      direction: SortDirection::Desc,
    }
  }
}

impl SortSpec {
  /// Column-header click: same key flips direction, a new key starts descending.
  pub fn toggled(self, key: SortKey) -> Self {
    if self.key == key {
      Self {
        key,
        direction: self.direction.flipped(),
      }
    } else {
      Self {
        key,
        direction: SortDirection::Desc,
      }
    }
  }
}

fn compare_by(key: SortKey, a: &EnrichedPullRequest, b: &EnrichedPullRequest) -> Ordering {
  match key {
    SortKey::Id => a.id().cmp(&b.id()),
    SortKey::Title => a
      .pull_request
      .title
      .to_lowercase()
      .cmp(&b.pull_request.title.to_lowercase()),
    SortKey::Score => a.score().cmp(&b.score()),
    SortKey::Severity => a.dominant_severity().cmp(&b.dominant_severity()),
    SortKey::CreatedAt => a.pull_request.created_at.cmp(&b.pull_request.created_at),
    SortKey::Findings => a
      .risk_assessment
      .findings_count
      .cmp(&b.risk_assessment.findings_count),
  }
}

/// Stable sort: records with equal keys keep their input order in either direction.
pub fn sort(
  prs: &[EnrichedPullRequest],
  key: SortKey,
  direction: SortDirection,
) -> Vec<EnrichedPullRequest> {
  let mut out = prs.to_vec();
  match direction {
    SortDirection::Asc => out.sort_by(|a, b| compare_by(key, a, b)),
    SortDirection::Desc => out.sort_by(|a, b| compare_by(key, b, a)),
  }
  out
}

/// Filter, then sort.
pub fn apply(
  prs: &[EnrichedPullRequest],
  criteria: &FilterCriteria,
  spec: SortSpec,
) -> Vec<EnrichedPullRequest> {
  sort(&filter(prs, criteria), spec.key, spec.direction)
}

// ---------------------------------------------------------------------------
// View helpers
// ---------------------------------------------------------------------------

/// Headline counts for the rows currently shown.
pub fn view_stats(prs: &[EnrichedPullRequest], config: &AnalyticsConfig) -> ViewStats {
  prs.iter().fold(ViewStats::default(), |mut acc, pr| {
    acc.total += 1;
    if pr.pull_request.is_open() {
      acc.open += 1;
    }
    if pr.score() >= config.high_risk_threshold {
      acc.high_risk += 1;
    }
    acc.critical_findings += u64::from(pr.risk_assessment.severity_breakdown.critical);
    acc
  })
}

pub fn find_by_id(prs: &[EnrichedPullRequest], id: u64) -> Option<&EnrichedPullRequest> {
  prs.iter().find(|pr| pr.id() == id)
}

/// Distinct repositories in first-seen order.
pub fn repository_options(prs: &[EnrichedPullRequest]) -> Vec<RepositoryOption> {
  let mut seen = HashSet::new();
  prs
    .iter()
    .map(|pr| pr.repository())
    .filter(|repo| seen.insert(repo.id))
    .map(|repo| RepositoryOption {
      id: repo.id,
      name: repo.name.clone(),
    })
    .collect()
}
