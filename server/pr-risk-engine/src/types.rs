//! Record model: actors, repositories, pull requests, findings, responses, reviews,
//! and the derived RiskAssessment / EnrichedPullRequest (JSON contracts + internal models).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Actors and repositories
// ---------------------------------------------------------------------------

/// Whether an actor is a person or an automated agent.
///
/// Source-control payloads spell this `User` / `Organization` / `Bot`; both
/// those and the normalized `human` / `bot` forms are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
  #[serde(alias = "User", alias = "Organization", alias = "user", alias = "organization")]
  Human,
  #[serde(alias = "Bot")]
  Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
  pub id: u64,
  pub login: String,
  #[serde(alias = "type")]
  pub kind: ActorKind,
}

impl Actor {
  pub fn is_bot(&self) -> bool {
    self.kind == ActorKind::Bot
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
  pub id: u64,
  pub name: String,
  /// "owner/name".
  pub full_name: String,
  pub owner: Actor,
}

impl Repository {
  /// Segment after the last `/` of the qualified name.
  pub fn short_name(&self) -> &str {
    self
      .full_name
      .rsplit_once('/')
      .map(|(_, name)| name)
      .unwrap_or(&self.full_name)
  }
}

// ---------------------------------------------------------------------------
// Severity (ordered: None < Low < Medium < High < Critical)
// ---------------------------------------------------------------------------

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  #[default]
  None,
  Low,
  Medium,
  High,
  Critical,
}

impl Severity {
  /// Non-none levels in report order, highest first.
  pub const DESCENDING: [Severity; 4] = [
    Severity::Critical,
    Severity::High,
    Severity::Medium,
    Severity::Low,
  ];

  /// Lenient parse; unknown strings yield `None` so the caller picks a default.
  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "critical" | "crit" => Some(Self::Critical),
      "high" => Some(Self::High),
      "medium" | "moderate" => Some(Self::Medium),
      "low" => Some(Self::Low),
      "none" | "info" => Some(Self::None),
      _ => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::None => "none",
      Self::Low => "low",
      Self::Medium => "medium",
      Self::High => "high",
      Self::Critical => "critical",
    }
  }
}

// ---------------------------------------------------------------------------
// Pull request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
  Open,
  Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRef {
  #[serde(rename = "ref")]
  pub name: String,
  #[serde(default)]
  pub sha: String,
}

/// A pull request as supplied by the data source. Never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
  pub id: u64,
  pub number: u64,
  pub title: String,
  #[serde(default)]
  pub body: Option<String>,
  pub state: PrState,
  #[serde(default)]
  pub merged: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  #[serde(default)]
  pub closed_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub merged_at: Option<DateTime<Utc>>,
  #[serde(alias = "user")]
  pub author: Actor,
  pub repository: Repository,
  pub head: BranchRef,
  pub base: BranchRef,
  #[serde(default)]
  pub additions: u32,
  #[serde(default)]
  pub deletions: u32,
  #[serde(default)]
  pub changed_files: u32,
  #[serde(default)]
  pub comments: u32,
  #[serde(default)]
  pub review_comments: u32,
  #[serde(default)]
  pub commits: u32,
}

impl PullRequest {
  pub fn is_open(&self) -> bool {
    self.state == PrState::Open
  }

  pub fn lines_changed(&self) -> u64 {
    u64::from(self.additions) + u64::from(self.deletions)
  }
}

// ---------------------------------------------------------------------------
// Comments: bot findings and developer responses
// ---------------------------------------------------------------------------

/// One security-bot observation attached to a code location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
  pub id: u64,
  pub author: Actor,
  pub severity: Severity,
  pub category: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cve_id: Option<String>,
  pub path: String,
  #[serde(default)]
  pub line: Option<u32>,
  #[serde(default)]
  pub excerpt: String,
  pub body: String,
  pub created_at: DateTime<Utc>,
}

/// A developer reply, optionally linked to the finding it answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
  pub id: u64,
  pub author: Actor,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub in_reply_to: Option<u64>,
  #[serde(default)]
  pub path: Option<String>,
  #[serde(default)]
  pub line: Option<u32>,
  #[serde(default)]
  pub excerpt: Option<String>,
  pub body: String,
  pub created_at: DateTime<Utc>,
}

/// A comment after classification by author kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Comment {
  Finding(Finding),
  Response(Response),
}

/// Undifferentiated review comment as delivered by the data source.
/// Unknown fields are silently ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundComment {
  pub id: u64,
  pub user: Actor,
  pub body: String,
  pub created_at: DateTime<Utc>,
  #[serde(default)]
  pub path: Option<String>,
  #[serde(default)]
  pub line: Option<u32>,
  #[serde(default)]
  pub diff_hunk: Option<String>,
  #[serde(default)]
  pub in_reply_to_id: Option<u64>,
  #[serde(default)]
  pub severity: Option<String>,
  #[serde(default)]
  pub finding_type: Option<String>,
  #[serde(default)]
  pub cve_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
  #[serde(alias = "APPROVED")]
  Approved,
  #[serde(alias = "CHANGES_REQUESTED")]
  ChangesRequested,
  #[serde(alias = "COMMENTED")]
  Commented,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
  pub id: u64,
  #[serde(alias = "user")]
  pub author: Actor,
  pub state: ReviewState,
  #[serde(default)]
  pub submitted_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub body: Option<String>,
}

// ---------------------------------------------------------------------------
// Derived: risk assessment and enriched pull request
// ---------------------------------------------------------------------------

/// Finding counts per severity level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBreakdown {
  pub critical: u32,
  pub high: u32,
  pub medium: u32,
  pub low: u32,
  pub none: u32,
}

impl SeverityBreakdown {
  pub fn count(&self, severity: Severity) -> u32 {
    match severity {
      Severity::Critical => self.critical,
      Severity::High => self.high,
      Severity::Medium => self.medium,
      Severity::Low => self.low,
      Severity::None => self.none,
    }
  }

  pub fn record(&mut self, severity: Severity) {
    match severity {
      Severity::Critical => self.critical += 1,
      Severity::High => self.high += 1,
      Severity::Medium => self.medium += 1,
      Severity::Low => self.low += 1,
      Severity::None => self.none += 1,
    }
  }

  pub fn total(&self) -> u32 {
    self.critical + self.high + self.medium + self.low + self.none
  }

  /// Highest non-zero level among critical..low; `None` when all are zero.
  pub fn dominant(&self) -> Severity {
    Severity::DESCENDING
      .into_iter()
      .filter(|s| self.count(*s) > 0)
      .max()
      .unwrap_or(Severity::None)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
  /// Bounded 0..=100.
  pub overall_score: u8,
  pub severity_breakdown: SeverityBreakdown,
  pub dominant_severity: Severity,
  pub findings_count: u32,
  pub lines_changed: u64,
  pub response_rate: f64,
  /// Rounded to the nearest whole day.
  pub age_days: i64,
}

/// A pull request together with its comments, reviews, and assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedPullRequest {
  #[serde(flatten)]
  pub pull_request: PullRequest,
  pub findings: Vec<Finding>,
  pub responses: Vec<Response>,
  pub reviews: Vec<Review>,
  pub risk_assessment: RiskAssessment,
}

impl EnrichedPullRequest {
  pub fn id(&self) -> u64 {
    self.pull_request.id
  }

  pub fn score(&self) -> u8 {
    self.risk_assessment.overall_score
  }

  pub fn dominant_severity(&self) -> Severity {
    self.risk_assessment.dominant_severity
  }

  pub fn repository(&self) -> &Repository {
    &self.pull_request.repository
  }

  /// Findings without a matching developer response (never negative).
  pub fn unresponded(&self) -> u32 {
    (self.findings.len() as u32).saturating_sub(self.responses.len() as u32)
  }
}

// ---------------------------------------------------------------------------
// Inbound batch (JSON contract: what the data source sends)
// ---------------------------------------------------------------------------

/// One pull request with its raw review thread and reviews.
///
/// The thread is named apart from `comments`, which is the pull request's counter.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestRecord {
  #[serde(flatten)]
  pub pull_request: PullRequest,
  #[serde(default)]
  pub review_thread: Vec<InboundComment>,
  #[serde(default)]
  pub reviews: Vec<Review>,
}

/// A whole invocation's input. `now` pins the clock for time-relative fields.
#[derive(Debug, Clone, Deserialize)]
pub struct Batch {
  #[serde(default)]
  pub now: Option<DateTime<Utc>>,
  #[serde(default)]
  pub config: crate::config::RiskConfig,
  pub pull_requests: Vec<PullRequestRecord>,
}
