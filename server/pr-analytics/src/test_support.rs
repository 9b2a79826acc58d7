//! Builder for enriched pull requests used by unit tests.

use chrono::{DateTime, Utc};
use pr_risk_engine::types::BranchRef;
use pr_risk_engine::*;

pub fn ts(s: &str) -> DateTime<Utc> {
  DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn actor(id: u64, login: &str, kind: ActorKind) -> Actor {
  Actor {
    id,
    login: login.into(),
    kind,
  }
}

/// Open, unmerged PR in `acme/api` created 2025-03-01, no findings, score 0.
pub struct Fixture {
  pr: EnrichedPullRequest,
}

impl Fixture {
  pub fn new(id: u64) -> Self {
    let created = ts("2025-03-01T10:00:00Z");
    let pull_request = PullRequest {
      id,
      number: id,
      title: format!("Change #{}", id),
      body: None,
      state: PrState::Open,
      merged: false,
      created_at: created,
      updated_at: created,
      closed_at: None,
      merged_at: None,
      author: actor(1, "dev", ActorKind::Human),
      repository: Repository {
        id: 1,
        name: "api".into(),
        full_name: "acme/api".into(),
        owner: actor(2, "acme", ActorKind::Human),
      },
      head: BranchRef {
        name: "feature".into(),
        sha: String::new(),
      },
      base: BranchRef {
        name: "main".into(),
        sha: String::new(),
      },
      additions: 0,
      deletions: 0,
      changed_files: 0,
      comments: 0,
      review_comments: 0,
      commits: 0,
    };
    Self {
      pr: EnrichedPullRequest {
        pull_request,
        findings: Vec::new(),
        responses: Vec::new(),
        reviews: Vec::new(),
        risk_assessment: RiskAssessment {
          overall_score: 0,
          severity_breakdown: SeverityBreakdown::default(),
          dominant_severity: Severity::None,
          findings_count: 0,
          lines_changed: 0,
          response_rate: 1.0,
          age_days: 0,
        },
      },
    }
  }

  pub fn repo(mut self, id: u64, full_name: &str) -> Self {
    self.pr.pull_request.repository.id = id;
    self.pr.pull_request.repository.full_name = full_name.into();
    self.pr.pull_request.repository.name = full_name.rsplit('/').next().unwrap().into();
    self
  }

  pub fn title(mut self, title: &str) -> Self {
    self.pr.pull_request.title = title.into();
    self
  }

  pub fn created(mut self, at: &str) -> Self {
    self.pr.pull_request.created_at = ts(at);
    self
  }

  pub fn closed(mut self) -> Self {
    self.pr.pull_request.state = PrState::Closed;
    self
  }

  pub fn merged(mut self) -> Self {
    self.pr.pull_request.state = PrState::Closed;
    self.pr.pull_request.merged = true;
    self
  }

  pub fn score(mut self, score: u8) -> Self {
    self.pr.risk_assessment.overall_score = score;
    self
  }

  pub fn rate(mut self, rate: f64) -> Self {
    self.pr.risk_assessment.response_rate = rate;
    self
  }

  pub fn age(mut self, days: i64) -> Self {
    self.pr.risk_assessment.age_days = days;
    self
  }

  pub fn findings(mut self, severities: &[Severity]) -> Self {
    let bot = actor(900, "sec[bot]", ActorKind::Bot);
    self.pr.findings = severities
      .iter()
      .enumerate()
      .map(|(i, s)| Finding {
        id: self.pr.pull_request.id * 1_000 + i as u64,
        author: bot.clone(),
        severity: *s,
        category: "XSS".into(),
        cve_id: None,
        path: "src/app.ts".into(),
        line: None,
        excerpt: String::new(),
        body: String::new(),
        created_at: self.pr.pull_request.created_at,
      })
      .collect();
    let mut breakdown = SeverityBreakdown::default();
    for s in severities {
      breakdown.record(*s);
    }
    self.pr.risk_assessment.severity_breakdown = breakdown;
    self.pr.risk_assessment.dominant_severity = breakdown.dominant();
    self.pr.risk_assessment.findings_count = severities.len() as u32;
    self
  }

  pub fn responses(mut self, n: usize) -> Self {
    let dev = actor(1, "dev", ActorKind::Human);
    self.pr.responses = (0..n)
      .map(|i| Response {
        id: self.pr.pull_request.id * 1_000 + 500 + i as u64,
        author: dev.clone(),
        in_reply_to: None,
        path: None,
        line: None,
        excerpt: None,
        body: String::new(),
        created_at: self.pr.pull_request.created_at,
      })
      .collect();
    self
  }

  pub fn build(self) -> EnrichedPullRequest {
    self.pr
  }
}
