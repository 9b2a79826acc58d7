//! Shared fixtures for unit tests.

use chrono::{DateTime, Utc};

use crate::types::*;

pub fn ts(s: &str) -> DateTime<Utc> {
  DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

pub fn bot() -> Actor {
  Actor {
    id: 900,
    login: "security-bot[bot]".into(),
    kind: ActorKind::Bot,
  }
}

pub fn developer() -> Actor {
  Actor {
    id: 100,
    login: "dev".into(),
    kind: ActorKind::Human,
  }
}

pub fn repository(id: u64, full_name: &str) -> Repository {
  Repository {
    id,
    name: full_name.rsplit('/').next().unwrap_or(full_name).into(),
    full_name: full_name.into(),
    owner: developer(),
  }
}

/// Open, unmerged, 30 lines changed, created 2025-02-28T12:00:00Z.
pub fn pull_request(id: u64) -> PullRequest {
  PullRequest {
    id,
    number: id,
    title: format!("Change #{}", id),
    body: None,
    state: PrState::Open,
    merged: false,
    created_at: ts("2025-02-28T12:00:00Z"),
    updated_at: ts("2025-02-28T12:00:00Z"),
    closed_at: None,
    merged_at: None,
    author: developer(),
    repository: repository(1, "acme/api"),
    head: BranchRef {
      name: "feature".into(),
      sha: "abc".into(),
    },
    base: BranchRef {
      name: "main".into(),
      sha: "def".into(),
    },
    additions: 20,
    deletions: 10,
    changed_files: 2,
    comments: 0,
    review_comments: 0,
    commits: 1,
  }
}

pub fn finding(id: u64, severity: Severity) -> Finding {
  Finding {
    id,
    author: bot(),
    severity,
    category: "SQL Injection".into(),
    cve_id: None,
    path: "src/db.rs".into(),
    line: Some(10),
    excerpt: String::new(),
    body: "finding".into(),
    created_at: ts("2025-02-28T13:00:00Z"),
  }
}

pub fn response(id: u64, in_reply_to: Option<u64>) -> Response {
  Response {
    id,
    author: developer(),
    in_reply_to,
    path: None,
    line: None,
    excerpt: None,
    body: "ack".into(),
    created_at: ts("2025-02-28T14:00:00Z"),
  }
}
