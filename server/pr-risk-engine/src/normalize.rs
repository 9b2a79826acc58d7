//! Boundary normalization: classify inbound comments and reject ill-formed pull requests.

use crate::error::EngineError;
use crate::types::*;

/// Category given to bot comments that carry no finding type.
pub const UNCLASSIFIED: &str = "Unclassified";

/// Classify an inbound comment by its author's kind: bot => Finding, human => Response.
///
/// Missing or unrecognised severities on bot comments become `Severity::None`.
pub fn classify(raw: &InboundComment) -> Comment {
  if raw.user.is_bot() {
    let severity = raw
      .severity
      .as_deref()
      .and_then(Severity::from_str_loose)
      .unwrap_or_default();
    let category = raw
      .finding_type
      .as_deref()
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .unwrap_or(UNCLASSIFIED)
      .to_string();
    Comment::Finding(Finding {
      id: raw.id,
      author: raw.user.clone(),
      severity,
      category,
      cve_id: raw.cve_id.clone().filter(|c| !c.trim().is_empty()),
      path: raw.path.as_deref().map(normalize_path).unwrap_or_default(),
      line: raw.line,
      excerpt: raw.diff_hunk.clone().unwrap_or_default(),
      body: raw.body.clone(),
      created_at: raw.created_at,
    })
  } else {
    Comment::Response(Response {
      id: raw.id,
      author: raw.user.clone(),
      in_reply_to: raw.in_reply_to_id,
      path: raw.path.as_deref().map(normalize_path),
      line: raw.line,
      excerpt: raw.diff_hunk.clone(),
      body: raw.body.clone(),
      created_at: raw.created_at,
    })
  }
}

/// Split inbound comments into findings and responses, preserving input order.
pub fn partition(comments: &[InboundComment]) -> (Vec<Finding>, Vec<Response>) {
  let mut findings = Vec::new();
  let mut responses = Vec::new();
  for raw in comments {
    match classify(raw) {
      Comment::Finding(f) => findings.push(f),
      Comment::Response(r) => responses.push(r),
    }
  }
  (findings, responses)
}

/// Reject pull requests that violate record invariants.
pub fn validate_pull_request(pr: &PullRequest) -> Result<(), EngineError> {
  if pr.merged && pr.state == PrState::Open {
    return Err(EngineError::validation(
      pr.id,
      "merged",
      "merged pull request must be closed",
    ));
  }
  if !pr.merged && pr.merged_at.is_some() {
    return Err(EngineError::validation(
      pr.id,
      "merged_at",
      "set on a pull request that is not merged",
    ));
  }
  if pr.title.trim().is_empty() {
    return Err(EngineError::validation(pr.id, "title", "must not be empty"));
  }
  if !pr.repository.full_name.contains('/') {
    return Err(EngineError::validation(
      pr.id,
      "repository.full_name",
      "expected owner/name",
    ));
  }
  Ok(())
}

/// Normalize a file path for display and comparison:
/// - backslash -> forward slash
/// - collapse repeated slashes
/// - strip leading ./
fn normalize_path(p: &str) -> String {
  let s = p.replace('\\', "/");
  let mut out = String::with_capacity(s.len());
  let mut prev_slash = false;
  for ch in s.chars() {
    if ch == '/' {
      if !prev_slash {
        out.push('/');
      }
      prev_slash = true;
    } else {
      prev_slash = false;
      out.push(ch);
    }
  }
  out.strip_prefix("./").map(str::to_string).unwrap_or(out)
}
