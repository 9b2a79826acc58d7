//! Enrichment: attach findings, responses, reviews, and a fresh assessment to a pull request.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::config::RiskConfig;
use crate::error::EngineError;
use crate::normalize;
use crate::risk;
use crate::types::*;

/// Build an EnrichedPullRequest from already-classified findings and responses.
pub fn enrich(
  pr: PullRequest,
  findings: Vec<Finding>,
  responses: Vec<Response>,
  reviews: Vec<Review>,
  now: DateTime<Utc>,
  config: &RiskConfig,
) -> EnrichedPullRequest {
  let risk_assessment = risk::assess(&pr, &findings, &responses, now, config);
  EnrichedPullRequest {
    pull_request: pr,
    findings,
    responses,
    reviews,
    risk_assessment,
  }
}

/// Classify an inbound review thread by author kind, then enrich.
pub fn enrich_comments(
  pr: PullRequest,
  comments: &[InboundComment],
  reviews: Vec<Review>,
  now: DateTime<Utc>,
  config: &RiskConfig,
) -> EnrichedPullRequest {
  let (findings, responses) = normalize::partition(comments);
  enrich(pr, findings, responses, reviews, now, config)
}

/// Validate and enrich every record against one shared `now` snapshot.
///
/// The first ill-formed record aborts the batch.
pub fn enrich_batch(
  records: Vec<PullRequestRecord>,
  now: DateTime<Utc>,
  config: &RiskConfig,
) -> Result<Vec<EnrichedPullRequest>, EngineError> {
  let mut out = Vec::with_capacity(records.len());
  for record in records {
    if let Err(e) = normalize::validate_pull_request(&record.pull_request) {
      warn!(pr_id = record.pull_request.id, error = %e, "rejected pull request");
      return Err(e);
    }
    out.push(enrich_comments(
      record.pull_request,
      &record.review_thread,
      record.reviews,
      now,
      config,
    ));
  }
  debug!(count = out.len(), now = %now, "enriched batch");
  Ok(out)
}
