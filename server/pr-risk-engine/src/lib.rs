//! PR Risk Engine — deterministic, rule-based enrichment of pull requests.
//!
//! Classifies review comments into security-bot findings and developer
//! responses, validates records at the boundary, and derives a bounded
//! RiskAssessment per pull request.
//!
//! No DB, no network; pure computation over an in-memory batch.

pub mod config;
pub mod enrich;
pub mod error;
pub mod normalize;
pub mod risk;
pub mod score;
pub mod types;

#[cfg(test)]
mod test_support;

pub use config::RiskConfig;
pub use enrich::{enrich, enrich_batch, enrich_comments};
pub use error::EngineError;
pub use risk::{assess, assess_with_defaults};
pub use score::RiskBand;
pub use types::{
  Actor, ActorKind, Batch, Comment, EnrichedPullRequest, Finding, InboundComment, PrState,
  PullRequest, PullRequestRecord, Repository, Response, Review, ReviewState, RiskAssessment,
  Severity, SeverityBreakdown,
};

/// Install the stderr tracing subscriber used by the binaries.
///
/// Filter comes from `PR_RISK_LOG` (e.g. `pr_risk_engine=debug`), default `warn`.
pub fn init_tracing() {
  let filter = tracing_subscriber::EnvFilter::try_from_env("PR_RISK_LOG")
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .try_init();
}
