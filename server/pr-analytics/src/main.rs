//! Binary entrypoint: read one JSON batch (plus optional filter/sort) from stdin,
//! write `{ report, rows, view }` to stdout.

use chrono::Utc;
use pr_analytics::query::view_stats;
use pr_analytics::{aggregate, apply, AnalyticsConfig, AnalyticsReport, FilterCriteria, SortSpec};
use pr_risk_engine::{enrich_batch, init_tracing, Batch, EnrichedPullRequest};
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};
use tracing::{debug, error};

#[derive(Deserialize)]
struct Request {
  #[serde(flatten)]
  batch: Batch,
  #[serde(default)]
  analytics: AnalyticsConfig,
  #[serde(default)]
  filter: FilterCriteria,
  #[serde(default)]
  sort: SortSpec,
}

#[derive(Serialize)]
struct Output {
  report: AnalyticsReport,
  rows: Vec<EnrichedPullRequest>,
  view: pr_analytics::types::ViewStats,
}

fn main() {
  init_tracing();
  if let Err(e) = run_binary() {
    error!(error = %e, "pr-analytics failed");
    std::process::exit(1);
  }
}

fn run_binary() -> Result<(), Box<dyn std::error::Error>> {
  let mut raw = String::new();
  io::stdin().lock().read_to_string(&mut raw)?;
  let req: Request = serde_json::from_str(&raw)?;

  // One clock snapshot for enrichment and every time-relative aggregate.
  let now = req.batch.now.unwrap_or_else(Utc::now);
  let enriched = enrich_batch(req.batch.pull_requests, now, &req.batch.config)?;

  let report = aggregate(&enriched, now, &req.analytics);
  let rows = apply(&enriched, &req.filter, req.sort);
  let view = view_stats(&rows, &req.analytics);
  debug!(total = enriched.len(), shown = rows.len(), "report ready");

  let json = serde_json::to_vec(&Output { report, rows, view })?;
  io::stdout().write_all(&json)?;
  Ok(())
}
