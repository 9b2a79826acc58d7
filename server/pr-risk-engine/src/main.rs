//! Binary entrypoint: read one JSON batch from stdin, write the enriched array to stdout.

use chrono::Utc;
use pr_risk_engine::{enrich_batch, init_tracing, Batch};
use std::io::{self, Read, Write};
use tracing::error;

fn main() {
  init_tracing();
  if let Err(e) = run_binary() {
    error!(error = %e, "pr-risk-engine failed");
    std::process::exit(1);
  }
}

fn run_binary() -> Result<(), Box<dyn std::error::Error>> {
  let mut raw = String::new();
  io::stdin().lock().read_to_string(&mut raw)?;
  let batch: Batch = serde_json::from_str(&raw)?;

  let now = batch.now.unwrap_or_else(Utc::now);
  let enriched = enrich_batch(batch.pull_requests, now, &batch.config)?;
  let json = serde_json::to_vec(&enriched)?;
  io::stdout().write_all(&json)?;
  Ok(())
}
