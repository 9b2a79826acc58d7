//! Structured error types for the boundary (parse + validation).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("validation: pull request {pr_id}: {field}: {reason}")]
  Validation {
    pr_id: u64,
    field: String,
    reason: String,
  },

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),
}

impl EngineError {
  pub fn validation(pr_id: u64, field: &str, reason: &str) -> Self {
    Self::Validation {
      pr_id,
      field: field.to_string(),
      reason: reason.to_string(),
    }
  }
}
