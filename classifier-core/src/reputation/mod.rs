use async_trait::async_trait;

pub mod safe_browsing;
pub mod schema;

pub use safe_browsing::SafeBrowsingClient;
pub use schema::{ReputationQuery, ReputationResult, ThreatEntry, ThreatMatch};

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
  #[error("HTTP {status}: {body}")]
  Http {
    status: reqwest::StatusCode,
    body: String,
  },

  #[error("request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("malformed response: {0}")]
  Malformed(#[from] serde_json::Error),
}

/// Remote reputation source for candidate URLs. A single attempt per call;
/// callers decide what a failure means.
#[async_trait]
pub trait ReputationLookup: Send + Sync {
  async fn check_url(&self, url: &str) -> Result<ReputationResult, LookupError>;
}
