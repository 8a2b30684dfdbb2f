use axum::extract::State;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use classifier_core::types::Verdict;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
  #[serde(default)]
  pub link: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
  pub safe: bool,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub reason: Option<String>,
}

pub async fn analyze_link(
  State(state): State<AppState>,
  Form(body): Form<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
  let request_id = Uuid::new_v4();
  let link = body.link.unwrap_or_default();

  if link.trim().is_empty() {
    tracing::warn!(%request_id, "analyze request without a link");
    return Err(ApiError::MissingLink);
  }

  tracing::info!(%request_id, link = %link, "analyzing link");

  match state.classifier.classify(&link).await {
    Verdict::Safe => Ok(Json(AnalyzeResponse {
      safe: true,
      reason: None,
    })),
    Verdict::Unsafe { reason } => Ok(Json(AnalyzeResponse {
      safe: false,
      reason,
    })),
    Verdict::Unknown { reason } => {
      tracing::error!(
        %request_id,
        reason = reason.as_deref().unwrap_or("unspecified"),
        "link analysis failed"
      );
      Err(ApiError::AnalysisFailed)
    }
  }
}

pub async fn home() -> &'static str {
  "link analyzer backend is live and ready"
}

pub async fn health() -> Json<serde_json::Value> {
  Json(serde_json::json!({ "status": "ok" }))
}
