use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Request-level failures, mapped onto the wire contract of `/analyze-link/`.
#[derive(Debug)]
pub enum ApiError {
  MissingLink,
  AnalysisFailed,
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::MissingLink => (StatusCode::BAD_REQUEST, "No link provided."),
      ApiError::AnalysisFailed => (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Error while analyzing the link.",
      ),
    };

    let body = serde_json::json!({ "safe": null, "message": message });
    (status, Json(body)).into_response()
  }
}
