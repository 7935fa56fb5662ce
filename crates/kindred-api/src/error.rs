//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use kindred_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// Stored data is inconsistent: a dangling reference or an unparseable
  /// stored date.
  #[error("integrity error: {0}")]
  Integrity(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<CoreError> for ApiError {
  fn from(e: CoreError) -> Self {
    match e {
      CoreError::NotFound { .. } => ApiError::NotFound(e.to_string()),
      CoreError::ReferentialBreak { .. } | CoreError::MalformedDate { .. } => {
        ApiError::Integrity(e.to_string())
      }
      CoreError::InvalidWindow { .. }
      | CoreError::FutureBirthDate { .. }
      | CoreError::InvalidRecurrence { .. }
      | CoreError::InvalidSpouseStatus(_)
      | CoreError::InvalidGender(_)
      | CoreError::InvalidInput(_)
      | CoreError::SelfSpouse(_) => ApiError::BadRequest(e.to_string()),
      CoreError::Store(inner) => ApiError::Store(inner),
    }
  }
}

/// Lift a backend error through the core taxonomy into an [`ApiError`].
pub fn store_error<E: Into<CoreError>>(e: E) -> ApiError { ApiError::from(e.into()) }

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Integrity(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    if status.is_server_error() {
      error!(error = %self, "request failed");
    }
    (status, Json(json!({ "error": message }))).into_response()
  }
}
