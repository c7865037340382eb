//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tutor_core::validate::Violation;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] tutor_core::Error),

  /// The request could not be decoded into a command.
  #[error("{0}")]
  BadRequest(String),
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
  pub timestamp:  DateTime<Utc>,
  pub message:    String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub violations: Option<Vec<Violation>>,
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    use tutor_core::Error as E;
    match self {
      ApiError::Core(E::NotFound { .. }) => StatusCode::NOT_FOUND,
      ApiError::Core(E::InvalidTerm(_))
      | ApiError::Core(E::InvalidTeacherAssignment(_))
      | ApiError::Core(E::Validation(_))
      | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Core(E::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    } else {
      tracing::debug!(%status, error = %self, "request rejected");
    }

    let violations = match &self {
      ApiError::Core(tutor_core::Error::Validation(v)) => Some(v.clone()),
      _ => None,
    };
    let body = ErrorBody {
      timestamp: Utc::now(),
      message: self.to_string(),
      violations,
    };
    (status, Json(body)).into_response()
  }
}
