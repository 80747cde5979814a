//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{guard::UpstreamError, schema::ValidationErrors};

/// An error returned by an API handler or by the guard.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("client {0} not found")]
  NotFound(i64),

  #[error("invalid input: {0}")]
  Validation(ValidationErrors),

  #[error("missing token")]
  Unauthenticated,

  #[error("token rejected")]
  Forbidden,

  #[error(transparent)]
  Upstream(#[from] UpstreamError),

  #[error("backend failure: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap any store error as a backend failure.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store(Box::new(e))
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
      ApiError::Forbidden => StatusCode::FORBIDDEN,
      ApiError::Upstream(UpstreamError::Status(s)) => *s,
      ApiError::Upstream(UpstreamError::Transport(_)) => StatusCode::BAD_GATEWAY,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = match &self {
      ApiError::Validation(errors) => {
        json!({ "error": self.to_string(), "fields": errors })
      }
      _ => json!({ "error": self.to_string() }),
    };
    (status, Json(body)).into_response()
  }
}
