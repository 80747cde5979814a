//! Token guard for the client resource.
//!
//! A caller presents an opaque token in the `token` header. The token carries
//! nothing we can check locally; validity is decided by the remote
//! authentication service behind [`TokenValidator`].

use async_trait::async_trait;
use axum::{
  extract::{Request, State},
  http::StatusCode,
  middleware::Next,
  response::Response,
};
use kawa_core::ClientStore;
use thiserror::Error;

use crate::{AppState, error::ApiError};

/// Header carrying the caller's token.
pub const TOKEN_HEADER: &str = "token";

/// Failure to obtain a verdict from the authentication service.
#[derive(Debug, Error)]
pub enum UpstreamError {
  /// The service answered with any status other than 200.
  #[error("authentication service answered {0}")]
  Status(StatusCode),

  /// The service could not be reached or its answer could not be read.
  #[error("authentication service unreachable: {0}")]
  Transport(String),
}

/// Capability to ask the authentication service about a token.
#[async_trait]
pub trait TokenValidator: Send + Sync {
  /// `Ok(true)` only if the service explicitly validated the token.
  async fn validate(
    &self,
    token: &str,
    service_key: &str,
  ) -> Result<bool, UpstreamError>;
}

/// Middleware rejecting any request whose token the service does not accept.
///
/// No remote call is made when the header is missing. Nothing about the
/// caller is forwarded to the handler.
pub async fn require_token<S>(
  State(state): State<AppState<S>>,
  request: Request,
  next: Next,
) -> Result<Response, ApiError>
where
  S: ClientStore + Clone + Send + Sync + 'static,
{
  let path = request.uri().path().to_owned();
  let token = request
    .headers()
    .get(TOKEN_HEADER)
    .and_then(|v| v.to_str().ok())
    .map(str::to_owned)
    .ok_or_else(|| {
      tracing::warn!(%path, "request without token");
      ApiError::Unauthenticated
    })?;

  let accepted = state
    .validator
    .validate(&token, &state.settings.service_key)
    .await
    .inspect_err(|e| tracing::warn!(%path, error = %e, "token check failed"))?;

  if !accepted {
    tracing::warn!(%path, "token rejected");
    return Err(ApiError::Forbidden);
  }

  Ok(next.run(request).await)
}
