//! Token revocation on logout.
//!
//! Logout is not guarded: the token being revoked is the only input. The
//! revocation itself is done by whoever listens on the topic; this side only
//! emits the event and never waits for an acknowledgement.

use async_trait::async_trait;
use axum::{Json, extract::State};
use kawa_core::ClientStore;
use serde_json::{Value, json};
use thiserror::Error;

use crate::{
  AppState,
  schema::{Token, TokenBody, Validated},
};

#[derive(Debug, Error)]
#[error("publish failed: {0}")]
pub struct PublishError(pub String);

/// Capability to push raw bytes onto a message bus topic.
#[async_trait]
pub trait EventPublisher: Send + Sync {
  async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), PublishError>;
}

/// `POST /client/deconnexion` — body: `{"token":"..."}`.
///
/// Answers `{"token":"revoked"}` straight away. The publish runs on its own
/// task and its outcome is only logged.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Validated(Token(token)): Validated<TokenBody>,
) -> Json<Value>
where
  S: ClientStore + Clone + Send + Sync + 'static,
{
  let publisher = state.publisher.clone();
  let settings = state.settings.clone();
  tokio::spawn(async move {
    let topic = settings.revoke_topic.as_str();
    match publisher.publish(topic, token.into_bytes()).await {
      Ok(()) => tracing::info!(topic, "token revocation published"),
      Err(e) => tracing::warn!(topic, error = %e, "token revocation not published"),
    }
  });

  Json(json!({ "token": "revoked" }))
}
