//! Liveness probe.

use axum::{Json, extract::State};
use kawa_core::ClientStore;
use serde_json::{Value, json};

use crate::{AppState, error::ApiError};

/// `GET /` — greets once the store answers a round trip.
pub async fn liveness<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Value>, ApiError>
where
  S: ClientStore + Clone + Send + Sync + 'static,
{
  state.store.ping().await.map_err(ApiError::store)?;
  Ok(Json(json!({ "Hello": "Client" })))
}
