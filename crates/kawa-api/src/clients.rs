//! Handlers for `/client` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/client` | Every client |
//! | `POST`   | `/client` | Body: [`CreateClient`]; returns 201 + stored client |
//! | `GET`    | `/client/{id}` | 404 if not found |
//! | `PATCH`  | `/client/{id}` | Body: [`UpdateClient`]; only provided fields change |
//! | `DELETE` | `/client/{id}` | Returns `{"deleted": id}` |
//! | `GET`    | `/client/{id}/contact-info/` | [`ContactInfo`] |
//! | `GET`    | `/client/{id}/name-info/` | [`NameInfo`] |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use kawa_core::{Client, ClientStore, ContactInfo, NameInfo};
use serde_json::{Value, json};

use crate::{
  AppState,
  error::ApiError,
  schema::{CreateClient, UpdateClient, Validated},
};

/// Fetch a client or turn its absence into [`ApiError::NotFound`].
async fn existing<S>(store: &S, id: i64) -> Result<Client, ApiError>
where
  S: ClientStore,
{
  store
    .get_client(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound(id))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /client`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Client>>, ApiError>
where
  S: ClientStore + Clone + Send + Sync + 'static,
{
  let clients = state.store.list_clients().await.map_err(ApiError::store)?;
  Ok(Json(clients))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /client/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Client>, ApiError>
where
  S: ClientStore + Clone + Send + Sync + 'static,
{
  Ok(Json(existing(state.store.as_ref(), id).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /client` — returns 201 + the stored [`Client`] with its new id.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Validated(candidate): Validated<CreateClient>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ClientStore + Clone + Send + Sync + 'static,
{
  let client = state
    .store
    .create_client(candidate)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(id = client.id, "client created");
  Ok((StatusCode::CREATED, Json(client)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /client/{id}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError>
where
  S: ClientStore + Clone + Send + Sync + 'static,
{
  let client = existing(state.store.as_ref(), id).await?;
  state
    .store
    .delete_client(client)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(id, "client deleted");
  Ok(Json(json!({ "deleted": id })))
}

// ─── Patch ────────────────────────────────────────────────────────────────────

/// `PATCH /client/{id}` — merges the provided fields into the stored record.
pub async fn patch<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Validated(delta): Validated<UpdateClient>,
) -> Result<Json<Client>, ApiError>
where
  S: ClientStore + Clone + Send + Sync + 'static,
{
  let client = existing(state.store.as_ref(), id).await?;
  let updated = state
    .store
    .update_client(client, delta)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(id, "client updated");
  Ok(Json(updated))
}

// ─── Projections ──────────────────────────────────────────────────────────────

/// `GET /client/{id}/contact-info/`
pub async fn contact_info<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<ContactInfo>, ApiError>
where
  S: ClientStore + Clone + Send + Sync + 'static,
{
  let client = existing(state.store.as_ref(), id).await?;
  Ok(Json(ContactInfo::from(&client)))
}

/// `GET /client/{id}/name-info/`
pub async fn name_info<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<NameInfo>, ApiError>
where
  S: ClientStore + Clone + Send + Sync + 'static,
{
  let client = existing(state.store.as_ref(), id).await?;
  Ok(Json(NameInfo::from(&client)))
}
