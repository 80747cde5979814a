//! JSON REST API for the Kawa client backend.
//!
//! Exposes an axum [`Router`] backed by any [`kawa_core::ClientStore`].
//! The authentication service and the message bus are reached through the
//! [`TokenValidator`] and [`EventPublisher`] capabilities, so the binary
//! decides what actually sits behind them.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = kawa_api::router(state).layer(TraceLayer::new_for_http());
//! ```

pub mod clients;
pub mod error;
pub mod guard;
pub mod health;
pub mod logout;
pub mod schema;

use std::sync::Arc;

use axum::{
  Router, middleware,
  routing::{get, post},
};
use kawa_core::ClientStore;

pub use error::ApiError;
pub use guard::{TokenValidator, UpstreamError};
pub use logout::{EventPublisher, PublishError};

// ─── Application state ────────────────────────────────────────────────────────

/// Values handed to the collaborators on every call.
#[derive(Debug, Clone)]
pub struct ApiSettings {
  /// Pre-shared key identifying this service to the authentication service.
  pub service_key:  String,
  /// Topic receiving revoked tokens.
  pub revoke_topic: String,
}

/// Shared state threaded through all axum handlers.
///
/// Built once at startup; every handler receives a cheap clone.
#[derive(Clone)]
pub struct AppState<S: ClientStore> {
  pub store:     Arc<S>,
  pub validator: Arc<dyn TokenValidator>,
  pub publisher: Arc<dyn EventPublisher>,
  pub settings:  Arc<ApiSettings>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full router: guarded client routes plus the open logout and
/// liveness endpoints.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ClientStore + Clone + Send + Sync + 'static,
{
  let guarded = Router::new()
    .route("/client", get(clients::list::<S>).post(clients::create::<S>))
    .route("/client/", get(clients::list::<S>).post(clients::create::<S>))
    .route(
      "/client/{id}",
      get(clients::get_one::<S>)
        .patch(clients::patch::<S>)
        .delete(clients::remove::<S>),
    )
    .route("/client/{id}/contact-info/", get(clients::contact_info::<S>))
    .route("/client/{id}/name-info/", get(clients::name_info::<S>))
    .route_layer(middleware::from_fn_with_state(
      state.clone(),
      guard::require_token::<S>,
    ));

  Router::new()
    .route("/", get(health::liveness::<S>))
    .route("/client/deconnexion", post(logout::handler::<S>))
    .merge(guarded)
    .with_state(state)
}
