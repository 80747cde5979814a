//! kawa-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite client store, wires the authentication and Pub/Sub collaborators,
//! and serves the JSON API over HTTP.

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::Parser;
use kawa_api::{ApiSettings, AppState};
use kawa_server::{
  ServerConfig, auth::HttpTokenValidator, expand_tilde, pubsub::PubSubPublisher,
};
use kawa_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Kawa client backend")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let validator = HttpTokenValidator::new(
    server_cfg.auth_url.clone(),
    Duration::from_secs(server_cfg.auth_timeout_secs),
  )
  .context("failed to build authentication client")?;

  let publisher = PubSubPublisher::new(
    server_cfg.pubsub_endpoint.clone(),
    server_cfg.google_project.clone(),
    server_cfg.pubsub_access_token.clone(),
  )
  .context("failed to build Pub/Sub client")?;

  let state = AppState {
    store:     Arc::new(store),
    validator: Arc::new(validator),
    publisher: Arc::new(publisher),
    settings:  Arc::new(ApiSettings {
      service_key:  server_cfg.service_key.clone(),
      revoke_topic: server_cfg.revoke_topic.clone(),
    }),
  };

  let app = kawa_api::router(state).layer(TraceLayer::new_for_http());
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for ctrl-c");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}
