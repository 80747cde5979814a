//! Process wiring for the Kawa client backend.
//!
//! Holds the runtime configuration and the concrete collaborators injected
//! into [`kawa_api::AppState`]: the HTTP token validator and the Pub/Sub
//! publisher.

pub mod auth;
pub mod pubsub;

use std::path::{Path, PathBuf};

use serde::Deserialize;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Prefix of environment variables overriding the config file.
pub const ENV_PREFIX: &str = "KAWA";

/// Runtime server configuration, deserialised from `config.toml` and
/// `KAWA_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  pub store_path:          PathBuf,
  /// Endpoint of the authentication service's token check.
  pub auth_url:            String,
  /// Pre-shared key identifying this service to the authentication service.
  pub service_key:         String,
  #[serde(default = "default_auth_timeout_secs")]
  pub auth_timeout_secs:   u64,
  pub google_project:      String,
  #[serde(default = "default_revoke_topic")]
  pub revoke_topic:        String,
  #[serde(default = "default_pubsub_endpoint")]
  pub pubsub_endpoint:     String,
  #[serde(default)]
  pub pubsub_access_token: Option<String>,
}

fn default_host() -> String { "0.0.0.0".to_string() }

fn default_port() -> u16 { 8000 }

fn default_auth_timeout_secs() -> u64 { 5 }

fn default_revoke_topic() -> String {
  "revoke-access-token-message-topic".to_string()
}

fn default_pubsub_endpoint() -> String {
  "https://pubsub.googleapis.com".to_string()
}

impl ServerConfig {
  /// Read `path` (if it exists) and overlay `KAWA_*` environment variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix(ENV_PREFIX))
      .build()?
      .try_deserialize()
  }

  /// `host:port` to bind.
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
