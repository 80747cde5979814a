//! [`EventPublisher`] for Google Cloud Pub/Sub over its REST interface.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use kawa_api::{EventPublisher, PublishError};
use reqwest::Client;
use serde_json::json;

/// Publishes raw payloads to topics of one Pub/Sub project.
///
/// `endpoint` is normally `https://pubsub.googleapis.com`; pointing it at a
/// local emulator works the same way.
#[derive(Clone)]
pub struct PubSubPublisher {
  client:       Client,
  endpoint:     String,
  project:      String,
  access_token: Option<String>,
}

impl PubSubPublisher {
  pub fn new(
    endpoint: impl Into<String>,
    project: impl Into<String>,
    access_token: Option<String>,
  ) -> reqwest::Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
    Ok(Self {
      client,
      endpoint: endpoint.into(),
      project: project.into(),
      access_token,
    })
  }

  fn topic_url(&self, topic: &str) -> String {
    format!(
      "{}/v1/projects/{}/topics/{}:publish",
      self.endpoint.trim_end_matches('/'),
      self.project,
      topic
    )
  }
}

#[async_trait]
impl EventPublisher for PubSubPublisher {
  async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), PublishError> {
    let body = json!({ "messages": [{ "data": B64.encode(&payload) }] });

    let mut req = self.client.post(self.topic_url(topic)).json(&body);
    if let Some(token) = &self.access_token {
      req = req.bearer_auth(token);
    }

    let resp = req
      .send()
      .await
      .map_err(|e| PublishError(e.to_string()))?;

    if !resp.status().is_success() {
      return Err(PublishError(format!("{topic} → {}", resp.status())));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use axum::{
    Json, Router,
    extract::Path,
    http::{HeaderMap, StatusCode},
    routing::post,
  };
  use serde_json::Value;
  use tokio::net::TcpListener;

  use super::*;

  type Seen = Arc<Mutex<Vec<(String, Option<String>, Value)>>>;

  /// Serve a fake Pub/Sub endpoint recording `(path tail, auth header, body)`.
  async fn fake_pubsub(status: StatusCode) -> (String, Seen) {
    let seen: Seen = Arc::default();
    let sink = seen.clone();

    let app = Router::new().route(
      "/v1/projects/{project}/topics/{topic}",
      post(
        move |Path((project, topic)): Path<(String, String)>,
              headers: HeaderMap,
              Json(body): Json<Value>| {
          let sink = sink.clone();
          async move {
            let auth = headers
              .get("authorization")
              .and_then(|v| v.to_str().ok())
              .map(str::to_owned);
            sink.lock().unwrap().push((format!("{project}/{topic}"), auth, body));
            (status, Json(json!({ "messageIds": ["1"] })))
          }
        },
      ),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    (format!("http://{addr}"), seen)
  }

  #[tokio::test]
  async fn publishes_base64_payload_to_topic() {
    let (endpoint, seen) = fake_pubsub(StatusCode::OK).await;
    let publisher =
      PubSubPublisher::new(endpoint, "paye-ton-kawa", Some("gcp-token".into()))
        .unwrap();

    publisher
      .publish("revoke-access-token-message-topic", b"abc123".to_vec())
      .await
      .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (path, auth, body) = &seen[0];
    assert_eq!(path, "paye-ton-kawa/revoke-access-token-message-topic:publish");
    assert_eq!(auth.as_deref(), Some("Bearer gcp-token"));
    assert_eq!(body["messages"][0]["data"], B64.encode(b"abc123"));
  }

  #[tokio::test]
  async fn error_status_is_a_publish_error() {
    let (endpoint, _seen) = fake_pubsub(StatusCode::NOT_FOUND).await;
    let publisher = PubSubPublisher::new(endpoint, "p", None).unwrap();

    assert!(publisher.publish("t", b"x".to_vec()).await.is_err());
  }

  #[test]
  fn topic_url_tolerates_trailing_slash() {
    let publisher =
      PubSubPublisher::new("http://localhost:8085/", "p", None).unwrap();
    assert_eq!(
      publisher.topic_url("t"),
      "http://localhost:8085/v1/projects/p/topics/t:publish"
    );
  }
}
