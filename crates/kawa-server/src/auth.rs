//! [`TokenValidator`] backed by the remote authentication service.

use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use kawa_api::{TokenValidator, UpstreamError};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
struct ValidationRequest<'a> {
  token:       &'a str,
  service_key: &'a str,
}

/// Asks the authentication service whether a token is valid.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpTokenValidator {
  client: Client,
  url:    String,
}

impl HttpTokenValidator {
  /// Every call is bounded by `timeout`; there are no retries.
  pub fn new(url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self { client, url: url.into() })
  }
}

#[async_trait]
impl TokenValidator for HttpTokenValidator {
  async fn validate(
    &self,
    token: &str,
    service_key: &str,
  ) -> Result<bool, UpstreamError> {
    let resp = self
      .client
      .post(&self.url)
      .json(&ValidationRequest { token, service_key })
      .send()
      .await
      .map_err(|e| UpstreamError::Transport(e.to_string()))?;

    // Only a 200 carries a verdict; any other status is surfaced as is.
    let status = resp.status();
    if status != reqwest::StatusCode::OK {
      let status =
        StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
      return Err(UpstreamError::Status(status));
    }

    let body: Value = resp
      .json()
      .await
      .map_err(|e| UpstreamError::Transport(format!("unreadable verdict: {e}")))?;

    // Anything but a literal `true` counts as a refusal.
    Ok(body.get("validation") == Some(&Value::Bool(true)))
  }
}

#[cfg(test)]
mod tests {
  use axum::{Json, Router, routing::post};
  use serde_json::json;
  use tokio::net::TcpListener;

  use super::*;

  /// Serve a fake authentication service answering every check with
  /// `status` and `body`.
  async fn fake_auth(status: StatusCode, body: Value) -> String {
    let app = Router::new().route(
      "/validate",
      post(move |Json(req): Json<Value>| {
        let body = body.clone();
        async move {
          assert_eq!(req["service_key"], "svc-key");
          if req["token"] == "good" {
            (status, Json(body))
          } else {
            (status, Json(json!({ "validation": false })))
          }
        }
      }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}/validate")
  }

  fn validator(url: String) -> HttpTokenValidator {
    HttpTokenValidator::new(url, Duration::from_secs(5)).unwrap()
  }

  #[tokio::test]
  async fn accepted_token() {
    let url = fake_auth(StatusCode::OK, json!({ "validation": true })).await;
    assert!(validator(url).validate("good", "svc-key").await.unwrap());
  }

  #[tokio::test]
  async fn refused_token() {
    let url = fake_auth(StatusCode::OK, json!({ "validation": true })).await;
    assert!(!validator(url).validate("bad", "svc-key").await.unwrap());
  }

  #[tokio::test]
  async fn truthy_but_not_true_is_refused() {
    for body in [json!({ "validation": "true" }), json!({ "validation": 1 }), json!({})] {
      let url = fake_auth(StatusCode::OK, body).await;
      assert!(!validator(url).validate("good", "svc-key").await.unwrap());
    }
  }

  #[tokio::test]
  async fn error_status_is_carried() {
    let url = fake_auth(StatusCode::UNAUTHORIZED, json!({})).await;
    let err = validator(url).validate("good", "svc-key").await.unwrap_err();
    assert!(matches!(err, UpstreamError::Status(StatusCode::UNAUTHORIZED)));
  }

  #[tokio::test]
  async fn non_200_success_status_is_carried() {
    for status in [StatusCode::NO_CONTENT, StatusCode::ACCEPTED] {
      let url = fake_auth(status, json!({ "validation": true })).await;
      let err = validator(url).validate("good", "svc-key").await.unwrap_err();
      assert!(matches!(err, UpstreamError::Status(s) if s == status), "{status}");
    }
  }

  #[tokio::test]
  async fn unreachable_service_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = validator(format!("http://{addr}/validate"))
      .validate("good", "svc-key")
      .await
      .unwrap_err();
    assert!(matches!(err, UpstreamError::Transport(_)));
  }
}
