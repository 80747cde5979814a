//! Request schemas and the [`Validated`] extractor.
//!
//! Each body type deserialises leniently (every field optional) so that all
//! problems can be reported at once, then [`Schema::validate`] turns it into
//! the strict domain type. Anything that fails here never reaches the store.

use std::fmt;

use axum::{
  Json,
  extract::{FromRequest, Request},
};
use kawa_core::{ClientPatch, NewClient, client::limits};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};

use crate::error::ApiError;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field:   String,
  pub message: String,
}

/// Every problem found in one request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
  /// The body could not be read as the expected JSON shape at all.
  pub fn body(message: impl Into<String>) -> Self {
    Self(vec![FieldError { field: "body".into(), message: message.into() }])
  }

  pub fn push(&mut self, field: &str, message: impl Into<String>) {
    self.0.push(FieldError { field: field.into(), message: message.into() });
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  fn into_result<T>(self, value: T) -> Result<T, Self> {
    if self.is_empty() { Ok(value) } else { Err(self) }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, e) in self.0.iter().enumerate() {
      if i > 0 {
        f.write_str("; ")?;
      }
      write!(f, "{}: {}", e.field, e.message)?;
    }
    Ok(())
  }
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// A JSON body that can be checked into a stricter type.
pub trait Schema: DeserializeOwned + Send {
  type Output;

  fn validate(self) -> Result<Self::Output, ValidationErrors>;
}

/// Extracts a JSON body of type `T` and validates it.
///
/// Malformed JSON, a wrong content type and failed validation are all
/// rejected with 422.
pub struct Validated<T: Schema>(pub T::Output);

impl<T, St> FromRequest<St> for Validated<T>
where
  T: Schema,
  St: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &St) -> Result<Self, Self::Rejection> {
    let Json(body) = Json::<T>::from_request(req, state)
      .await
      .map_err(|rejection| {
        ApiError::Validation(ValidationErrors::body(rejection.body_text()))
      })?;

    body.validate().map(Validated).map_err(ApiError::Validation)
  }
}

// ─── Field rules ─────────────────────────────────────────────────────────────

fn check_text(
  errors: &mut ValidationErrors,
  field:  &str,
  value:  &str,
  max:    usize,
) {
  if value.trim().is_empty() {
    errors.push(field, "must not be empty");
  } else if value.chars().count() > max {
    errors.push(field, format!("must be at most {max} characters"));
  }
}

fn check_email(errors: &mut ValidationErrors, value: &str) {
  let before = errors.0.len();
  check_text(errors, "email", value, limits::EMAIL);
  if errors.0.len() != before {
    return;
  }

  let well_formed = match value.split_once('@') {
    Some((local, domain)) => {
      !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
    }
    None => false,
  };
  if !well_formed {
    errors.push("email", "must be an address of the form local@domain");
  }
}

/// Check one field of a client body against its column rules.
fn check_field(errors: &mut ValidationErrors, field: &str, value: &str) {
  match field {
    "email" => check_email(errors, value),
    "last_name" => check_text(errors, field, value, limits::LAST_NAME),
    "first_name" => check_text(errors, field, value, limits::FIRST_NAME),
    "address" => check_text(errors, field, value, limits::ADDRESS),
    "postal_code" => check_text(errors, field, value, limits::POSTAL_CODE),
    "city" => check_text(errors, field, value, limits::CITY),
    _ => {}
  }
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// Body of `POST /client`. Every field is required; `id` is server-assigned
/// and ignored if sent.
#[derive(Debug, Deserialize)]
pub struct CreateClient {
  pub last_name:   Option<String>,
  pub first_name:  Option<String>,
  pub email:       Option<String>,
  pub address:     Option<String>,
  pub postal_code: Option<String>,
  pub city:        Option<String>,
}

impl Schema for CreateClient {
  type Output = NewClient;

  fn validate(self) -> Result<NewClient, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let mut required = |field: &str, value: Option<String>| match value {
      Some(v) => {
        check_field(&mut errors, field, &v);
        v
      }
      None => {
        errors.push(field, "field required");
        String::new()
      }
    };

    let client = NewClient {
      last_name:   required("last_name", self.last_name),
      first_name:  required("first_name", self.first_name),
      email:       required("email", self.email),
      address:     required("address", self.address),
      postal_code: required("postal_code", self.postal_code),
      city:        required("city", self.city),
    };

    errors.into_result(client)
  }
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// Distinguishes an absent key (`None`) from an explicit `null`
/// (`Some(None)`).
fn present<'de, D>(d: D) -> Result<Option<Option<String>>, D::Error>
where
  D: Deserializer<'de>,
{
  Option::<String>::deserialize(d).map(Some)
}

/// Body of `PATCH /client/{id}`. Keys left out or sent as `null` are not
/// touched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateClient {
  #[serde(default, deserialize_with = "present")]
  pub last_name:   Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub first_name:  Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub email:       Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub address:     Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub postal_code: Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub city:        Option<Option<String>>,
}

impl Schema for UpdateClient {
  type Output = ClientPatch;

  fn validate(self) -> Result<ClientPatch, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let mut optional = |field: &str, value: Option<Option<String>>| match value {
      None | Some(None) => None,
      Some(Some(v)) => {
        check_field(&mut errors, field, &v);
        Some(v)
      }
    };

    let patch = ClientPatch {
      last_name:   optional("last_name", self.last_name),
      first_name:  optional("first_name", self.first_name),
      email:       optional("email", self.email),
      address:     optional("address", self.address),
      postal_code: optional("postal_code", self.postal_code),
      city:        optional("city", self.city),
    };

    errors.into_result(patch)
  }
}

// ─── Token ───────────────────────────────────────────────────────────────────

/// A bearer token handed in for revocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(pub String);

/// Body of `POST /client/deconnexion`.
#[derive(Debug, Deserialize)]
pub struct TokenBody {
  pub token: Option<String>,
}

impl Schema for TokenBody {
  type Output = Token;

  fn validate(self) -> Result<Token, ValidationErrors> {
    match self.token {
      Some(t) if !t.is_empty() => Ok(Token(t)),
      Some(_) => {
        let mut errors = ValidationErrors::default();
        errors.push("token", "must not be empty");
        Err(errors)
      }
      None => {
        let mut errors = ValidationErrors::default();
        errors.push("token", "field required");
        Err(errors)
      }
    }
  }
}
