//! Client records — the single resource managed by the backend.
//!
//! A [`Client`] is always fully populated once persisted. Partial data only
//! ever exists as a [`ClientPatch`] on its way to being merged into a stored
//! record.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

// ─── Column limits ───────────────────────────────────────────────────────────

/// Maximum lengths, in characters, of each client column.
pub mod limits {
  pub const LAST_NAME: usize = 100;
  pub const FIRST_NAME: usize = 60;
  pub const EMAIL: usize = 200;
  pub const ADDRESS: usize = 300;
  pub const POSTAL_CODE: usize = 10;
  pub const CITY: usize = 50;
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// A persisted client of the coffee business.
///
/// Two clients are equal when they share an `id`, whatever their other fields
/// say.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
  /// Assigned by the store on creation; never changes afterwards.
  pub id:          i64,
  pub last_name:   String,
  pub first_name:  String,
  pub email:       String,
  pub address:     String,
  pub postal_code: String,
  pub city:        String,
}

impl Client {
  /// Attach a store-assigned id to a creation candidate.
  pub fn from_new(id: i64, new: NewClient) -> Self {
    Self {
      id,
      last_name: new.last_name,
      first_name: new.first_name,
      email: new.email,
      address: new.address,
      postal_code: new.postal_code,
      city: new.city,
    }
  }
}

impl PartialEq for Client {
  fn eq(&self, other: &Self) -> bool { self.id == other.id }
}

impl Eq for Client {}

impl Hash for Client {
  fn hash<H: Hasher>(&self, state: &mut H) { self.id.hash(state); }
}

// ─── NewClient ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::ClientStore::create_client`].
/// The `id` is always assigned by the store; it is not accepted from callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
  pub last_name:   String,
  pub first_name:  String,
  pub email:       String,
  pub address:     String,
  pub postal_code: String,
  pub city:        String,
}

// ─── ClientPatch ─────────────────────────────────────────────────────────────

/// A partial update. `None` means the field was not provided and keeps its
/// stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientPatch {
  pub last_name:   Option<String>,
  pub first_name:  Option<String>,
  pub email:       Option<String>,
  pub address:     Option<String>,
  pub postal_code: Option<String>,
  pub city:        Option<String>,
}

impl ClientPatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  /// Overwrite every provided field on `client`, leaving the others alone.
  pub fn apply_to(self, client: &mut Client) {
    let Self { last_name, first_name, email, address, postal_code, city } =
      self;

    if let Some(v) = last_name {
      client.last_name = v;
    }
    if let Some(v) = first_name {
      client.first_name = v;
    }
    if let Some(v) = email {
      client.email = v;
    }
    if let Some(v) = address {
      client.address = v;
    }
    if let Some(v) = postal_code {
      client.postal_code = v;
    }
    if let Some(v) = city {
      client.city = v;
    }
  }
}

// ─── Projections ─────────────────────────────────────────────────────────────

/// Contact details of a client; computed, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
  pub email: String,
}

impl From<&Client> for ContactInfo {
  fn from(c: &Client) -> Self { Self { email: c.email.clone() } }
}

/// Name of a client; computed, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameInfo {
  pub last_name:  String,
  pub first_name: String,
}

impl From<&Client> for NameInfo {
  fn from(c: &Client) -> Self {
    Self {
      last_name:  c.last_name.clone(),
      first_name: c.first_name.clone(),
    }
  }
}
