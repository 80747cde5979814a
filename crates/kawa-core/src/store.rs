//! The `ClientStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `kawa-store-sqlite`).
//! Higher layers (`kawa-api`, `kawa-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::client::{Client, ClientPatch, NewClient};

/// Abstraction over the relational store holding client rows.
///
/// Every method is a single logical transaction touching at most one row.
/// A missing row is reported as `Ok(None)` by [`ClientStore::get_client`],
/// never as an error; callers decide what absence means.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ClientStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return every client, in insertion order.
  fn list_clients(
    &self,
  ) -> impl Future<Output = Result<Vec<Client>, Self::Error>> + Send + '_;

  /// Point lookup by primary key. Returns `None` if not found.
  fn get_client(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Client>, Self::Error>> + Send + '_;

  /// Insert a new row and return it with its store-assigned id.
  fn create_client(
    &self,
    candidate: NewClient,
  ) -> impl Future<Output = Result<Client, Self::Error>> + Send + '_;

  /// Remove the row for `existing`.
  ///
  /// The caller must already have confirmed the row exists via
  /// [`ClientStore::get_client`].
  fn delete_client(
    &self,
    existing: Client,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Merge `delta` into `existing`, persist the result and return it.
  fn update_client(
    &self,
    existing: Client,
    delta: ClientPatch,
  ) -> impl Future<Output = Result<Client, Self::Error>> + Send + '_;

  /// Cheap round trip proving the store is reachable.
  fn ping(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
