//! Error type for `kawa-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// The row was removed between the caller's existence check and the write.
  #[error("client {0} vanished before the write landed")]
  Vanished(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
