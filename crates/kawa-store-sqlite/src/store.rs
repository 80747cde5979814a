//! [`SqliteStore`] — the SQLite implementation of [`ClientStore`].

use std::path::Path;

use kawa_core::{Client, ClientPatch, ClientStore, NewClient};
use rusqlite::OptionalExtension as _;

use crate::{
  schema::{CLIENT_COLUMNS, SCHEMA},
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A client store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Write every column of `client` back to its row.
  async fn write_back(&self, client: Client) -> Result<Client> {
    let row = client.clone();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE client
             SET last_name = ?2, first_name = ?3, email = ?4,
                 address = ?5, postal_code = ?6, city = ?7
           WHERE id = ?1",
          rusqlite::params![
            row.id,
            row.last_name,
            row.first_name,
            row.email,
            row.address,
            row.postal_code,
            row.city,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::Vanished(client.id));
    }
    Ok(client)
  }
}

fn read_client(row: &rusqlite::Row<'_>) -> rusqlite::Result<Client> {
  Ok(Client {
    id:          row.get(0)?,
    last_name:   row.get(1)?,
    first_name:  row.get(2)?,
    email:       row.get(3)?,
    address:     row.get(4)?,
    postal_code: row.get(5)?,
    city:        row.get(6)?,
  })
}

// ─── ClientStore impl ────────────────────────────────────────────────────────

impl ClientStore for SqliteStore {
  type Error = Error;

  async fn list_clients(&self) -> Result<Vec<Client>> {
    let clients = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {CLIENT_COLUMNS} FROM client ORDER BY id"))?;
        let rows = stmt
          .query_map([], read_client)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(clients)
  }

  async fn get_client(&self, id: i64) -> Result<Option<Client>> {
    let client = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {CLIENT_COLUMNS} FROM client WHERE id = ?1"),
              rusqlite::params![id],
              read_client,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(client)
  }

  async fn create_client(&self, candidate: NewClient) -> Result<Client> {
    let row = candidate.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO client (last_name, first_name, email, address, postal_code, city)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            row.last_name,
            row.first_name,
            row.email,
            row.address,
            row.postal_code,
            row.city,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(id, "inserted client row");
    Ok(Client::from_new(id, candidate))
  }

  async fn delete_client(&self, existing: Client) -> Result<()> {
    let id = existing.id;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM client WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::Vanished(id));
    }
    tracing::debug!(id, "deleted client row");
    Ok(())
  }

  async fn update_client(
    &self,
    existing: Client,
    delta:    ClientPatch,
  ) -> Result<Client> {
    if delta.is_empty() {
      return Ok(existing);
    }

    let mut merged = existing;
    delta.apply_to(&mut merged);
    self.write_back(merged).await
  }

  async fn ping(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
