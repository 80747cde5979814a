//! Integration tests for `SqliteStore` against an in-memory database.

use kawa_core::{Client, ClientPatch, ClientStore, NewClient};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

/// Everything but the id, for comparing a stored row with its input.
fn fields(c: &Client) -> NewClient {
  NewClient {
    last_name:   c.last_name.clone(),
    first_name:  c.first_name.clone(),
    email:       c.email.clone(),
    address:     c.address.clone(),
    postal_code: c.postal_code.clone(),
    city:        c.city.clone(),
  }
}

fn dupont() -> NewClient {
  NewClient {
    last_name:   "Dupont".into(),
    first_name:  "Jean".into(),
    email:       "j@x.com".into(),
    address:     "9 rue X".into(),
    postal_code: "59000".into(),
    city:        "Lille".into(),
  }
}

fn martin() -> NewClient {
  NewClient {
    last_name:   "Martin".into(),
    first_name:  "Claire".into(),
    email:       "claire.martin@example.fr".into(),
    address:     "14 boulevard Vauban".into(),
    postal_code: "59800".into(),
    city:        "Lille".into(),
  }
}

// ─── Create / read ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_assigns_id_and_round_trips() {
  let s = store().await;

  let created = s.create_client(dupont()).await.unwrap();
  assert!(created.id > 0);
  assert_eq!(fields(&created), dupont());

  let fetched = s.get_client(created.id).await.unwrap().unwrap();
  assert_eq!(fetched, created);
  assert_eq!(fields(&fetched), dupont());
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get_client(42).await.unwrap().is_none());
}

#[tokio::test]
async fn list_returns_insertion_order() {
  let s = store().await;
  assert!(s.list_clients().await.unwrap().is_empty());

  let a = s.create_client(dupont()).await.unwrap();
  let b = s.create_client(martin()).await.unwrap();

  let all = s.list_clients().await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[0].id, a.id);
  assert_eq!(all[1].id, b.id);
  assert_eq!(all[1].email, "claire.martin@example.fr");
}

#[tokio::test]
async fn create_rejects_empty_field() {
  let s = store().await;
  let mut bad = dupont();
  bad.city = "   ".into();

  let err = s.create_client(bad).await.unwrap_err();
  assert!(matches!(err, Error::Database(_)), "got {err:?}");
  assert!(s.list_clients().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_rejects_overlong_postal_code() {
  let s = store().await;
  let mut bad = dupont();
  bad.postal_code = "59000-59000".into();

  assert!(s.create_client(bad).await.is_err());
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_merges_only_provided_fields() {
  let s = store().await;
  let created = s.create_client(dupont()).await.unwrap();

  let patch = ClientPatch { last_name: Some("B".into()), ..Default::default() };
  let updated = s.update_client(created.clone(), patch).await.unwrap();
  assert_eq!(updated.id, created.id);
  assert_eq!(updated.last_name, "B");

  let fetched = s.get_client(created.id).await.unwrap().unwrap();
  assert_eq!(fetched.last_name, "B");
  assert_eq!(fetched.first_name, "Jean");
  assert_eq!(fetched.email, "j@x.com");
  assert_eq!(fetched.address, "9 rue X");
  assert_eq!(fetched.postal_code, "59000");
  assert_eq!(fetched.city, "Lille");
}

#[tokio::test]
async fn empty_update_returns_record_unchanged() {
  let s = store().await;
  let created = s.create_client(dupont()).await.unwrap();

  let updated = s
    .update_client(created.clone(), ClientPatch::default())
    .await
    .unwrap();
  assert_eq!(fields(&updated), dupont());
}

#[tokio::test]
async fn update_of_vanished_row_fails() {
  let s = store().await;
  let created = s.create_client(dupont()).await.unwrap();
  s.delete_client(created.clone()).await.unwrap();

  let patch = ClientPatch { city: Some("Roubaix".into()), ..Default::default() };
  let err = s.update_client(created.clone(), patch).await.unwrap_err();
  assert!(matches!(err, Error::Vanished(id) if id == created.id));
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_row() {
  let s = store().await;
  let a = s.create_client(dupont()).await.unwrap();
  let b = s.create_client(martin()).await.unwrap();

  s.delete_client(a.clone()).await.unwrap();

  assert!(s.get_client(a.id).await.unwrap().is_none());
  let remaining = s.list_clients().await.unwrap();
  assert_eq!(remaining.len(), 1);
  assert_eq!(remaining[0].id, b.id);
}

#[tokio::test]
async fn delete_twice_reports_vanished() {
  let s = store().await;
  let a = s.create_client(dupont()).await.unwrap();

  s.delete_client(a.clone()).await.unwrap();
  assert!(matches!(
    s.delete_client(a).await,
    Err(Error::Vanished(_))
  ));
}

#[tokio::test]
async fn deleted_ids_are_never_reused() {
  let s = store().await;
  let a = s.create_client(dupont()).await.unwrap();
  s.delete_client(a.clone()).await.unwrap();

  let b = s.create_client(martin()).await.unwrap();
  assert!(b.id > a.id);
  assert!(s.get_client(a.id).await.unwrap().is_none());
}

// ─── Connectivity ────────────────────────────────────────────────────────────

#[tokio::test]
async fn ping_succeeds_on_open_store() {
  let s = store().await;
  s.ping().await.unwrap();
}

#[tokio::test]
async fn reopening_a_file_keeps_rows() {
  let dir = std::env::temp_dir().join(format!("kawa-store-{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("clients.db");
  let _ = std::fs::remove_file(&path);

  let id = {
    let s = SqliteStore::open(&path).await.unwrap();
    s.create_client(dupont()).await.unwrap().id
  };

  let s = SqliteStore::open(&path).await.unwrap();
  let fetched = s.get_client(id).await.unwrap().unwrap();
  assert_eq!(fields(&fetched), dupont());

  drop(s);
  let _ = std::fs::remove_dir_all(&dir);
}
