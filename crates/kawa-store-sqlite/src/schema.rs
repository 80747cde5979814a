//! SQL schema for the Kawa SQLite store.
//!
//! Executed once at connection startup. Column limits mirror
//! [`kawa_core::client::limits`].

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- AUTOINCREMENT keeps ids of deleted rows from ever being handed out again.
CREATE TABLE IF NOT EXISTS client (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    last_name   TEXT NOT NULL CHECK (length(trim(last_name))   > 0 AND length(last_name)   <= 100),
    first_name  TEXT NOT NULL CHECK (length(trim(first_name))  > 0 AND length(first_name)  <= 60),
    email       TEXT NOT NULL CHECK (length(trim(email))       > 0 AND length(email)       <= 200),
    address     TEXT NOT NULL CHECK (length(trim(address))     > 0 AND length(address)     <= 300),
    postal_code TEXT NOT NULL CHECK (length(trim(postal_code)) > 0 AND length(postal_code) <= 10),
    city        TEXT NOT NULL CHECK (length(trim(city))        > 0 AND length(city)        <= 50)
);

PRAGMA user_version = 1;
";

/// Column list shared by every `SELECT`, in [`crate::store`] row order.
pub const CLIENT_COLUMNS: &str =
  "id, last_name, first_name, email, address, postal_code, city";
