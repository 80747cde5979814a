//! Core types and trait definitions for the Kawa client backend.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod client;
pub mod store;

pub use client::{Client, ClientPatch, ContactInfo, NameInfo, NewClient};
pub use store::ClientStore;
