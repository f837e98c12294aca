//! # storage-adapters
//!
//! Implementations of the `domains` storage ports. The in-memory store is
//! always available; Postgres sits behind the `db-postgres` feature.

pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use memory::InMemoryStore;

#[cfg(feature = "db-postgres")]
pub use postgres::PgStore;
