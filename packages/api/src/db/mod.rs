//! # Database module: PostgreSQL pool, migrations and the Postgres store
//!
//! ## Design
//!
//! The pool is opened once at startup by [`connect`] and handed to [`PgStore`],
//! which is then passed explicitly to the [`crate::Logbook`] service. There is no
//! process-wide handle; tests swap in [`store::MemoryStore`] instead.
//!
//! ## Re-exports
//!
//! - [`connect`]: opens a pool with up to 5 connections.
//! - [`migrate`]: applies the embedded `migrations/` directory.
//! - [`PgStore`]: the [`store::LogbookStore`] implementation over that pool.

mod pg_store;
mod pool;

pub use pg_store::PgStore;
pub use pool::{connect, migrate};
