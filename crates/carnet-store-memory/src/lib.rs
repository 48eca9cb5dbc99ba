//! In-memory backend for the Carnet document store.
//!
//! The reference [`DocumentStore`](carnet_core::store::DocumentStore)
//! implementation the test-suite and the demo CLI run against. Holds the
//! contact table behind a plain mutex (never across an await) and fans out
//! live-query snapshots over per-subscriber channels.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::MemoryStore;

#[cfg(test)]
mod tests;
