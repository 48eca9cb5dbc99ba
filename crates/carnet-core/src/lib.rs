//! Core types and trait definitions for the Carnet contact engine.
//!
//! This crate is deliberately free of I/O and UI dependencies. It defines the
//! contact data model, the identity types, and the collaborator contracts
//! (document store, asset store, confirmation prompt, notification sink, busy
//! indicator) that the engine crate is generic over. All other crates depend
//! on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod collab;
pub mod contact;
pub mod error;
pub mod identity;
pub mod store;

pub use error::{Error, Result};
