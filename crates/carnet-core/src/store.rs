//! The `DocumentStore` trait and the live-query subscription types.
//!
//! The trait is implemented by storage backends (e.g. `carnet-store-memory`).
//! The engine depends on this abstraction, not on any concrete backend.

use std::future::Future;

use tokio::sync::mpsc;

use crate::contact::{Contact, ContactFields, ContactId, OwnerId};

// ─── Live-query stream ───────────────────────────────────────────────────────

/// One emission of a live query.
#[derive(Debug, Clone)]
pub enum FeedEvent {
  /// The full current result set. The store emits a snapshot immediately on
  /// subscription and again strictly after every acknowledged mutation that
  /// affects the scope.
  Snapshot(Vec<Contact>),
  /// The underlying subscription failed; no further snapshots will arrive.
  Lost(String),
}

/// Receiving side of a live query. Dropping it cancels the subscription —
/// the backend prunes the sender on the next failed delivery.
pub struct FeedSubscription {
  rx: mpsc::UnboundedReceiver<FeedEvent>,
}

impl FeedSubscription {
  /// Create a subscription and the sender a backend delivers events on.
  pub fn channel() -> (mpsc::UnboundedSender<FeedEvent>, Self) {
    let (tx, rx) = mpsc::unbounded_channel();
    (tx, Self { rx })
  }

  /// Next event, or `None` once the backend has dropped the sender.
  pub async fn recv(&mut self) -> Option<FeedEvent> { self.rx.recv().await }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the document store holding contact records.
///
/// Identifier allocation is split from insertion so a caller can associate
/// side assets (photo uploads) with a record's id before the record itself is
/// written. All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait DocumentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Provision a fresh record identifier. Pure generation, no I/O; the id is
  /// not visible in the store until [`DocumentStore::insert`] is called.
  fn allocate_id(&self) -> ContactId;

  /// Insert a new record under a previously-allocated id.
  /// Returns an error if the id is already taken.
  fn insert(
    &self,
    id: ContactId,
    fields: ContactFields,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Replace every field of an existing record. The id is the write target
  /// only; it is never part of the payload. Returns an error if the record
  /// does not exist.
  fn replace(
    &self,
    id: ContactId,
    fields: ContactFields,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove a record. Returns an error if it does not exist.
  fn remove(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Point lookup of at most one record owned by `owner` with exactly this
  /// email. Advisory only — the store does not enforce email uniqueness.
  fn find_by_email<'a>(
    &'a self,
    owner: OwnerId,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + 'a;

  /// Open a live query over all records owned by `owner`, ordered by
  /// insertion. The subscription yields the current set immediately and the
  /// full updated set after every acknowledged mutation in scope.
  fn query(
    &self,
    owner: OwnerId,
  ) -> impl Future<Output = Result<FeedSubscription, Self::Error>> + Send + '_;
}
