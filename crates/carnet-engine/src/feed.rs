//! The live contact feed.
//!
//! A background task keyed to the identity stream: while an identity is
//! present and verified it holds exactly one open store subscription scoped
//! to that owner, forwarding every snapshot into a watch channel; when the
//! identity changes it drops the old subscription *before* opening the new
//! one, so a stale subscription can never emit after a switch.

use std::sync::Arc;

use carnet_core::{
  collab::{NoticeKind, NotificationSink},
  contact::Contact,
  identity::Identity,
  store::{DocumentStore, FeedEvent},
};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, warn};

// ─── Published state ─────────────────────────────────────────────────────────

/// What the feed currently knows. An errored feed renders as an empty list;
/// the error is kept alongside so the UI can tell the two apart.
#[derive(Debug, Clone, Default)]
pub struct FeedState {
  /// Owner-scoped contacts in insertion order. Empty while signed out,
  /// unverified, or errored.
  pub contacts: Vec<Contact>,
  /// Set when the underlying subscription failed.
  pub error:    Option<String>,
}

impl FeedState {
  fn empty() -> Self { Self::default() }

  fn ready(contacts: Vec<Contact>) -> Self {
    Self { contacts, error: None }
  }

  fn failed(reason: String) -> Self {
    Self { contacts: Vec::new(), error: Some(reason) }
  }
}

// ─── Feed ────────────────────────────────────────────────────────────────────

/// Handle to the running feed task. Dropping it aborts the task and thereby
/// the store subscription.
pub struct ContactFeed {
  rx:   watch::Receiver<FeedState>,
  task: JoinHandle<()>,
}

impl ContactFeed {
  /// Spawn the feed task.
  ///
  /// `identity` is the stream from
  /// [`SessionHandle::observe`](carnet_core::identity::SessionHandle::observe);
  /// subscription failures are pushed to `notices` once per occurrence.
  pub fn spawn<S, N>(
    store: Arc<S>,
    identity: watch::Receiver<Option<Identity>>,
    notices: Arc<N>,
  ) -> Self
  where
    S: DocumentStore + 'static,
    N: NotificationSink + 'static,
  {
    let (tx, rx) = watch::channel(FeedState::empty());
    let task = tokio::spawn(run(store, identity, notices, tx));
    Self { rx, task }
  }

  /// Subscribe to feed state changes.
  pub fn watch(&self) -> watch::Receiver<FeedState> { self.rx.clone() }

  /// The current state.
  pub fn current(&self) -> FeedState { self.rx.borrow().clone() }
}

impl Drop for ContactFeed {
  fn drop(&mut self) { self.task.abort(); }
}

// ─── Task ────────────────────────────────────────────────────────────────────

async fn run<S, N>(
  store: Arc<S>,
  mut identity: watch::Receiver<Option<Identity>>,
  notices: Arc<N>,
  tx: watch::Sender<FeedState>,
) where
  S: DocumentStore,
  N: NotificationSink,
{
  loop {
    // Unverified identities get the same treatment as absent ones: an empty
    // feed, and no store subscription that could leak records.
    let owner = identity
      .borrow_and_update()
      .as_ref()
      .filter(|i| i.verified)
      .map(|i| i.id);

    let Some(owner) = owner else {
      tx.send_replace(FeedState::empty());
      if identity.changed().await.is_err() {
        return;
      }
      continue;
    };

    debug!(%owner, "opening contact subscription");
    let mut sub = match store.query(owner).await {
      Ok(sub) => sub,
      Err(e) => {
        warn!(%owner, error = %e, "contact subscription failed to open");
        notices
          .notify(&format!("Error loading contacts: {e}"), NoticeKind::Error);
        tx.send_replace(FeedState::failed(e.to_string()));
        // Nothing to do but wait for the identity to change.
        if identity.changed().await.is_err() {
          return;
        }
        continue;
      }
    };

    loop {
      tokio::select! {
        // Identity transitions win over pending snapshots. Breaking out
        // ends this iteration's scope, dropping `sub` before the next
        // subscription is opened.
        biased;

        changed = identity.changed() => {
          if changed.is_err() {
            return;
          }
          break;
        }

        event = sub.recv() => {
          match event {
            Some(FeedEvent::Snapshot(contacts)) => {
              tx.send_replace(FeedState::ready(contacts));
            }
            other => {
              let reason = match other {
                Some(FeedEvent::Lost(r)) => r,
                _ => "subscription closed by the store".to_string(),
              };
              warn!(%owner, %reason, "contact subscription lost");
              notices.notify(
                &format!("Error loading contacts: {reason}"),
                NoticeKind::Error,
              );
              tx.send_replace(FeedState::failed(reason));
              if identity.changed().await.is_err() {
                return;
              }
              break;
            }
          }
        }
      }
    }
  }
}
