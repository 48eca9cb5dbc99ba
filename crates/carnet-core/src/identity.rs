//! Identity — the authenticated principal issuing requests.
//!
//! The engine never talks to an authentication backend; it observes a
//! continuously-updated `Option<Identity>` through a [`tokio::sync::watch`]
//! channel. Absence is an ordinary value, not an error — every mutation path
//! has to handle it explicitly.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

use crate::contact::OwnerId;

/// Coarse authorisation role carried on the identity. Visibility of contacts
/// is always owner-scoped; the role does not widen the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  User,
}

/// The authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  pub id:       OwnerId,
  /// Whether the account's email address has been verified. Unverified
  /// identities are treated as absent by the feed and the coordinator.
  pub verified: bool,
  pub role:     Role,
}

impl Identity {
  pub fn new(id: OwnerId, role: Role) -> Self {
    Self { id, verified: true, role }
  }
}

// ─── Session handle ──────────────────────────────────────────────────────────

/// Owner side of the identity stream.
///
/// Production deployments would drive this from a real authentication
/// backend; the test-suite and the demo CLI drive it directly.
pub struct SessionHandle {
  tx: watch::Sender<Option<Identity>>,
}

impl SessionHandle {
  /// Create a signed-out session.
  pub fn new() -> Self {
    let (tx, _rx) = watch::channel(None);
    Self { tx }
  }

  /// Subscribe to identity changes. The receiver always holds the current
  /// value; `changed()` resolves on every transition.
  pub fn observe(&self) -> watch::Receiver<Option<Identity>> {
    self.tx.subscribe()
  }

  /// The identity at this instant, if any.
  pub fn current(&self) -> Option<Identity> { self.tx.borrow().clone() }

  pub fn sign_in(&self, identity: Identity) {
    self.tx.send_replace(Some(identity));
  }

  pub fn sign_out(&self) { self.tx.send_replace(None); }

  /// Sign in a fresh verified identity with a random id; returns it.
  pub fn sign_in_new(&self, role: Role) -> Identity {
    let identity = Identity::new(OwnerId(Uuid::new_v4()), role);
    self.sign_in(identity.clone());
    identity
  }
}

impl Default for SessionHandle {
  fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn observers_see_sign_in_and_out() {
    let session = SessionHandle::new();
    let mut rx = session.observe();
    assert!(rx.borrow().is_none());

    let identity = session.sign_in_new(Role::User);
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow().as_ref(), Some(&identity));

    session.sign_out();
    rx.changed().await.unwrap();
    assert!(rx.borrow().is_none());
  }
}
