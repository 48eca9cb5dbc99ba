//! [`MemoryStore`] — the in-memory implementation of `DocumentStore`.

use std::sync::{Arc, Mutex};

use carnet_core::{
  contact::{Contact, ContactFields, ContactId, OwnerId},
  store::{DocumentStore, FeedEvent, FeedSubscription},
};
use tokio::sync::mpsc;
use tracing::trace;

use crate::{Error, Result};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contact store backed by an insertion-ordered in-memory table.
///
/// Cloning is cheap — the inner table is reference-counted, so clones see the
/// same data. Per-record atomicity comes from the table mutex; concurrent
/// writers are not otherwise serialised, exactly like the remote stores this
/// stands in for.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
  /// Insertion order is the feed order; `replace` keeps a record's slot.
  contacts: Vec<Contact>,
  watchers: Vec<Watcher>,
}

struct Watcher {
  owner: OwnerId,
  tx:    mpsc::UnboundedSender<FeedEvent>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// All records, unscoped, in insertion order. Test convenience.
  pub fn dump(&self) -> Vec<Contact> {
    self.inner.lock().expect("store mutex poisoned").contacts.clone()
  }

  /// Broadcast the current owner-scoped set to every watcher of `owner`,
  /// pruning watchers whose subscription has been dropped.
  fn publish(inner: &mut Inner, owner: OwnerId) {
    let snapshot: Vec<Contact> = inner
      .contacts
      .iter()
      .filter(|c| c.owner_id == owner)
      .cloned()
      .collect();

    inner.watchers.retain(|w| {
      if w.owner != owner {
        return true;
      }
      w.tx.send(FeedEvent::Snapshot(snapshot.clone())).is_ok()
    });
  }
}

impl DocumentStore for MemoryStore {
  type Error = Error;

  fn allocate_id(&self) -> ContactId { ContactId::random() }

  async fn insert(&self, id: ContactId, fields: ContactFields) -> Result<()> {
    let mut inner = self.inner.lock().expect("store mutex poisoned");
    if inner.contacts.iter().any(|c| c.id == id) {
      return Err(Error::AlreadyExists(id));
    }
    let owner = fields.owner_id;
    inner.contacts.push(Contact::from_fields(id, fields));
    trace!(%id, %owner, "inserted contact");
    Self::publish(&mut inner, owner);
    Ok(())
  }

  async fn replace(&self, id: ContactId, fields: ContactFields) -> Result<()> {
    let mut inner = self.inner.lock().expect("store mutex poisoned");
    let Some(slot) = inner.contacts.iter().position(|c| c.id == id) else {
      return Err(Error::NotFound(id));
    };
    let previous_owner = inner.contacts[slot].owner_id;
    let owner = fields.owner_id;
    inner.contacts[slot] = Contact::from_fields(id, fields);
    trace!(%id, %owner, "replaced contact");
    Self::publish(&mut inner, owner);
    if previous_owner != owner {
      Self::publish(&mut inner, previous_owner);
    }
    Ok(())
  }

  async fn remove(&self, id: ContactId) -> Result<()> {
    let mut inner = self.inner.lock().expect("store mutex poisoned");
    let Some(slot) = inner.contacts.iter().position(|c| c.id == id) else {
      return Err(Error::NotFound(id));
    };
    let owner = inner.contacts.remove(slot).owner_id;
    trace!(%id, %owner, "removed contact");
    Self::publish(&mut inner, owner);
    Ok(())
  }

  async fn find_by_email(
    &self,
    owner: OwnerId,
    email: &str,
  ) -> Result<Option<Contact>> {
    let inner = self.inner.lock().expect("store mutex poisoned");
    Ok(
      inner
        .contacts
        .iter()
        .find(|c| c.owner_id == owner && c.email == email)
        .cloned(),
    )
  }

  async fn query(&self, owner: OwnerId) -> Result<FeedSubscription> {
    let (tx, sub) = FeedSubscription::channel();

    let mut inner = self.inner.lock().expect("store mutex poisoned");
    let snapshot: Vec<Contact> = inner
      .contacts
      .iter()
      .filter(|c| c.owner_id == owner)
      .cloned()
      .collect();
    // Initial snapshot first, then register for subsequent mutations.
    let _ = tx.send(FeedEvent::Snapshot(snapshot));
    inner.watchers.push(Watcher { owner, tx });

    Ok(sub)
  }
}
