//! Integration tests for `MemoryStore`.

use carnet_core::{
  contact::{ContactFields, OwnerId},
  store::{DocumentStore, FeedEvent},
};
use uuid::Uuid;

use crate::{Error, MemoryStore};

fn owner() -> OwnerId { OwnerId(Uuid::new_v4()) }

fn fields(owner: OwnerId, name: &str, email: &str) -> ContactFields {
  ContactFields {
    owner_id:  owner,
    name:      name.into(),
    email:     email.into(),
    phone:     "555-0100".into(),
    photo_url: None,
  }
}

/// Drain the next event, which must be a snapshot.
async fn next_snapshot(
  sub: &mut carnet_core::store::FeedSubscription,
) -> Vec<carnet_core::contact::Contact> {
  match sub.recv().await {
    Some(FeedEvent::Snapshot(contacts)) => contacts,
    other => panic!("expected snapshot, got {other:?}"),
  }
}

// ─── Basic CRUD ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_find_by_email() {
  let store = MemoryStore::new();
  let u = owner();

  let id = store.allocate_id();
  store.insert(id, fields(u, "Ann", "ann@x.com")).await.unwrap();

  let found = store.find_by_email(u, "ann@x.com").await.unwrap();
  assert_eq!(found.map(|c| c.id), Some(id));

  let missing = store.find_by_email(u, "bob@x.com").await.unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn find_by_email_is_owner_scoped() {
  let store = MemoryStore::new();
  let u1 = owner();
  let u2 = owner();

  store
    .insert(store.allocate_id(), fields(u1, "Ann", "ann@x.com"))
    .await
    .unwrap();

  assert!(store.find_by_email(u2, "ann@x.com").await.unwrap().is_none());
}

#[tokio::test]
async fn insert_rejects_taken_id() {
  let store = MemoryStore::new();
  let u = owner();

  let id = store.allocate_id();
  store.insert(id, fields(u, "Ann", "ann@x.com")).await.unwrap();

  let result = store.insert(id, fields(u, "Bob", "bob@x.com")).await;
  assert!(matches!(result, Err(Error::AlreadyExists(taken)) if taken == id));
}

#[tokio::test]
async fn replace_keeps_insertion_slot() {
  let store = MemoryStore::new();
  let u = owner();

  let first = store.allocate_id();
  store.insert(first, fields(u, "Ann", "ann@x.com")).await.unwrap();
  let second = store.allocate_id();
  store.insert(second, fields(u, "Bob", "bob@x.com")).await.unwrap();

  store.replace(first, fields(u, "Annabel", "ann@x.com")).await.unwrap();

  let all = store.dump();
  assert_eq!(all.len(), 2);
  assert_eq!(all[0].id, first);
  assert_eq!(all[0].name, "Annabel");
  assert_eq!(all[1].name, "Bob");
}

#[tokio::test]
async fn replace_and_remove_missing_report_not_found() {
  let store = MemoryStore::new();
  let id = store.allocate_id();

  let r = store.replace(id, fields(owner(), "Ann", "ann@x.com")).await;
  assert!(matches!(r, Err(Error::NotFound(_))));

  let r = store.remove(id).await;
  assert!(matches!(r, Err(Error::NotFound(_))));
}

// ─── Live queries ────────────────────────────────────────────────────────────

#[tokio::test]
async fn query_yields_initial_snapshot_immediately() {
  let store = MemoryStore::new();
  let u = owner();
  store
    .insert(store.allocate_id(), fields(u, "Ann", "ann@x.com"))
    .await
    .unwrap();

  let mut sub = store.query(u).await.unwrap();
  let snapshot = next_snapshot(&mut sub).await;
  assert_eq!(snapshot.len(), 1);
  assert_eq!(snapshot[0].name, "Ann");
}

#[tokio::test]
async fn every_acknowledged_mutation_is_followed_by_a_snapshot() {
  let store = MemoryStore::new();
  let u = owner();
  let mut sub = store.query(u).await.unwrap();
  assert!(next_snapshot(&mut sub).await.is_empty());

  let id = store.allocate_id();
  store.insert(id, fields(u, "Ann", "ann@x.com")).await.unwrap();
  assert_eq!(next_snapshot(&mut sub).await.len(), 1);

  store.replace(id, fields(u, "Annabel", "ann@x.com")).await.unwrap();
  let snapshot = next_snapshot(&mut sub).await;
  assert_eq!(snapshot[0].name, "Annabel");

  store.remove(id).await.unwrap();
  assert!(next_snapshot(&mut sub).await.is_empty());
}

#[tokio::test]
async fn snapshots_are_scoped_to_the_subscribed_owner() {
  let store = MemoryStore::new();
  let u1 = owner();
  let u2 = owner();

  let mut sub = store.query(u1).await.unwrap();
  assert!(next_snapshot(&mut sub).await.is_empty());

  store
    .insert(store.allocate_id(), fields(u1, "Ann", "ann@x.com"))
    .await
    .unwrap();
  store
    .insert(store.allocate_id(), fields(u2, "Eve", "eve@x.com"))
    .await
    .unwrap();

  // Only u1's insert produced an event on u1's subscription.
  let snapshot = next_snapshot(&mut sub).await;
  assert_eq!(snapshot.len(), 1);
  assert_eq!(snapshot[0].name, "Ann");
  assert!(
    tokio::time::timeout(std::time::Duration::from_millis(20), sub.recv())
      .await
      .is_err(),
    "no event expected for another owner's mutation"
  );
}

#[tokio::test]
async fn dropped_subscriptions_are_pruned() {
  let store = MemoryStore::new();
  let u = owner();

  let sub = store.query(u).await.unwrap();
  drop(sub);

  // The next mutation notices the closed channel and prunes the watcher.
  store
    .insert(store.allocate_id(), fields(u, "Ann", "ann@x.com"))
    .await
    .unwrap();

  let mut live = store.query(u).await.unwrap();
  assert_eq!(next_snapshot(&mut live).await.len(), 1);
}
