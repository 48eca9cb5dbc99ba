//! The mutation coordinator.
//!
//! All writes to the contact set funnel through here: identity gating,
//! advisory duplicate-email detection, confirmation-gated overwrite and
//! deletion, photo upload ordered before the record write, and busy-indicator
//! bracketing. Failures are notified and logged, never propagated to the UI
//! layer as unhandled errors.

use std::sync::Arc;

use bytes::Bytes;
use carnet_core::{
  Error,
  collab::{
    AssetStore, BusyIndicator, ConfirmationPrompt, NoticeKind,
    NotificationSink,
  },
  contact::{Contact, ContactDraft, ContactFields, ContactId, OwnerId},
  identity::Identity,
  store::DocumentStore,
};
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::modal::SaveRequest;

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Result of [`MutationCoordinator::save`]. Failures have already been
/// notified and logged by the time the caller sees them.
#[derive(Debug)]
pub enum SaveOutcome {
  /// A new record was inserted.
  Created(ContactId),
  /// The record under edit was replaced.
  Updated(ContactId),
  /// A duplicate-email conflict was confirmed and the conflicting record was
  /// overwritten in place.
  Overwrote(ContactId),
  /// The user declined the duplicate overwrite; nothing was written.
  Declined,
  Failed(Error),
}

impl SaveOutcome {
  pub fn is_written(&self) -> bool {
    matches!(
      self,
      Self::Created(_) | Self::Updated(_) | Self::Overwrote(_)
    )
  }
}

/// Result of [`MutationCoordinator::delete`].
#[derive(Debug)]
pub enum DeleteOutcome {
  Removed,
  /// The user declined the confirmation; the store was never called.
  Declined,
  Failed(Error),
}

// ─── Coordinator ─────────────────────────────────────────────────────────────

/// Performs create/update/delete against the document store on behalf of the
/// current identity.
pub struct MutationCoordinator<S, A, P, N, B> {
  store:    Arc<S>,
  assets:   Arc<A>,
  prompt:   Arc<P>,
  notices:  Arc<N>,
  busy:     Arc<B>,
  identity: watch::Receiver<Option<Identity>>,
}

impl<S, A, P, N, B> MutationCoordinator<S, A, P, N, B>
where
  S: DocumentStore,
  A: AssetStore,
  P: ConfirmationPrompt,
  N: NotificationSink,
  B: BusyIndicator,
{
  pub fn new(
    store: Arc<S>,
    assets: Arc<A>,
    prompt: Arc<P>,
    notices: Arc<N>,
    busy: Arc<B>,
    identity: watch::Receiver<Option<Identity>>,
  ) -> Self {
    Self { store, assets, prompt, notices, busy, identity }
  }

  /// The owner to stamp on writes. Unverified identities do not count.
  fn current_owner(&self) -> Result<OwnerId, Error> {
    self
      .identity
      .borrow()
      .as_ref()
      .filter(|i| i.verified)
      .map(|i| i.id)
      .ok_or(Error::Unauthenticated)
  }

  // ── Save ──────────────────────────────────────────────────────────────

  /// Create or update a contact from the modal's staged state.
  ///
  /// The busy indicator brackets every store access and is released on all
  /// paths, the failing ones included. A duplicate-email conflict with a
  /// record other than the one being edited pauses for user confirmation
  /// (busy hidden while the prompt is up); on refusal nothing is written.
  pub async fn save(&self, request: SaveRequest) -> SaveOutcome {
    if let Err(e) = request.draft.validate() {
      self.report_save_error(&e);
      return SaveOutcome::Failed(e);
    }

    let owner = match self.current_owner() {
      Ok(owner) => owner,
      Err(e) => {
        self.report_save_error(&e);
        return SaveOutcome::Failed(e);
      }
    };

    // Advisory duplicate check: a point lookup, not a scan. Races with a
    // concurrent writer can still slip through; the store does not enforce
    // uniqueness.
    let duplicate = {
      let _busy = BusyGuard::hold(&*self.busy);
      match self.store.find_by_email(owner, &request.draft.email).await {
        Ok(found) => found,
        Err(e) => {
          let e = Error::store(e);
          self.report_save_error(&e);
          return SaveOutcome::Failed(e);
        }
      }
    };

    // A hit on the record currently under edit is not a conflict.
    let conflict = duplicate
      .filter(|d| Some(d.id) != request.editing.as_ref().map(|e| e.id));

    if let Some(existing) = conflict {
      let confirmed = self
        .prompt
        .ask(
          "Duplicate Contact Found",
          &format!(
            "A contact with email {} already exists for {}. Do you want to \
             overwrite the existing contact?",
            existing.email, existing.name
          ),
        )
        .await;

      if !confirmed {
        debug!(email = %request.draft.email, "duplicate overwrite declined");
        return SaveOutcome::Declined;
      }

      // Overwrite path: update the conflicting record in place.
      let _busy = BusyGuard::hold(&*self.busy);
      return match self
        .write_over(&existing, &request.draft, request.photo.clone())
        .await
      {
        Ok(id) => {
          info!(%id, "contact overwritten after duplicate confirmation");
          self.notify_saved();
          SaveOutcome::Overwrote(id)
        }
        Err(e) => {
          self.report_save_error(&e);
          SaveOutcome::Failed(e)
        }
      };
    }

    let _busy = BusyGuard::hold(&*self.busy);
    match &request.editing {
      Some(existing) => {
        match self
          .write_over(existing, &request.draft, request.photo.clone())
          .await
        {
          Ok(id) => {
            info!(%id, "contact updated");
            self.notify_saved();
            SaveOutcome::Updated(id)
          }
          Err(e) => {
            self.report_save_error(&e);
            SaveOutcome::Failed(e)
          }
        }
      }
      None => match self.create(owner, &request).await {
        Ok(id) => {
          info!(%id, "contact created");
          self.notify_saved();
          SaveOutcome::Created(id)
        }
        Err(e) => {
          self.report_save_error(&e);
          SaveOutcome::Failed(e)
        }
      },
    }
  }

  /// Replace `existing` with the draft applied over it, uploading a staged
  /// photo first so the written record can reference its URL.
  async fn write_over(
    &self,
    existing: &Contact,
    draft: &ContactDraft,
    photo: Option<Bytes>,
  ) -> Result<ContactId, Error> {
    let mut merged = existing.with_draft(draft);
    if let Some(data) = photo {
      // The record's id is already durable; associate the asset with it.
      let url = self
        .assets
        .upload(data, existing.id)
        .await
        .map_err(Error::upload)?;
      merged.photo_url = Some(url);
    }
    self
      .store
      .replace(merged.id, merged.fields())
      .await
      .map_err(Error::store)?;
    Ok(merged.id)
  }

  /// Insert a new record, provisioning its id ahead of the write so a staged
  /// photo can be associated before the record exists.
  async fn create(
    &self,
    owner: OwnerId,
    request: &SaveRequest,
  ) -> Result<ContactId, Error> {
    let id = self.store.allocate_id();

    let photo_url = match &request.photo {
      Some(data) => Some(
        self
          .assets
          .upload(data.clone(), id)
          .await
          .map_err(Error::upload)?,
      ),
      None => request.draft.photo_url.clone(),
    };

    let fields = ContactFields {
      owner_id: owner,
      name: request.draft.name.clone(),
      email: request.draft.email.clone(),
      phone: request.draft.phone.clone(),
      photo_url,
    };

    self.store.insert(id, fields).await.map_err(Error::store)?;
    Ok(id)
  }

  // ── Delete ────────────────────────────────────────────────────────────

  /// Delete `contact` after explicit confirmation. A declined prompt aborts
  /// silently — the store is never called.
  pub async fn delete(&self, contact: &Contact) -> DeleteOutcome {
    let confirmed = self
      .prompt
      .ask(
        "Confirm Deletion",
        &format!(
          "Are you sure you want to delete {}? This action cannot be undone.",
          contact.name
        ),
      )
      .await;

    if !confirmed {
      debug!(id = %contact.id, "deletion declined");
      return DeleteOutcome::Declined;
    }

    match self.store.remove(contact.id).await {
      Ok(()) => {
        info!(id = %contact.id, "contact deleted");
        self
          .notices
          .notify("Contact deleted successfully!", NoticeKind::Success);
        DeleteOutcome::Removed
      }
      Err(e) => {
        let e = Error::store(e);
        error!(id = %contact.id, error = %e, "contact deletion failed");
        self
          .notices
          .notify(&format!("Error deleting contact: {e}"), NoticeKind::Error);
        DeleteOutcome::Failed(e)
      }
    }
  }

  // ── Reporting ─────────────────────────────────────────────────────────

  fn notify_saved(&self) {
    self
      .notices
      .notify("Contact saved successfully!", NoticeKind::Success);
  }

  fn report_save_error(&self, e: &Error) {
    error!(error = %e, "contact save failed");
    self
      .notices
      .notify(&format!("Error saving contact: {e}"), NoticeKind::Error);
  }
}

// ─── Busy guard ──────────────────────────────────────────────────────────────

/// Holds the busy indicator shown; releases it on drop, so show/hide stay
/// balanced on early returns and error paths alike.
struct BusyGuard<'a, B: BusyIndicator + ?Sized> {
  busy: &'a B,
}

impl<'a, B: BusyIndicator + ?Sized> BusyGuard<'a, B> {
  fn hold(busy: &'a B) -> Self {
    busy.show();
    Self { busy }
  }
}

impl<B: BusyIndicator + ?Sized> Drop for BusyGuard<'_, B> {
  fn drop(&mut self) { self.busy.hide(); }
}
