//! The add/edit modal state machine.
//!
//! Tracks whether no record, a new record, or an existing record is being
//! edited, and stages the form draft plus any not-yet-uploaded photo. Every
//! transition into `Closed` clears the staged state, so nothing leaks into
//! the next open.

use bytes::Bytes;
use carnet_core::contact::{Contact, ContactDraft};

// ─── States ──────────────────────────────────────────────────────────────────

/// What the open modal is editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMode {
  /// Creating a record that does not exist yet.
  Add,
  /// Editing a snapshot of an existing record, re-read at open time.
  Edit(Contact),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModalState {
  #[default]
  Closed,
  Open(EditMode),
}

// ─── Save request ────────────────────────────────────────────────────────────

/// Snapshot of the modal's staged state, handed to the mutation coordinator
/// on submit. Detached from the modal: closing the modal afterwards does not
/// affect an in-flight save built from this.
#[derive(Debug, Clone)]
pub struct SaveRequest {
  pub draft:   ContactDraft,
  /// The record being edited, if any; `None` means create.
  pub editing: Option<Contact>,
  /// Staged image bytes to upload before the record write.
  pub photo:   Option<Bytes>,
}

// ─── Modal ───────────────────────────────────────────────────────────────────

/// The modal edit state machine.
#[derive(Debug, Default)]
pub struct EditModal {
  state: ModalState,
  draft: ContactDraft,
  photo: Option<Bytes>,
}

impl EditModal {
  pub fn new() -> Self { Self::default() }

  pub fn state(&self) -> &ModalState { &self.state }

  pub fn is_open(&self) -> bool {
    matches!(self.state, ModalState::Open(_))
  }

  /// `true` when an existing record is being edited (as opposed to added).
  pub fn is_editing(&self) -> bool {
    matches!(self.state, ModalState::Open(EditMode::Edit(_)))
  }

  /// The record under edit, if the modal is open in edit mode.
  pub fn editing_target(&self) -> Option<&Contact> {
    match &self.state {
      ModalState::Open(EditMode::Edit(c)) => Some(c),
      _ => None,
    }
  }

  // ── Transitions ───────────────────────────────────────────────────────

  /// Open with a blank form for a new record.
  pub fn open_for_add(&mut self) {
    self.clear();
    self.state = ModalState::Open(EditMode::Add);
  }

  /// Open pre-populated with `contact`'s current field values.
  pub fn open_for_edit(&mut self, contact: Contact) {
    self.clear();
    self.draft = ContactDraft::from_contact(&contact);
    self.state = ModalState::Open(EditMode::Edit(contact));
  }

  /// Close after a successful submit. No-op when already closed.
  pub fn submitted(&mut self) {
    if self.is_open() {
      self.close();
    }
  }

  /// Close without saving. No-op when already closed.
  pub fn cancel(&mut self) {
    if self.is_open() {
      self.close();
    }
  }

  fn close(&mut self) {
    self.state = ModalState::Closed;
    self.clear();
  }

  fn clear(&mut self) {
    self.draft = ContactDraft::default();
    self.photo = None;
  }

  // ── Staged form state ─────────────────────────────────────────────────

  pub fn draft(&self) -> &ContactDraft { &self.draft }

  pub fn draft_mut(&mut self) -> &mut ContactDraft { &mut self.draft }

  /// Stage image bytes to be uploaded on submit. Ignored when closed.
  pub fn attach_photo(&mut self, data: Bytes) {
    if self.is_open() {
      self.photo = Some(data);
    }
  }

  pub fn staged_photo(&self) -> Option<&Bytes> { self.photo.as_ref() }

  /// Build the coordinator input from the staged state.
  /// Returns `None` when the modal is closed.
  pub fn save_request(&self) -> Option<SaveRequest> {
    match &self.state {
      ModalState::Closed => None,
      ModalState::Open(EditMode::Add) => Some(SaveRequest {
        draft:   self.draft.clone(),
        editing: None,
        photo:   self.photo.clone(),
      }),
      ModalState::Open(EditMode::Edit(c)) => Some(SaveRequest {
        draft:   self.draft.clone(),
        editing: Some(c.clone()),
        photo:   self.photo.clone(),
      }),
    }
  }
}
