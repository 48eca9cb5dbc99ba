//! Contact — the sole persisted entity.
//!
//! A [`Contact`] always carries a [`ContactId`]; there is no such thing as a
//! stored-but-unidentified contact. Pre-save form state lives in
//! [`ContactDraft`], which holds only the caller-writable fields.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Opaque identifier of a stored contact, assigned by the document store.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ContactId(pub Uuid);

impl ContactId {
  pub fn random() -> Self { Self(Uuid::new_v4()) }
}

impl std::fmt::Display for ContactId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.0.fmt(f)
  }
}

/// Identifier of the identity that owns a contact.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OwnerId(pub Uuid);

impl std::fmt::Display for OwnerId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.0.fmt(f)
  }
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// A stored contact record.
///
/// `id` and `owner_id` are set by the mutation path and never accepted from
/// form input; see [`Contact::with_draft`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  pub id:        ContactId,
  pub owner_id:  OwnerId,
  pub name:      String,
  pub email:     String,
  pub phone:     String,
  pub photo_url: Option<String>,
}

/// Everything about a contact except its identifier — the payload written to
/// the store on insert and replace. The identifier is only ever used as the
/// write target, never included in the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
  pub owner_id:  OwnerId,
  pub name:      String,
  pub email:     String,
  pub phone:     String,
  pub photo_url: Option<String>,
}

impl Contact {
  pub fn from_fields(id: ContactId, fields: ContactFields) -> Self {
    Self {
      id,
      owner_id: fields.owner_id,
      name: fields.name,
      email: fields.email,
      phone: fields.phone,
      photo_url: fields.photo_url,
    }
  }

  pub fn fields(&self) -> ContactFields {
    ContactFields {
      owner_id:  self.owner_id,
      name:      self.name.clone(),
      email:     self.email.clone(),
      phone:     self.phone.clone(),
      photo_url: self.photo_url.clone(),
    }
  }

  /// Apply the caller-writable fields of `draft` to this contact.
  ///
  /// Exactly `name`, `email`, `phone`, and `photo_url` are taken from the
  /// draft; `id` and `owner_id` are always preserved from `self`. This is the
  /// only sanctioned way to merge form input over an existing record.
  pub fn with_draft(&self, draft: &ContactDraft) -> Contact {
    Contact {
      id:        self.id,
      owner_id:  self.owner_id,
      name:      draft.name.clone(),
      email:     draft.email.clone(),
      phone:     draft.phone.clone(),
      photo_url: draft.photo_url.clone().or_else(|| self.photo_url.clone()),
    }
  }
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// Form input for a contact: the caller-writable fields only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
  pub name:      String,
  pub email:     String,
  pub phone:     String,
  pub photo_url: Option<String>,
}

impl ContactDraft {
  /// Validate the draft the way the edit form does: non-empty name and
  /// phone, email of a plausible `local@domain.tld` shape.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::Invalid("name must not be empty".into()));
    }
    if self.phone.trim().is_empty() {
      return Err(Error::Invalid("phone must not be empty".into()));
    }
    if !is_email_shaped(&self.email) {
      return Err(Error::Invalid(format!(
        "not a valid email address: {:?}",
        self.email
      )));
    }
    Ok(())
  }

  /// Pre-populate a draft from an existing record, for the edit form.
  pub fn from_contact(contact: &Contact) -> Self {
    Self {
      name:      contact.name.clone(),
      email:     contact.email.clone(),
      phone:     contact.phone.clone(),
      photo_url: contact.photo_url.clone(),
    }
  }
}

/// Minimal email shape check: a non-empty local part, a single `@`, and a
/// domain containing at least one interior dot.
fn is_email_shaped(s: &str) -> bool {
  let Some((local, domain)) = s.split_once('@') else {
    return false;
  };
  if local.is_empty() || domain.contains('@') {
    return false;
  }
  let Some((host, tld)) = domain.rsplit_once('.') else {
    return false;
  };
  !host.is_empty() && !tld.is_empty() && !s.contains(char::is_whitespace)
}
