//! Error taxonomy shared by the engine and its callers.
//!
//! A declined confirmation is deliberately *not* here — declining an
//! overwrite or a deletion is a normal outcome, reported through the
//! coordinator's outcome enums instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A mutation was attempted with no (verified) identity present.
  #[error("not authenticated")]
  Unauthenticated,

  /// Form input failed validation before any store call.
  #[error("invalid contact: {0}")]
  Invalid(String),

  /// Failure on a document-store call. The backend's own error is carried
  /// as the source; a missing update/delete target surfaces here too, as the
  /// backend's not-found error.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// Asset-store failure while uploading a photo.
  #[error("upload error: {0}")]
  Upload(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap an opaque backend error as a store failure.
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }

  /// Wrap an opaque backend error as an upload failure.
  pub fn upload(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Upload(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
