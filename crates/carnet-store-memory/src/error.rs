//! Error types for `carnet-store-memory`.

use carnet_core::contact::ContactId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("contact not found: {0}")]
  NotFound(ContactId),

  #[error("contact id already taken: {0}")]
  AlreadyExists(ContactId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
