//! UI-side collaborator contracts.
//!
//! The engine drives these; it never knows how they are rendered. The demo
//! CLI provides terminal implementations, the test-suite provides recording
//! doubles.

use std::future::Future;

use bytes::Bytes;

use crate::contact::ContactId;

/// External storage for image assets. Upload happens-before the record write
/// that references the returned URL.
pub trait AssetStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Store `data` associated with the contact `associated_id`; returns a
  /// durable URL for the asset.
  fn upload(
    &self,
    data: Bytes,
    associated_id: ContactId,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;
}

/// A user-driven yes/no dialog. `ask` resolves when the user answers.
pub trait ConfirmationPrompt: Send + Sync {
  fn ask(
    &self,
    title: &str,
    message: &str,
  ) -> impl Future<Output = bool> + Send;
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
  Success,
  Error,
}

/// Fire-and-forget toast-style notifications.
pub trait NotificationSink: Send + Sync {
  fn notify(&self, message: &str, kind: NoticeKind);
}

/// Busy indicator shown while a mutation is in flight. `show` and `hide` are
/// always called in balanced pairs, on failure paths included.
pub trait BusyIndicator: Send + Sync {
  fn show(&self);
  fn hide(&self);
}
