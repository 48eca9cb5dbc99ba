//! Terminal implementations of the UI collaborator traits.

use std::{
  future::Future,
  io::{self, Write as _},
  path::PathBuf,
};

use bytes::Bytes;
use carnet_core::{
  collab::{
    AssetStore, BusyIndicator, ConfirmationPrompt, NoticeKind,
    NotificationSink,
  },
  contact::ContactId,
};
use tracing::info;

// ─── Confirmation ─────────────────────────────────────────────────────────────

/// Yes/no prompt on stdin. Anything other than `y`/`yes` declines.
pub struct StdinPrompt;

impl ConfirmationPrompt for StdinPrompt {
  fn ask(
    &self,
    title: &str,
    message: &str,
  ) -> impl Future<Output = bool> + Send {
    let title = title.to_string();
    let message = message.to_string();
    async move {
      tokio::task::block_in_place(|| {
        println!("\n== {title} ==");
        println!("{message}");
        print!("[y/N] ");
        io::stdout().flush().ok();

        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
          return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
      })
    }
  }
}

// ─── Notifications ────────────────────────────────────────────────────────────

/// Toast stand-in: one line per notice, mirrored to tracing.
pub struct TermNotices;

impl NotificationSink for TermNotices {
  fn notify(&self, message: &str, kind: NoticeKind) {
    match kind {
      NoticeKind::Success => println!("[ok] {message}"),
      NoticeKind::Error => eprintln!("[error] {message}"),
    }
    info!(?kind, message, "notice");
  }
}

// ─── Busy indicator ───────────────────────────────────────────────────────────

pub struct TermBusy;

impl BusyIndicator for TermBusy {
  fn show(&self) {
    print!("working… ");
    io::stdout().flush().ok();
  }

  fn hide(&self) { println!("done."); }
}

// ─── Asset store ──────────────────────────────────────────────────────────────

/// Writes photo bytes under a directory and hands back the file path as the
/// asset URL.
pub struct DirAssets {
  dir: PathBuf,
}

impl DirAssets {
  pub fn new(dir: PathBuf) -> Self { Self { dir } }
}

impl AssetStore for DirAssets {
  type Error = io::Error;

  fn upload(
    &self,
    data: Bytes,
    associated_id: ContactId,
  ) -> impl Future<Output = Result<String, io::Error>> + Send + '_ {
    let path = self.dir.join(format!("{associated_id}.img"));
    async move {
      tokio::fs::create_dir_all(&self.dir).await?;
      tokio::fs::write(&path, &data).await?;
      Ok(path.display().to_string())
    }
  }
}
