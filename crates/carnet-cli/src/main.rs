//! `carnet` — interactive demo harness for the Carnet contact engine.
//!
//! Wires the engine components together at startup (session, in-memory
//! store, feed, coordinator) and exposes them through a line-based command
//! loop. `help` lists the commands.

mod app;
mod terminal;

use std::{
  io::{self, BufRead as _, Write as _},
  path::PathBuf,
  sync::Arc,
};

use anyhow::{Context as _, Result};
use app::App;
use carnet_core::identity::SessionHandle;
use carnet_engine::view::DEFAULT_PAGE_SIZE;
use carnet_store_memory::MemoryStore;
use clap::Parser;
use serde::Deserialize;
use terminal::DirAssets;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "carnet", about = "Interactive contact manager demo")]
struct Args {
  /// Path to a TOML config file (page_size, photo_dir).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Contacts per page.
  #[arg(long, env = "CARNET_PAGE_SIZE")]
  page_size: Option<usize>,

  /// Directory to store uploaded photos in.
  #[arg(long, env = "CARNET_PHOTO_DIR")]
  photo_dir: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  page_size: Option<usize>,
  photo_dir: Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let page_size = args
    .page_size
    .or(file_cfg.page_size)
    .unwrap_or(DEFAULT_PAGE_SIZE);
  let photo_dir = args
    .photo_dir
    .or(file_cfg.photo_dir)
    .unwrap_or_else(|| PathBuf::from("photos"));

  let session = SessionHandle::new();
  let store = Arc::new(MemoryStore::new());
  let assets = Arc::new(DirAssets::new(photo_dir));
  let mut app = App::new(session, store, assets, page_size);

  println!("carnet — type `help` for commands, `login` to start");

  let stdin = io::stdin();
  let mut lines = stdin.lock().lines();
  loop {
    app.render();
    print!("> ");
    io::stdout().flush().ok();

    let Some(line) = lines.next() else {
      break;
    };
    let line = line.context("reading stdin")?;

    match app.handle_line(&line).await {
      Ok(true) => {}
      Ok(false) => break,
      Err(e) => println!("error: {e:#}"),
    }

    // Give the feed task a chance to pick up whatever the command changed
    // before the next render.
    tokio::task::yield_now().await;
  }

  Ok(())
}
