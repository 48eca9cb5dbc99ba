//! Interactive command loop: parses one command per line and drives the
//! engine components.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use bytes::Bytes;
use carnet_core::identity::{Role, SessionHandle};
use carnet_engine::{
  ContactFeed, ContactPage, EditModal, MutationCoordinator, SortDirection,
  ViewParams, derive_view,
};
use carnet_store_memory::MemoryStore;

use crate::terminal::{DirAssets, StdinPrompt, TermBusy, TermNotices};

type Coordinator = MutationCoordinator<
  MemoryStore,
  DirAssets,
  StdinPrompt,
  TermNotices,
  TermBusy,
>;

/// Top-level application state.
pub struct App {
  pub session:     SessionHandle,
  pub feed:        ContactFeed,
  pub view:        ViewParams,
  pub modal:       EditModal,
  pub coordinator: Coordinator,
}

impl App {
  pub fn new(
    session: SessionHandle,
    store: Arc<MemoryStore>,
    assets: Arc<DirAssets>,
    page_size: usize,
  ) -> Self {
    let notices = Arc::new(TermNotices);
    let feed =
      ContactFeed::spawn(store.clone(), session.observe(), notices.clone());
    let coordinator = MutationCoordinator::new(
      store,
      assets,
      Arc::new(StdinPrompt),
      notices,
      Arc::new(TermBusy),
      session.observe(),
    );
    Self {
      session,
      feed,
      view: ViewParams::with_page_size(page_size),
      modal: EditModal::new(),
      coordinator,
    }
  }

  /// The page currently on screen.
  fn page(&self) -> ContactPage {
    derive_view(&self.feed.current().contacts, &self.view)
  }

  /// Print the current page.
  pub fn render(&self) {
    let state = self.feed.current();
    if let Some(err) = &state.error {
      println!("(feed unavailable: {err})");
    }

    let page = self.page();
    if page.contacts.is_empty() {
      println!("No contacts found. Add one with `add`.");
    }
    for (i, c) in page.contacts.iter().enumerate() {
      let photo = c.photo_url.as_deref().unwrap_or("-");
      println!(
        "{:>2}. {}  <{}>  {}  [{}]",
        i + 1,
        c.name,
        c.email,
        c.phone,
        photo
      );
    }
    println!("Page {} of {}", page.page, page.total_pages);

    if self.modal.is_open() {
      let mode = if self.modal.is_editing() { "edit" } else { "add" };
      let d = self.modal.draft();
      println!(
        "-- open {mode} form: name={:?} email={:?} phone={:?} photo={} --",
        d.name,
        d.email,
        d.phone,
        if self.modal.staged_photo().is_some() { "staged" } else { "none" },
      );
    }
  }

  /// Handle one command line. Returns `false` to quit.
  pub async fn handle_line(&mut self, line: &str) -> Result<bool> {
    let mut parts = line.split_whitespace();
    let Some(cmd) = parts.next() else {
      return Ok(true);
    };
    let rest: Vec<&str> = parts.collect();

    match cmd {
      "quit" | "exit" => return Ok(false),
      "help" => print_help(),

      // ── Session ───────────────────────────────────────────────────────
      "login" => {
        let role = match rest.first().copied() {
          Some("admin") => Role::Admin,
          _ => Role::User,
        };
        let identity = self.session.sign_in_new(role);
        println!("signed in as {}", identity.id);
      }
      "logout" => {
        self.session.sign_out();
        println!("signed out");
      }

      // ── View ──────────────────────────────────────────────────────────
      "list" => {}
      "search" => self.view.set_search(rest.join(" ")),
      "clear" => self.view.clear_search(),
      "sort" => {
        let sort = match rest.first().copied() {
          Some("asc") => SortDirection::Ascending,
          Some("desc") => SortDirection::Descending,
          _ => SortDirection::Unsorted,
        };
        self.view.set_sort(sort);
      }
      "next" => {
        let total = self.page().total_pages;
        self.view.next_page(total);
      }
      "prev" => {
        let total = self.page().total_pages;
        self.view.previous_page(total);
      }
      "page" => {
        let n: usize = rest
          .first()
          .context("usage: page <n>")?
          .parse()
          .context("page number")?;
        let total = self.page().total_pages;
        self.view.go_to(n, total);
      }
      "export" => {
        let page = self.page();
        println!("{}", serde_json::to_string_pretty(&page.contacts)?);
      }

      // ── Modal ─────────────────────────────────────────────────────────
      "add" => self.modal.open_for_add(),
      "edit" => {
        let row: usize = rest
          .first()
          .context("usage: edit <row>")?
          .parse()
          .context("row number")?;
        let page = self.page();
        let contact = page
          .contacts
          .get(row.checked_sub(1).context("rows start at 1")?)
          .context("no such row on this page")?;
        self.modal.open_for_edit(contact.clone());
      }
      "set" => {
        if !self.modal.is_open() {
          println!("no open form; use `add` or `edit <row>` first");
          return Ok(true);
        }
        let field =
          rest.first().copied().context("usage: set <field> <value>")?;
        let value = rest[1..].join(" ");
        let draft = self.modal.draft_mut();
        match field {
          "name" => draft.name = value,
          "email" => draft.email = value,
          "phone" => draft.phone = value,
          _ => println!("unknown field {field:?} (name, email, phone)"),
        }
      }
      "photo" => {
        let path = rest.first().context("usage: photo <file>")?;
        let data = tokio::fs::read(path)
          .await
          .with_context(|| format!("reading {path}"))?;
        self.modal.attach_photo(Bytes::from(data));
      }
      "submit" => {
        match self.modal.save_request() {
          None => println!("no open form"),
          Some(req) => {
            if self.coordinator.save(req).await.is_written() {
              self.modal.submitted();
            }
          }
        }
      }
      "cancel" => self.modal.cancel(),

      // ── Delete ────────────────────────────────────────────────────────
      "delete" => {
        let row: usize = rest
          .first()
          .context("usage: delete <row>")?
          .parse()
          .context("row number")?;
        let page = self.page();
        let contact = page
          .contacts
          .get(row.checked_sub(1).context("rows start at 1")?)
          .context("no such row on this page")?;
        self.coordinator.delete(contact).await;
      }

      other => println!("unknown command {other:?}; try `help`"),
    }

    Ok(true)
  }
}

fn print_help() {
  println!(
    "\
session:  login [admin] | logout
view:     list | search <term> | clear | sort asc|desc|none
          next | prev | page <n> | export
contacts: add | edit <row> | set name|email|phone <value>
          photo <file> | submit | cancel | delete <row>
misc:     help | quit"
  );
}
