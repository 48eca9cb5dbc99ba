//! The derived view pipeline: filter → sort → paginate.
//!
//! [`derive_view`] is a pure function of the current feed snapshot and the
//! UI-controlled parameters. It is recomputed from scratch whenever any input
//! changes; there is no incremental state to get out of sync.

use carnet_core::contact::Contact;

/// Records shown per page when the caller does not configure one.
pub const DEFAULT_PAGE_SIZE: usize = 5;

// ─── Parameters ──────────────────────────────────────────────────────────────

/// Requested ordering of the contact list by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
  Ascending,
  Descending,
  /// Preserve the feed's insertion order.
  #[default]
  Unsorted,
}

/// The UI-controlled inputs to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewParams {
  pub search_term: String,
  pub sort:        SortDirection,
  /// 1-based current page.
  pub page:        usize,
  pub page_size:   usize,
}

impl Default for ViewParams {
  fn default() -> Self {
    Self {
      search_term: String::new(),
      sort:        SortDirection::Unsorted,
      page:        1,
      page_size:   DEFAULT_PAGE_SIZE,
    }
  }
}

impl ViewParams {
  pub fn with_page_size(page_size: usize) -> Self {
    Self { page_size: page_size.max(1), ..Self::default() }
  }

  /// Jump to `page` if it lies within `[1, total_pages]`; no-op otherwise.
  pub fn go_to(&mut self, page: usize, total_pages: usize) {
    if page >= 1 && page <= total_pages {
      self.page = page;
    }
  }

  pub fn next_page(&mut self, total_pages: usize) {
    self.go_to(self.page + 1, total_pages);
  }

  pub fn previous_page(&mut self, total_pages: usize) {
    // page is 1-based; page - 1 == 0 falls outside the valid range and the
    // jump is a no-op.
    if self.page > 1 {
      self.go_to(self.page - 1, total_pages);
    }
  }

  /// Change the search term and snap back to the first page.
  pub fn set_search(&mut self, term: impl Into<String>) {
    self.search_term = term.into();
    self.page = 1;
  }

  pub fn clear_search(&mut self) { self.set_search(""); }

  /// Change the sort direction and snap back to the first page.
  pub fn set_sort(&mut self, sort: SortDirection) {
    self.sort = sort;
    self.page = 1;
  }
}

// ─── Output ──────────────────────────────────────────────────────────────────

/// One page of the derived view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactPage {
  /// The records to render, in final display order.
  pub contacts:    Vec<Contact>,
  /// The page these records belong to (the input `page`, unclamped).
  pub page:        usize,
  /// Total page count over the filtered, sorted set; at least 1 even when
  /// the set is empty.
  pub total_pages: usize,
}

/// `max(1, ceil(filtered_len / page_size))`.
pub fn total_pages(filtered_len: usize, page_size: usize) -> usize {
  filtered_len.div_ceil(page_size.max(1)).max(1)
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

/// Compute the page of contacts to render.
///
/// Deterministic and side-effect-free. Filtering is a case-insensitive
/// substring match on name or email; sorting is a stable case-insensitive
/// comparison on name, so ties keep their pre-sort relative order under both
/// directions.
pub fn derive_view(contacts: &[Contact], params: &ViewParams) -> ContactPage {
  let term = params.search_term.to_lowercase();

  let mut shown: Vec<Contact> = contacts
    .iter()
    .filter(|c| {
      term.is_empty()
        || c.name.to_lowercase().contains(&term)
        || c.email.to_lowercase().contains(&term)
    })
    .cloned()
    .collect();

  match params.sort {
    SortDirection::Ascending => {
      shown.sort_by(|a, b| name_key(a).cmp(&name_key(b)));
    }
    SortDirection::Descending => {
      // Flipping the comparator keeps the sort stable for equal keys,
      // unlike sorting ascending and reversing.
      shown.sort_by(|a, b| name_key(b).cmp(&name_key(a)));
    }
    SortDirection::Unsorted => {}
  }

  // Saturating arithmetic: `page` is a public field, so arbitrary values
  // must slice to empty rather than overflow.
  let total = total_pages(shown.len(), params.page_size);
  let page = params.page.max(1);
  let start = (page - 1).saturating_mul(params.page_size);
  let end = start.saturating_add(params.page_size).min(shown.len());
  let contacts = if start < shown.len() {
    shown[start..end].to_vec()
  } else {
    Vec::new()
  };

  ContactPage { contacts, page: params.page, total_pages: total }
}

fn name_key(c: &Contact) -> String { c.name.to_lowercase() }

#[cfg(test)]
mod tests {
  use carnet_core::contact::{Contact, ContactId, OwnerId};
  use uuid::Uuid;

  use super::*;

  fn contact(name: &str, email: &str) -> Contact {
    Contact {
      id:        ContactId::random(),
      owner_id:  OwnerId(Uuid::nil()),
      name:      name.into(),
      email:     email.into(),
      phone:     "555-0100".into(),
      photo_url: None,
    }
  }

  fn names(page: &ContactPage) -> Vec<&str> {
    page.contacts.iter().map(|c| c.name.as_str()).collect()
  }

  #[test]
  fn empty_list_still_reports_one_page() {
    let page = derive_view(&[], &ViewParams::default());
    assert_eq!(page.total_pages, 1);
    assert!(page.contacts.is_empty());
  }

  #[test]
  fn total_pages_is_ceiling_with_floor_one() {
    assert_eq!(total_pages(0, 5), 1);
    assert_eq!(total_pages(1, 5), 1);
    assert_eq!(total_pages(5, 5), 1);
    assert_eq!(total_pages(6, 5), 2);
    assert_eq!(total_pages(11, 5), 3);
  }

  #[test]
  fn filter_matches_name_or_email_case_insensitively() {
    let contacts = vec![contact("Ann", "x@y.com"), contact("Bob", "b@z.org")];

    let mut params = ViewParams::default();
    params.set_search("ann");
    assert_eq!(names(&derive_view(&contacts, &params)), ["Ann"]);

    params.set_search("Y.COM");
    assert_eq!(names(&derive_view(&contacts, &params)), ["Ann"]);

    params.set_search("zz");
    assert!(derive_view(&contacts, &params).contacts.is_empty());

    params.clear_search();
    assert_eq!(derive_view(&contacts, &params).contacts.len(), 2);
  }

  #[test]
  fn sort_directions_reverse_each_other_without_ties() {
    let contacts = vec![
      contact("carol", "c@x.com"),
      contact("Ann", "a@x.com"),
      contact("bob", "b@x.com"),
    ];

    let mut params = ViewParams::default();
    params.set_sort(SortDirection::Ascending);
    let asc_page = derive_view(&contacts, &params);
    let asc = names(&asc_page);
    assert_eq!(asc, ["Ann", "bob", "carol"]);

    params.set_sort(SortDirection::Descending);
    let desc_page = derive_view(&contacts, &params);
    let desc = names(&desc_page);
    let mut reversed = asc.clone();
    reversed.reverse();
    assert_eq!(desc, reversed);
  }

  #[test]
  fn equal_names_keep_insertion_order_under_both_directions() {
    let contacts = vec![
      contact("Ann", "first@x.com"),
      contact("ann", "second@x.com"),
      contact("Bob", "third@x.com"),
      contact("ANN", "fourth@x.com"),
    ];

    let emails = |page: &ContactPage| -> Vec<String> {
      page
        .contacts
        .iter()
        .filter(|c| c.name.eq_ignore_ascii_case("ann"))
        .map(|c| c.email.clone())
        .collect()
    };

    let mut params = ViewParams::default();
    params.set_sort(SortDirection::Ascending);
    let asc = derive_view(&contacts, &params);
    assert_eq!(emails(&asc), ["first@x.com", "second@x.com", "fourth@x.com"]);

    params.set_sort(SortDirection::Descending);
    let desc = derive_view(&contacts, &params);
    assert_eq!(emails(&desc), ["first@x.com", "second@x.com", "fourth@x.com"]);
  }

  #[test]
  fn unsorted_preserves_feed_order() {
    let contacts = vec![
      contact("zed", "z@x.com"),
      contact("ann", "a@x.com"),
      contact("mia", "m@x.com"),
    ];
    let page = derive_view(&contacts, &ViewParams::default());
    assert_eq!(names(&page), ["zed", "ann", "mia"]);
  }

  #[test]
  fn pagination_round_trip_reproduces_the_full_sequence() {
    let contacts: Vec<Contact> = (0..12)
      .map(|i| contact(&format!("c{i:02}"), &format!("c{i}@x.com")))
      .collect();

    let mut params = ViewParams::default();
    params.set_sort(SortDirection::Ascending);

    let total = derive_view(&contacts, &params).total_pages;
    assert_eq!(total, 3);

    let mut seen = Vec::new();
    for page in 1..=total {
      params.go_to(page, total);
      seen.extend(derive_view(&contacts, &params).contacts);
    }

    let mut expected = contacts.clone();
    expected.sort_by_key(|c| c.name.clone());
    assert_eq!(seen, expected);
  }

  #[test]
  fn navigation_clamps_and_never_panics() {
    let contacts: Vec<Contact> =
      (0..7).map(|i| contact(&format!("c{i}"), "c@x.com")).collect();
    let mut params = ViewParams::default();
    let total = derive_view(&contacts, &params).total_pages;
    assert_eq!(total, 2);

    params.previous_page(total);
    assert_eq!(params.page, 1);

    params.next_page(total);
    assert_eq!(params.page, 2);
    params.next_page(total);
    assert_eq!(params.page, 2);

    params.go_to(0, total);
    assert_eq!(params.page, 2);
    params.go_to(99, total);
    assert_eq!(params.page, 2);

    // A page beyond the data yields an empty slice, never a panic.
    let mut far = ViewParams::default();
    far.page = 50;
    assert!(derive_view(&contacts, &far).contacts.is_empty());
  }

  #[test]
  fn absurd_page_values_slice_to_empty_without_overflow() {
    let contacts = vec![contact("ann", "a@x.com")];

    // `page` is public; a caller can bypass the clamping helpers entirely.
    let mut params = ViewParams::default();
    params.page = usize::MAX;
    let page = derive_view(&contacts, &params);
    assert!(page.contacts.is_empty());
    assert_eq!(page.total_pages, 1);

    params.page = usize::MAX;
    params.page_size = usize::MAX;
    assert!(derive_view(&contacts, &params).contacts.is_empty());
  }

  #[test]
  fn search_and_sort_reset_to_first_page() {
    let mut params = ViewParams::default();
    params.page = 3;
    params.set_search("x");
    assert_eq!(params.page, 1);

    params.page = 3;
    params.set_sort(SortDirection::Ascending);
    assert_eq!(params.page, 1);
  }

  #[test]
  fn derive_view_is_deterministic() {
    let contacts = vec![
      contact("ann", "a@x.com"),
      contact("Ann", "b@x.com"),
      contact("bob", "c@x.com"),
    ];
    let mut params = ViewParams::default();
    params.set_sort(SortDirection::Ascending);

    let first = derive_view(&contacts, &params);
    let second = derive_view(&contacts, &params);
    assert_eq!(first, second);
  }
}
