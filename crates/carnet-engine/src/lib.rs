//! The Carnet contact view-model engine.
//!
//! Four tightly-coupled pieces, all driven by the same identity stream:
//!
//! - [`feed`] — the live, identity-scoped contact feed;
//! - [`view`] — the pure filter → sort → paginate pipeline;
//! - [`coordinator`] — create/update/delete with duplicate detection and
//!   confirmation gating;
//! - [`modal`] — the add/edit modal state machine feeding the coordinator.
//!
//! The engine is generic over the collaborator traits in [`carnet_core`];
//! components are constructed explicitly and wired together at startup —
//! there are no ambient singletons.

pub mod coordinator;
pub mod feed;
pub mod modal;
pub mod view;

pub use coordinator::{DeleteOutcome, MutationCoordinator, SaveOutcome};
pub use feed::{ContactFeed, FeedState};
pub use modal::{EditMode, EditModal, ModalState, SaveRequest};
pub use view::{ContactPage, SortDirection, ViewParams, derive_view};
