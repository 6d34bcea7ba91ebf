//! Client-side object-list engine for an S3-style file manager.
//!
//! This crate turns paginated storage listings into a stable, filterable
//! row sequence and owns the interaction state machines layered on top:
//!
//! - [`search`] and [`rows`] - tokenized search and row derivation
//! - [`selection`] - multi-select and keyboard navigation
//! - [`scan`] - scroll resets, auto-scan and stale-request guards
//! - [`menu`] - the single-instance context menu
//! - [`dnd`] and [`clipboard`] - drag-and-drop and copy/cut/paste planning
//! - [`actions`] - capability-gated actions and the command palette
//! - [`prefs`] - versioned view preferences
//!
//! Everything here is host-independent; the browser glue lives in the
//! `bucketview` package.

pub mod actions;
pub mod clipboard;
pub mod config;
pub mod dnd;
pub mod error;
pub mod input;
pub mod keys;
pub mod menu;
pub mod models;
pub mod prefs;
pub mod rows;
pub mod scan;
pub mod search;
pub mod selection;

pub use actions::{ActionCatalog, ActionCommand, ActionContext, Audience, MenuEntry, UiAction};
pub use clipboard::{Clipboard, ClipboardPayload};
pub use dnd::{DragPayload, DragState, DropOutcome, DropTarget};
pub use error::{DropError, ListingError, StoreError, ValidationError};
pub use input::{Modifiers, NavKey};
pub use menu::{ContextMenu, MenuContents, MenuEvent, MenuIdentity, MenuKind, MenuSource, MenuView};
pub use rows::{RowInputs, derive_rows};
pub use scan::{AutoScanController, RequestGuard, ScanDecision, ScanInputs, ScrollResetTracker, ViewResetKey};
pub use search::SearchQuery;
pub use selection::{SelectionModel, SelectionState};
