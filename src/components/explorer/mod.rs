//! Object explorer UI components.
//!
//! Components:
//! - [`Explorer`] - Main explorer view
//! - `FileList` - Windowed list of prefixes and objects
//! - `ContextMenuView` - The single context menu
//! - `Palette` - Command palette overlay
//! - `Sidebar` - Bucket tree and recent locations
//! - `DetailsPanel` - Metadata and preview of the focused object
//!
//! Every action, whatever surface triggers it, goes through [`dispatch`].

mod commands;
mod context_menu;
mod details;
mod drag;
#[allow(clippy::module_inception)]
mod explorer;
mod file_list;
mod header;
mod listeners;
mod palette;
mod pathbar;
mod shortcuts;
mod sidebar;

pub use commands::dispatch;
pub use explorer::Explorer;
