//! Utility modules for web, DOM, and network operations.
//!
//! Provides:
//! - [`dom`] - Window, dialogs, clipboard and geometry helpers
//! - [`fetch`] - Storage API client
//! - [`format`] - Size and timestamp formatting
//! - [`logging`] - Console `log` backend
//! - [`storage`] - localStorage preference store

pub mod dom;
pub mod fetch;
pub mod format;
pub mod logging;
pub mod storage;
