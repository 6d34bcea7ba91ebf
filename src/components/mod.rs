//! UI components built with Leptos.
//!
//! - [`router`] - Hash routing and browse-context switching (main entry point)
//! - [`explorer`] - Object browser UI
//! - [`icons`] - Centralized icon definitions (change theme here)

pub mod explorer;
pub mod icons;
pub mod router;

pub use router::AppRouter;
