//! Application configuration.
//!
//! Browser-side settings: where the storage API lives, request sizes and
//! list geometry. Engine policy (auto-scan caps, menu padding, limits)
//! lives in `bucketview_core::config`.

// =============================================================================
// API
// =============================================================================

/// Base path of the storage API, relative to the page origin.
pub const API_BASE: &str = "/api/v1";

/// Header carrying the active profile id on every scoped request.
pub const PROFILE_HEADER: &str = "X-Profile-Id";

/// Objects requested per listing page (the server clamps to 1..=1000).
pub const LIST_PAGE_SIZE: u32 = 500;

/// Results requested per indexed search page.
pub const SEARCH_PAGE_SIZE: u32 = 200;

/// Lifetime requested for presigned download links.
pub const DOWNLOAD_URL_TTL_SECS: u32 = 900;

// =============================================================================
// List Geometry
// =============================================================================

/// Fixed row height used by the windowed list (CSS px).
pub const ROW_HEIGHT_PX: f64 = 32.0;

/// Rows rendered above and below the visible window.
pub const OVERSCAN_ROWS: usize = 8;

// =============================================================================
// UI Configuration
// =============================================================================

/// Icon theme selection.
///
/// Available themes:
/// - `Bootstrap` - Familiar, slightly bolder (default)
/// - `Lucide` - Minimal, thin strokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(dead_code)]
pub enum IconTheme {
    #[default]
    Bootstrap,
    Lucide,
}

/// Current icon theme used throughout the application.
pub const ICON_THEME: IconTheme = IconTheme::Bootstrap;

/// How long transient status messages stay visible.
pub const NOTICE_TIMEOUT_MS: u32 = 4_000;
