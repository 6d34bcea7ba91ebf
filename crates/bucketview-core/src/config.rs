//! Engine configuration.
//!
//! Centralizes all policy constants used by the object-list engine.
//! Values that are product-tuned rather than derived (auto-scan caps,
//! cooldowns) are also exposed through [`ScanPolicy`] and [`MenuPolicy`]
//! so callers can override them.

// =============================================================================
// Auto-scan
// =============================================================================

/// Auto-scan limits for background page fetching.
pub mod scan {
    /// Raw row count after which auto-scan stops in the simplified UI mode.
    pub const CAP_BASIC: usize = 1_000;
    /// Raw row count after which auto-scan stops in advanced UI mode.
    pub const CAP_ADVANCED: usize = 3_000;
    /// Distance (in rows) from the end of the loaded rows that counts as "near the end".
    pub const NEAR_END_ROWS: usize = 40;
    /// Minimum delay between two automatic page fetches.
    pub const COOLDOWN_MS: f64 = 150.0;
}

/// Tunable auto-scan policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanPolicy {
    pub cap_basic: usize,
    pub cap_advanced: usize,
    pub near_end_rows: usize,
    pub cooldown_ms: f64,
}

impl ScanPolicy {
    /// Row cap for the given UI mode.
    pub fn cap(&self, is_advanced: bool) -> usize {
        if is_advanced {
            self.cap_advanced
        } else {
            self.cap_basic
        }
    }
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self {
            cap_basic: scan::CAP_BASIC,
            cap_advanced: scan::CAP_ADVANCED,
            near_end_rows: scan::NEAR_END_ROWS,
            cooldown_ms: scan::COOLDOWN_MS,
        }
    }
}

// =============================================================================
// Context Menu
// =============================================================================

/// Inset kept between a context menu and the viewport edges (CSS px).
pub const MENU_VIEWPORT_PADDING: f64 = 8.0;

/// Context-menu positioning policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MenuPolicy {
    pub padding: f64,
}

impl Default for MenuPolicy {
    fn default() -> Self {
        Self {
            padding: MENU_VIEWPORT_PADDING,
        }
    }
}

// =============================================================================
// Transfers
// =============================================================================

/// Limits mirrored from the job API validation rules.
pub mod transfer {
    /// Maximum items in a single copy/move batch job.
    pub const MAX_BATCH_ITEMS: usize = 5_000;
    /// Maximum keys in a single delete-objects job.
    pub const MAX_DELETE_KEYS: usize = 50_000;
    /// Phrase the user must type to confirm a move.
    pub const MOVE_CONFIRM_PHRASE: &str = "move";
    /// Phrase the user must type to confirm a delete.
    pub const DELETE_CONFIRM_PHRASE: &str = "delete";
}

// =============================================================================
// Drag and Drop
// =============================================================================

/// Private MIME type carried by internal drag sources.
pub const DRAG_MIME: &str = "application/x-bucketview-drag+json";

// =============================================================================
// UI
// =============================================================================

/// Objects larger than this are not offered an inline preview.
pub const PREVIEW_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Rows moved by PageUp/PageDown when the caller does not know the viewport height.
pub const DEFAULT_PAGE_STEP: usize = 10;

// =============================================================================
// Persistence
// =============================================================================

/// Preference storage keys.
pub mod prefs {
    /// View preferences (sort, filters, UI mode).
    pub const VIEW_KEY: &str = "bucketview.view";
    /// Recently visited bucket/prefix locations.
    pub const RECENT_PATHS_KEY: &str = "bucketview.recent_paths";
    /// Expanded prefixes in the folder tree.
    pub const TREE_EXPANSION_KEY: &str = "bucketview.tree_expansion";
    /// Maximum number of recent paths kept.
    pub const RECENT_PATHS_MAX: usize = 10;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_policy_cap_by_mode() {
        let policy = ScanPolicy::default();
        assert_eq!(policy.cap(false), 1_000);
        assert_eq!(policy.cap(true), 3_000);
    }
}
