//! Centralized icon definitions.
//!
//! Icon theme is configured in `config.rs` via `ICON_THEME`.
//! This module maps semantic icon names to the selected theme's icons.

use icondata::Icon;

use crate::config::IconTheme;

// =============================================================================
// Theme Imports
// =============================================================================

mod lucide {
    pub use icondata::{
        LuArrowUp as GoUp, LuBookOpen as FilePdf, LuChevronDown as ChevronDown,
        LuChevronRight as ChevronRight, LuClock as Clock,
        LuDownload as Download, LuEllipsisVertical as More, LuFile as File,
        LuFileText as FileText, LuFolder as Folder, LuFolderOpen as Bucket, LuHouse as Home,
        LuImage as FileImage, LuPlus as Plus, LuRefreshCw as Refresh, LuSearch as Search,
        LuStar as Star, LuTerminal as Command, LuX as Close,
    };
}

mod bootstrap {
    pub use icondata::{
        BsArrowClockwise as Refresh, BsArrowUp as GoUp, BsChevronDown as ChevronDown,
        BsChevronRight as ChevronRight, BsClock as Clock,
        BsDownload as Download, BsFileEarmark as File, BsFileEarmarkImage as FileImage,
        BsFileEarmarkPdf as FilePdf, BsFileEarmarkText as FileText, BsFolder2 as Bucket,
        BsFolderFill as Folder, BsHouseFill as Home, BsPlusLg as Plus, BsSearch as Search,
        BsStarFill as Star, BsTerminal as Command, BsThreeDotsVertical as More, BsXLg as Close,
    };
}

// =============================================================================
// Icon Constants (selected based on theme)
// =============================================================================

macro_rules! themed_icon {
    ($name:ident, $theme_name:ident) => {
        pub const $name: Icon = match crate::config::ICON_THEME {
            IconTheme::Lucide => lucide::$theme_name,
            IconTheme::Bootstrap => bootstrap::$theme_name,
        };
    };
}

themed_icon!(CHEVRON_RIGHT, ChevronRight);
themed_icon!(CHEVRON_DOWN, ChevronDown);
themed_icon!(CLOCK, Clock);
themed_icon!(FOLDER, Folder);
themed_icon!(FILE, File);
themed_icon!(FILE_TEXT, FileText);
themed_icon!(FILE_IMAGE, FileImage);
themed_icon!(FILE_PDF, FilePdf);
themed_icon!(SEARCH, Search);
themed_icon!(MORE, More);
themed_icon!(CLOSE, Close);
themed_icon!(REFRESH, Refresh);
themed_icon!(GO_UP, GoUp);
themed_icon!(STAR, Star);
themed_icon!(COMMAND, Command);
themed_icon!(DOWNLOAD, Download);
themed_icon!(BUCKET, Bucket);
themed_icon!(HOME, Home);
themed_icon!(PLUS, Plus);

/// Icon for an object key, chosen by extension.
pub fn for_key(key: &str) -> Icon {
    match bucketview_core::keys::extension(key).as_deref() {
        Some("png" | "jpg" | "jpeg" | "gif" | "webp" | "svg" | "bmp") => FILE_IMAGE,
        Some("txt" | "md" | "csv" | "json" | "log" | "yaml" | "yml" | "toml") => FILE_TEXT,
        Some("pdf") => FILE_PDF,
        _ => FILE,
    }
}
