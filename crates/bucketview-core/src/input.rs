//! Host-independent input descriptions.
//!
//! The web layer translates DOM events into these values so the state
//! machines never see a browser type.

/// Modifier keys held during a pointer or keyboard event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        meta: false,
        alt: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn is_toggle(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Drop-time copy modifier: any of ctrl, cmd, alt.
    pub fn is_copy(&self) -> bool {
        self.ctrl || self.meta || self.alt
    }
}

/// Keys that move the list cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

impl NavKey {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Self::Up),
            "ArrowDown" => Some(Self::Down),
            "Home" => Some(Self::Home),
            "End" => Some(Self::End),
            "PageUp" => Some(Self::PageUp),
            "PageDown" => Some(Self::PageDown),
            _ => None,
        }
    }

    /// Keys that start from the top of the list when nothing is selected.
    pub fn starts_at_top(self) -> bool {
        matches!(self, Self::Down | Self::Home | Self::PageDown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_key_mapping() {
        assert_eq!(NavKey::from_key("ArrowDown"), Some(NavKey::Down));
        assert_eq!(NavKey::from_key("PageUp"), Some(NavKey::PageUp));
        assert_eq!(NavKey::from_key("Enter"), None);
    }

    #[test]
    fn test_copy_modifiers() {
        assert!(!Modifiers::NONE.is_copy());
        assert!(!Modifiers::shift().is_copy());
        assert!(Modifiers { alt: true, ..Modifiers::NONE }.is_copy());
        assert!(Modifiers { meta: true, ..Modifiers::NONE }.is_toggle());
    }
}
