//! Capability-gated actions shared by toolbars, context menus and the
//! command palette.
//!
//! Every surface is a projection of the lists built by [`ActionCatalog`]:
//! menus render [`MenuEntry`] lists after [`filter_for_audience`], and the
//! palette flattens them with [`palette::project`].

mod catalog;
pub mod palette;

use std::fmt;
use std::rc::Rc;

pub use catalog::{ActionCatalog, ActionCommand, ActionContext};
pub use palette::{Command, CommandPalette, PaletteKey, PaletteOutcome, Scope};

/// Side effect run when an action is triggered.
pub type ActionFn = Rc<dyn Fn()>;

/// Visibility tier of an action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Audience {
    /// Shown in every UI mode.
    #[default]
    All,
    /// Shown only in advanced mode.
    Advanced,
}

impl Audience {
    pub fn is_visible(self, is_advanced: bool) -> bool {
        is_advanced || self == Self::All
    }
}

/// A renderable action. Disabled actions stay in the list and are inert.
#[derive(Clone)]
pub struct UiAction {
    pub id: String,
    pub label: String,
    pub enabled: bool,
    /// Why the action is disabled, shown as a tooltip.
    pub disabled_reason: Option<String>,
    pub audience: Audience,
    pub danger: bool,
    /// Extra words the palette matches on.
    pub keywords: Vec<String>,
    pub command: ActionCommand,
    run: ActionFn,
}

impl UiAction {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        command: ActionCommand,
        run: ActionFn,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            enabled: true,
            disabled_reason: None,
            audience: Audience::All,
            danger: false,
            keywords: Vec::new(),
            command,
            run,
        }
    }

    pub fn advanced(mut self) -> Self {
        self.audience = Audience::Advanced;
        self
    }

    pub fn danger(mut self) -> Self {
        self.danger = true;
        self
    }

    pub fn keywords(mut self, words: &[&str]) -> Self {
        self.keywords = words.iter().map(|w| w.to_string()).collect();
        self
    }

    /// Apply a gate result: `Err(reason)` disables the action.
    pub fn gated(mut self, gate: Result<(), String>) -> Self {
        match gate {
            Ok(()) => {
                self.enabled = true;
                self.disabled_reason = None;
            }
            Err(reason) => {
                self.enabled = false;
                self.disabled_reason = Some(reason);
            }
        }
        self
    }

    /// Run the action. Returns `false` (and does nothing) when disabled.
    pub fn run(&self) -> bool {
        if !self.enabled {
            return false;
        }
        (self.run)();
        true
    }

    pub(crate) fn runner(&self) -> ActionFn {
        Rc::clone(&self.run)
    }
}

impl fmt::Debug for UiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiAction")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("enabled", &self.enabled)
            .field("audience", &self.audience)
            .field("danger", &self.danger)
            .finish_non_exhaustive()
    }
}

/// One line of a menu.
#[derive(Clone, Debug)]
pub enum MenuEntry {
    Action(UiAction),
    Divider,
}

impl MenuEntry {
    pub fn as_action(&self) -> Option<&UiAction> {
        match self {
            Self::Action(action) => Some(action),
            Self::Divider => None,
        }
    }

    pub fn is_divider(&self) -> bool {
        matches!(self, Self::Divider)
    }
}

impl From<UiAction> for MenuEntry {
    fn from(action: UiAction) -> Self {
        Self::Action(action)
    }
}

/// Drop actions the UI mode hides, then collapse dividers.
///
/// No two dividers end up adjacent, and the list never starts or ends
/// with one.
pub fn filter_for_audience(entries: &[MenuEntry], is_advanced: bool) -> Vec<MenuEntry> {
    let mut out: Vec<MenuEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            MenuEntry::Action(action) if !action.audience.is_visible(is_advanced) => {}
            MenuEntry::Divider if out.last().is_none_or(MenuEntry::is_divider) => {}
            entry => out.push(entry.clone()),
        }
    }
    if out.last().is_some_and(MenuEntry::is_divider) {
        out.pop();
    }
    out
}

/// Visible actions of a divider-free list.
pub fn visible_actions(actions: &[UiAction], is_advanced: bool) -> Vec<UiAction> {
    actions
        .iter()
        .filter(|a| a.audience.is_visible(is_advanced))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn noop() -> ActionFn {
        Rc::new(|| {})
    }

    fn action(id: &str, audience: Audience) -> MenuEntry {
        let mut action = UiAction::new(id, id, ActionCommand::Refresh, noop());
        action.audience = audience;
        action.into()
    }

    fn ids(entries: &[MenuEntry]) -> Vec<&str> {
        entries
            .iter()
            .map(|e| e.as_action().map_or("---", |a| a.id.as_str()))
            .collect()
    }

    #[test]
    fn test_audience_filter_collapses_dividers() {
        let entries = vec![
            action("A", Audience::All),
            MenuEntry::Divider,
            action("B", Audience::Advanced),
            MenuEntry::Divider,
            action("C", Audience::All),
        ];
        assert_eq!(ids(&filter_for_audience(&entries, false)), vec!["A", "---", "C"]);
        assert_eq!(
            ids(&filter_for_audience(&entries, true)),
            vec!["A", "---", "B", "---", "C"]
        );
    }

    #[test]
    fn test_no_leading_or_trailing_divider() {
        let entries = vec![
            MenuEntry::Divider,
            action("X", Audience::Advanced),
            MenuEntry::Divider,
            action("A", Audience::All),
            MenuEntry::Divider,
            action("Y", Audience::Advanced),
            MenuEntry::Divider,
        ];
        assert_eq!(ids(&filter_for_audience(&entries, false)), vec!["A"]);
        assert!(filter_for_audience(&[MenuEntry::Divider], true).is_empty());
    }

    #[test]
    fn test_disabled_action_is_inert_but_kept() {
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let run: ActionFn = Rc::new(move || counter.set(counter.get() + 1));
        let action = UiAction::new("x", "X", ActionCommand::Refresh, run)
            .gated(Err("Offline".to_string()));
        assert!(!action.run());
        assert_eq!(count.get(), 0);
        assert_eq!(action.disabled_reason.as_deref(), Some("Offline"));

        let entries = filter_for_audience(&[action.clone().into()], false);
        assert_eq!(entries.len(), 1);

        let enabled = action.gated(Ok(()));
        assert!(enabled.run());
        assert_eq!(count.get(), 1);
    }
}
