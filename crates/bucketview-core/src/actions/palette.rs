//! Command palette: the action lists of every scope flattened into one
//! searchable list.

use std::fmt;

use super::{ActionFn, MenuEntry, UiAction};
use crate::search::SearchQuery;

/// Scope an action was collected from. Keeps flattened ids unique.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Selection,
    Object,
    Prefix,
}

impl Scope {
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Global => "global_",
            Self::Selection => "selection_",
            Self::Object => "obj_",
            Self::Prefix => "prefix_",
        }
    }
}

/// A flattened palette entry.
#[derive(Clone)]
pub struct Command {
    pub id: String,
    pub label: String,
    pub enabled: bool,
    pub disabled_reason: Option<String>,
    pub keywords: Vec<String>,
    run: ActionFn,
}

impl Command {
    fn from_action(scope: Scope, action: &UiAction) -> Self {
        Self {
            id: format!("{}{}", scope.id_prefix(), action.id),
            label: action.label.clone(),
            enabled: action.enabled,
            disabled_reason: action.disabled_reason.clone(),
            keywords: action.keywords.clone(),
            run: action.runner(),
        }
    }

    fn haystack(&self) -> String {
        let mut text = self.label.clone();
        for word in &self.keywords {
            text.push(' ');
            text.push_str(word);
        }
        text
    }

    pub fn run(&self) -> bool {
        if !self.enabled {
            return false;
        }
        (self.run)();
        true
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

/// Visible actions of `entries` as palette commands; dividers are skipped.
pub fn project(scope: Scope, entries: &[MenuEntry], is_advanced: bool) -> Vec<Command> {
    entries
        .iter()
        .filter_map(MenuEntry::as_action)
        .filter(|a| a.audience.is_visible(is_advanced))
        .map(|a| Command::from_action(scope, a))
        .collect()
}

/// Same as [`project`] for divider-free lists.
pub fn project_actions(scope: Scope, actions: &[UiAction], is_advanced: bool) -> Vec<Command> {
    actions
        .iter()
        .filter(|a| a.audience.is_visible(is_advanced))
        .map(|a| Command::from_action(scope, a))
        .collect()
}

/// Keys the palette reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaletteKey {
    Up,
    Down,
    Enter,
    Escape,
}

impl PaletteKey {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Self::Up),
            "ArrowDown" => Some(Self::Down),
            "Enter" => Some(Self::Enter),
            "Escape" => Some(Self::Escape),
            _ => None,
        }
    }
}

/// Result of a palette key press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaletteOutcome {
    /// Cursor moved or nothing happened.
    Handled,
    /// The command with this id ran and the palette closed.
    Ran(String),
    Closed,
}

#[derive(Debug, Default)]
pub struct CommandPalette {
    open: bool,
    query: SearchQuery,
    active: usize,
    commands: Vec<Command>,
}

impl CommandPalette {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        self.query.raw()
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// Move the cursor to `index` of the filtered list (pointer hover).
    pub fn set_active(&mut self, index: usize) {
        self.active = index;
        self.clamp_active();
    }

    pub fn open(&mut self, commands: Vec<Command>) {
        self.open = true;
        self.query = SearchQuery::default();
        self.active = 0;
        self.commands = commands;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.commands.clear();
    }

    /// Replace the command list while open (inputs changed).
    pub fn set_commands(&mut self, commands: Vec<Command>) {
        self.commands = commands;
        self.clamp_active();
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = SearchQuery::parse(query);
        self.active = 0;
    }

    /// Commands matching the query, in catalog order.
    pub fn filtered(&self) -> Vec<&Command> {
        self.commands
            .iter()
            .filter(|c| self.query.matches(&c.haystack()))
            .collect()
    }

    fn clamp_active(&mut self) {
        let len = self.filtered().len();
        self.active = self.active.min(len.saturating_sub(1));
    }

    pub fn handle_key(&mut self, key: PaletteKey) -> PaletteOutcome {
        match key {
            PaletteKey::Up => {
                self.active = self.active.saturating_sub(1);
                PaletteOutcome::Handled
            }
            PaletteKey::Down => {
                self.active += 1;
                self.clamp_active();
                PaletteOutcome::Handled
            }
            PaletteKey::Escape => {
                self.close();
                PaletteOutcome::Closed
            }
            PaletteKey::Enter => {
                let ran = self
                    .filtered()
                    .get(self.active)
                    .filter(|c| c.run())
                    .map(|c| c.id.clone());
                match ran {
                    Some(id) => {
                        self.close();
                        PaletteOutcome::Ran(id)
                    }
                    None => PaletteOutcome::Handled,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionCommand;
    use std::cell::Cell;
    use std::rc::Rc;

    fn action(id: &str, label: &str, keywords: &[&str], counter: &Rc<Cell<u32>>) -> UiAction {
        let counter = Rc::clone(counter);
        UiAction::new(id, label, ActionCommand::Refresh, Rc::new(move || counter.set(counter.get() + 1)))
            .keywords(keywords)
    }

    fn palette(counter: &Rc<Cell<u32>>) -> CommandPalette {
        let global = vec![
            action("refresh", "Refresh", &["reload"], counter),
            action("paste", "Paste", &["clipboard"], counter).gated(Err("Clipboard is empty".to_string())),
            action("index", "Index bucket", &["search"], counter).advanced(),
        ];
        let object: Vec<MenuEntry> = vec![
            action("delete", "Delete", &["remove"], counter).into(),
            MenuEntry::Divider,
            action("copy", "Copy", &["clipboard"], counter).into(),
        ];
        let mut commands = project_actions(Scope::Global, &global, false);
        commands.extend(project(Scope::Object, &object, false));
        let mut palette = CommandPalette::default();
        palette.open(commands);
        palette
    }

    #[test]
    fn test_projection_prefixes_ids_and_hides_advanced() {
        let counter = Rc::new(Cell::new(0));
        let palette = palette(&counter);
        let ids: Vec<_> = palette.filtered().iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec!["global_refresh", "global_paste", "obj_delete", "obj_copy"]);
    }

    #[test]
    fn test_filter_matches_keywords() {
        let counter = Rc::new(Cell::new(0));
        let mut palette = palette(&counter);
        palette.set_query("clip");
        let ids: Vec<_> = palette.filtered().iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec!["global_paste", "obj_copy"]);
    }

    #[test]
    fn test_active_index_clamped() {
        let counter = Rc::new(Cell::new(0));
        let mut palette = palette(&counter);
        palette.set_query("clip");
        for _ in 0..5 {
            palette.handle_key(PaletteKey::Down);
        }
        assert_eq!(palette.active(), 1);
        palette.handle_key(PaletteKey::Up);
        palette.handle_key(PaletteKey::Up);
        assert_eq!(palette.active(), 0);
    }

    #[test]
    fn test_set_active_clamped() {
        let counter = Rc::new(Cell::new(0));
        let mut palette = palette(&counter);
        palette.set_active(2);
        assert_eq!(palette.active(), 2);
        palette.set_query("clip");
        palette.set_active(9);
        assert_eq!(palette.active(), 1);
    }

    #[test]
    fn test_enter_runs_enabled_command_only() {
        let counter = Rc::new(Cell::new(0));
        let mut palette = palette(&counter);
        palette.set_query("paste");
        assert_eq!(palette.handle_key(PaletteKey::Enter), PaletteOutcome::Handled);
        assert_eq!(counter.get(), 0);
        assert!(palette.is_open());

        palette.set_query("reload");
        assert_eq!(
            palette.handle_key(PaletteKey::Enter),
            PaletteOutcome::Ran("global_refresh".to_string())
        );
        assert_eq!(counter.get(), 1);
        assert!(!palette.is_open());
    }

    #[test]
    fn test_escape_closes() {
        let counter = Rc::new(Cell::new(0));
        let mut palette = palette(&counter);
        assert_eq!(palette.handle_key(PaletteKey::Escape), PaletteOutcome::Closed);
        assert!(!palette.is_open());
        assert!(palette.filtered().is_empty());
    }
}
