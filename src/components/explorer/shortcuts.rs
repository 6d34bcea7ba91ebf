//! Keyboard shortcuts of the object list.
//!
//! [`classify`] maps a key press to an intent without touching the DOM so
//! it can be tested on the host; [`handle_keydown`] applies it.

use bucketview_core::{ActionCommand, MenuEvent, Modifiers, NavKey, SelectionModel};
use leptos::prelude::*;

use super::commands::{ActionScope, run_action};
use super::file_list::{page_step, scroll_key_into_view};
use super::palette::open_palette;
use crate::app::AppContext;
use crate::utils::dom;

/// What a key press means for the explorer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Shortcut {
    OpenPalette,
    /// Close the menu, or clear the selection when no menu is open.
    Escape,
    Navigate { nav: NavKey, range: bool },
    Run(ActionCommand),
}

/// Classify a key press. Text fields keep everything but the palette
/// toggle and Escape.
pub fn classify(key: &str, modifiers: Modifiers, in_text_field: bool) -> Option<Shortcut> {
    if modifiers.is_toggle() && key.eq_ignore_ascii_case("k") {
        return Some(Shortcut::OpenPalette);
    }
    if key == "Escape" {
        return Some(Shortcut::Escape);
    }
    if in_text_field {
        return None;
    }
    if let Some(nav) = NavKey::from_key(key) {
        return Some(Shortcut::Navigate {
            nav,
            range: modifiers.shift,
        });
    }
    let command = match key {
        "Delete" => ActionCommand::DeleteSelection,
        "Backspace" if !modifiers.is_toggle() => ActionCommand::GoUp,
        _ if modifiers.is_toggle() && !modifiers.alt => match key.to_ascii_lowercase().as_str() {
            "a" => ActionCommand::SelectAll,
            "c" => ActionCommand::CopySelection,
            "x" => ActionCommand::CutSelection,
            "v" => ActionCommand::Paste,
            _ => return None,
        },
        _ => return None,
    };
    Some(Shortcut::Run(command))
}

pub fn key_modifiers(event: &web_sys::KeyboardEvent) -> Modifiers {
    Modifiers {
        shift: event.shift_key(),
        ctrl: event.ctrl_key(),
        meta: event.meta_key(),
        alt: event.alt_key(),
    }
}

pub fn mouse_modifiers(event: &web_sys::MouseEvent) -> Modifiers {
    Modifiers {
        shift: event.shift_key(),
        ctrl: event.ctrl_key(),
        meta: event.meta_key(),
        alt: event.alt_key(),
    }
}

/// Window-level keydown handler.
pub fn handle_keydown(ctx: AppContext, event: &web_sys::KeyboardEvent) {
    // The palette input handles its own keys
    if ctx.explorer.palette.with_untracked(|p| p.is_open()) {
        return;
    }
    let target = event.target();
    let in_text_field = dom::is_text_field(target.as_ref());
    let Some(shortcut) = classify(&event.key(), key_modifiers(event), in_text_field) else {
        return;
    };

    match shortcut {
        Shortcut::OpenPalette => {
            event.prevent_default();
            open_palette(ctx);
        }
        Shortcut::Escape => {
            let closed = ctx
                .explorer
                .menu
                .try_update(|m| m.handle_event(MenuEvent::Escape))
                .unwrap_or(false);
            if !closed && !in_text_field {
                ctx.explorer.selection.update(SelectionModel::clear);
            }
        }
        Shortcut::Navigate { nav, range } => {
            event.prevent_default();
            let step = page_step();
            let key = ctx.order.with_untracked(|order| {
                ctx.explorer
                    .selection
                    .try_update(|s| s.navigate(order, nav, range, step))
                    .flatten()
                    .and_then(|idx| order.get(idx).cloned())
            });
            if let Some(key) = key {
                scroll_key_into_view(ctx, &key);
            }
        }
        Shortcut::Run(command) => {
            event.prevent_default();
            run_action(ctx, command, ActionScope::List);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_toggle_everywhere() {
        assert_eq!(
            classify("k", Modifiers::ctrl(), true),
            Some(Shortcut::OpenPalette)
        );
        let cmd = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert_eq!(classify("K", cmd, false), Some(Shortcut::OpenPalette));
        assert_eq!(classify("k", Modifiers::NONE, false), None);
    }

    #[test]
    fn test_text_fields_keep_keys() {
        assert_eq!(classify("ArrowDown", Modifiers::NONE, true), None);
        assert_eq!(classify("a", Modifiers::ctrl(), true), None);
        assert_eq!(classify("Backspace", Modifiers::NONE, true), None);
        assert_eq!(
            classify("Escape", Modifiers::NONE, true),
            Some(Shortcut::Escape)
        );
    }

    #[test]
    fn test_navigation() {
        assert_eq!(
            classify("ArrowDown", Modifiers::NONE, false),
            Some(Shortcut::Navigate {
                nav: NavKey::Down,
                range: false
            })
        );
        assert_eq!(
            classify("End", Modifiers::shift(), false),
            Some(Shortcut::Navigate {
                nav: NavKey::End,
                range: true
            })
        );
    }

    #[test]
    fn test_commands() {
        assert_eq!(
            classify("a", Modifiers::ctrl(), false),
            Some(Shortcut::Run(ActionCommand::SelectAll))
        );
        assert_eq!(
            classify("V", Modifiers::ctrl(), false),
            Some(Shortcut::Run(ActionCommand::Paste))
        );
        assert_eq!(
            classify("Delete", Modifiers::NONE, false),
            Some(Shortcut::Run(ActionCommand::DeleteSelection))
        );
        assert_eq!(
            classify("Backspace", Modifiers::NONE, false),
            Some(Shortcut::Run(ActionCommand::GoUp))
        );
        assert_eq!(classify("c", Modifiers::NONE, false), None);
        assert_eq!(classify("z", Modifiers::ctrl(), false), None);
    }
}
