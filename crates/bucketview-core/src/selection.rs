//! Multi-select and keyboard navigation over the ordered object keys.
//!
//! "Loaded" always means "currently materialized in the derived rows";
//! callers pass that ordered key sequence into every operation that needs
//! positions.

use std::collections::HashSet;

use crate::input::{Modifiers, NavKey};
use crate::models::BrowseContext;

/// Selected keys plus the anchor for the next range operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected: HashSet<String>,
    /// Most recently explicitly touched key.
    pub last_selected: Option<String>,
}

/// Selection state scoped to one browse context.
#[derive(Clone, Debug, Default)]
pub struct SelectionModel {
    context: Option<BrowseContext>,
    state: SelectionState,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn context(&self) -> Option<&BrowseContext> {
        self.context.as_ref()
    }

    /// Adopt a browse context, clearing the selection when it changed.
    ///
    /// Returns `true` when a reset happened.
    pub fn sync_context(&mut self, context: &BrowseContext) -> bool {
        if self.context.as_ref() == Some(context) {
            return false;
        }
        log::debug!(
            "selection reset for {}:{}/{}",
            context.profile_id,
            context.bucket,
            context.prefix
        );
        self.context = Some(context.clone());
        self.clear();
        true
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_selected(&self, key: &str) -> bool {
        self.state.selected.contains(key)
    }

    pub fn len(&self) -> usize {
        self.state.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.selected.is_empty()
    }

    pub fn last_selected(&self) -> Option<&str> {
        self.state.last_selected.as_deref()
    }

    /// Whether `key` belongs to a selection of more than one key.
    pub fn is_multi_member(&self, key: &str) -> bool {
        self.len() > 1 && self.is_selected(key)
    }

    /// Selected keys in display order; keys no longer loaded are omitted.
    pub fn selected_in_order(&self, order: &[String]) -> Vec<String> {
        order
            .iter()
            .filter(|k| self.state.selected.contains(k.as_str()))
            .cloned()
            .collect()
    }

    /// Whether every loaded key is selected (header checkbox state).
    pub fn all_loaded_selected(&self, order: &[String]) -> bool {
        !order.is_empty() && order.iter().all(|k| self.is_selected(k))
    }

    // =========================================================================
    // Operations
    // =========================================================================

    pub fn select_single(&mut self, key: &str) {
        self.state.selected.clear();
        self.state.selected.insert(key.to_string());
        self.state.last_selected = Some(key.to_string());
    }

    pub fn toggle(&mut self, key: &str) {
        if !self.state.selected.remove(key) {
            self.state.selected.insert(key.to_string());
        }
        self.state.last_selected = Some(key.to_string());
    }

    /// Select the inclusive span between `anchor` and `key`.
    ///
    /// Falls back to [`select_single`](Self::select_single) when either key
    /// is not in `order`.
    pub fn select_range(&mut self, order: &[String], anchor: &str, key: &str, additive: bool) {
        let Some(range) = range_between(order, anchor, key) else {
            self.select_single(key);
            return;
        };
        if !additive {
            self.state.selected.clear();
        }
        self.state.selected.extend(range.iter().cloned());
        self.state.last_selected = Some(key.to_string());
    }

    pub fn select_all_loaded(&mut self, order: &[String]) {
        self.state.selected.extend(order.iter().cloned());
        if let Some(last) = order.last() {
            self.state.last_selected = Some(last.clone());
        }
    }

    /// Header checkbox: select or deselect every loaded key.
    pub fn toggle_select_all(&mut self, order: &[String], checked: bool) {
        if checked {
            self.select_all_loaded(order);
        } else {
            for key in order {
                self.state.selected.remove(key);
            }
            self.state.last_selected = None;
        }
    }

    pub fn clear(&mut self) {
        self.state.selected.clear();
        self.state.last_selected = None;
    }

    /// Row click: shift extends from the anchor, ctrl/cmd toggles, plain replaces.
    pub fn click(&mut self, order: &[String], key: &str, modifiers: Modifiers) {
        if modifiers.shift
            && let Some(anchor) = self.state.last_selected.clone()
        {
            self.select_range(order, &anchor, key, modifiers.is_toggle());
            return;
        }
        if modifiers.is_toggle() {
            self.toggle(key);
        } else {
            self.select_single(key);
        }
    }

    /// Move the cursor with a navigation key.
    ///
    /// With `range` held, the span from the anchor to the new row is added
    /// to the selection; otherwise the new row becomes the only selection.
    /// Returns the index of the newly active row so it can be scrolled into view.
    pub fn navigate(
        &mut self,
        order: &[String],
        nav: NavKey,
        range: bool,
        page_step: usize,
    ) -> Option<usize> {
        let len = order.len();
        if len == 0 {
            return None;
        }
        let current = self
            .state
            .last_selected
            .as_deref()
            .and_then(|k| order.iter().position(|o| o == k));
        let last = len - 1;
        let step = page_step.max(1);
        let next = match current {
            None if nav.starts_at_top() => 0,
            None => last,
            Some(i) => match nav {
                NavKey::Up => i.saturating_sub(1),
                NavKey::Down => (i + 1).min(last),
                NavKey::Home => 0,
                NavKey::End => last,
                NavKey::PageUp => i.saturating_sub(step),
                NavKey::PageDown => (i + step).min(last),
            },
        };

        let target = order[next].clone();
        match (range, self.state.last_selected.clone()) {
            (true, Some(anchor)) => self.select_range(order, &anchor, &target, true),
            _ => self.select_single(&target),
        }
        Some(next)
    }
}

/// Keys between two positions in `order`, inclusive, independent of argument order.
fn range_between<'a>(order: &'a [String], a: &str, b: &str) -> Option<&'a [String]> {
    let ia = order.iter().position(|k| k == a)?;
    let ib = order.iter().position(|k| k == b)?;
    let (lo, hi) = if ia <= ib { (ia, ib) } else { (ib, ia) };
    Some(&order[lo..=hi])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Vec<String> {
        ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect()
    }

    fn sorted(model: &SelectionModel) -> Vec<String> {
        let mut keys: Vec<_> = model.state().selected.iter().cloned().collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_select_single_and_toggle() {
        let mut model = SelectionModel::new();
        model.select_single("a");
        model.toggle("c");
        assert_eq!(sorted(&model), vec!["a", "c"]);
        model.toggle("a");
        assert_eq!(sorted(&model), vec!["c"]);
        assert_eq!(model.last_selected(), Some("a"));
    }

    #[test]
    fn test_range_is_symmetric() {
        let order = order();
        let mut forward = SelectionModel::new();
        forward.select_range(&order, "b", "d", false);
        let mut backward = SelectionModel::new();
        backward.select_range(&order, "d", "b", false);
        assert_eq!(sorted(&forward), vec!["b", "c", "d"]);
        assert_eq!(forward.state().selected, backward.state().selected);
        assert_eq!(forward.last_selected(), Some("d"));
    }

    #[test]
    fn test_range_additive_and_missing_anchor() {
        let order = order();
        let mut model = SelectionModel::new();
        model.select_single("e");
        model.select_range(&order, "a", "b", true);
        assert_eq!(sorted(&model), vec!["a", "b", "e"]);

        model.select_range(&order, "gone", "c", false);
        assert_eq!(sorted(&model), vec!["c"]);
    }

    #[test]
    fn test_click_modifiers() {
        let order = order();
        let mut model = SelectionModel::new();
        model.click(&order, "b", Modifiers::NONE);
        model.click(&order, "d", Modifiers::shift());
        assert_eq!(sorted(&model), vec!["b", "c", "d"]);
        model.click(&order, "a", Modifiers::ctrl());
        assert_eq!(sorted(&model), vec!["a", "b", "c", "d"]);
        model.click(&order, "e", Modifiers::NONE);
        assert_eq!(sorted(&model), vec!["e"]);
    }

    #[test]
    fn test_shift_click_without_anchor_selects_single() {
        let mut model = SelectionModel::new();
        model.click(&order(), "c", Modifiers::shift());
        assert_eq!(sorted(&model), vec!["c"]);
    }

    #[test]
    fn test_select_all_and_clear() {
        let order = order();
        let mut model = SelectionModel::new();
        model.toggle_select_all(&order, true);
        assert!(model.all_loaded_selected(&order));
        assert_eq!(model.last_selected(), Some("e"));
        model.toggle_select_all(&order, false);
        assert!(model.is_empty());
        assert_eq!(model.last_selected(), None);
    }

    #[test]
    fn test_context_change_resets() {
        let mut model = SelectionModel::new();
        let ctx = BrowseContext::new("p", "b", "docs");
        assert!(model.sync_context(&ctx));
        model.select_single("docs/a");
        assert!(!model.sync_context(&BrowseContext::new("p", "b", "docs/")));
        assert_eq!(model.len(), 1);
        assert!(model.sync_context(&BrowseContext::new("p", "b", "other/")));
        assert!(model.is_empty());
        assert_eq!(model.last_selected(), None);
    }

    #[test]
    fn test_navigate_from_nothing() {
        let order = order();
        let mut model = SelectionModel::new();
        assert_eq!(model.navigate(&order, NavKey::Down, false, 10), Some(0));
        model.clear();
        assert_eq!(model.navigate(&order, NavKey::Up, false, 10), Some(4));
        assert_eq!(model.navigate(&[], NavKey::Down, false, 10), None);
    }

    #[test]
    fn test_navigate_clamps_and_pages() {
        let order = order();
        let mut model = SelectionModel::new();
        model.select_single("b");
        assert_eq!(model.navigate(&order, NavKey::PageDown, false, 2), Some(3));
        assert_eq!(model.navigate(&order, NavKey::PageDown, false, 2), Some(4));
        assert_eq!(model.navigate(&order, NavKey::Down, false, 2), Some(4));
        assert_eq!(model.navigate(&order, NavKey::Home, false, 2), Some(0));
        assert_eq!(model.navigate(&order, NavKey::Up, false, 2), Some(0));
        assert_eq!(sorted(&model), vec!["a"]);
    }

    #[test]
    fn test_navigate_with_range_extends() {
        let order = order();
        let mut model = SelectionModel::new();
        model.select_single("b");
        model.navigate(&order, NavKey::Down, true, 10);
        model.navigate(&order, NavKey::Down, true, 10);
        assert_eq!(sorted(&model), vec!["b", "c", "d"]);
        assert_eq!(model.last_selected(), Some("d"));
    }

    #[test]
    fn test_selected_in_order() {
        let order = order();
        let mut model = SelectionModel::new();
        model.toggle("d");
        model.toggle("a");
        model.toggle("zzz");
        assert_eq!(model.selected_in_order(&order), vec!["a", "d"]);
        assert!(model.is_multi_member("a"));
        assert!(!model.is_multi_member("b"));
    }
}
