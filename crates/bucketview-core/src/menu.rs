//! Context-menu state machine.
//!
//! At most one menu is live. Opening any menu replaces the previous one;
//! a targeted close only dismisses the menu it was aimed at, so a late
//! close from an older interaction cannot hide a menu reopened since.
//!
//! Right-click menus are positioned at the pointer and clamped into the
//! viewport once their size is known. Until then they stay invisible.

use crate::config::MenuPolicy;
use crate::selection::SelectionModel;

// =============================================================================
// Geometry
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Clamp a menu's top-left corner so the whole box stays inside
/// `[padding, viewport - padding]` on both axes.
///
/// A menu larger than the viewport is pinned to the top-left inset.
pub fn clamp_to_viewport(anchor: Point, menu: Size, viewport: Size, padding: f64) -> Point {
    let clamp_axis = |pos: f64, extent: f64, limit: f64| {
        let max = limit - padding - extent;
        pos.min(max).max(padding)
    };
    Point {
        x: clamp_axis(anchor.x, menu.width, viewport.width),
        y: clamp_axis(anchor.y, menu.height, viewport.height),
    }
}

// =============================================================================
// Identity
// =============================================================================

/// How the menu was opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuSource {
    /// Right-click at a pointer position.
    Context,
    /// A row or toolbar "more" button.
    Button,
}

/// What the menu is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuKind {
    Object,
    Prefix,
    /// Background of the list.
    List,
}

/// `(source, kind, key)` triple identifying an open menu.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MenuIdentity {
    pub source: MenuSource,
    pub kind: MenuKind,
    pub key: Option<String>,
}

/// Which action list the menu shows, fixed at open time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuContents {
    Object { key: String },
    /// Bulk actions for the current multi-selection.
    Selection { count: usize },
    Prefix { prefix: String },
    List,
}

// =============================================================================
// State Machine
// =============================================================================

/// Events that can dismiss or reposition an open menu.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MenuEvent {
    /// Scroll of the list viewport or the window.
    Scroll,
    Wheel,
    Escape,
    /// Pointer pressed; `inside` is true when the target is within the menu.
    PointerDown { inside: bool },
    /// Viewport resized to the given size.
    Resize(Size),
}

#[derive(Clone, Debug, PartialEq)]
struct OpenMenu {
    identity: MenuIdentity,
    contents: MenuContents,
    anchor: Point,
    measured: Option<Size>,
    position: Option<Point>,
}

/// What the renderer needs.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuView {
    pub visible: bool,
    /// Clamped top-left corner for right-click menus; `None` for
    /// button menus, which use anchored popup positioning.
    pub position: Option<Point>,
    /// Point the menu was opened at; button menus hang below it.
    pub anchor: Point,
    pub identity: MenuIdentity,
    pub contents: MenuContents,
}

#[derive(Clone, Debug, Default)]
pub struct ContextMenu {
    policy: MenuPolicy,
    viewport: Size,
    open: Option<OpenMenu>,
}

impl ContextMenu {
    pub fn new(policy: MenuPolicy, viewport: Size) -> Self {
        Self {
            policy,
            viewport,
            open: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn identity(&self) -> Option<&MenuIdentity> {
        self.open.as_ref().map(|m| &m.identity)
    }

    /// Open the menu for an object row.
    ///
    /// A key that belongs to a multi-selection gets the selection actions.
    pub fn open_object(
        &mut self,
        key: &str,
        source: MenuSource,
        anchor: Point,
        selection: &SelectionModel,
    ) {
        let contents = if selection.is_multi_member(key) {
            MenuContents::Selection {
                count: selection.len(),
            }
        } else {
            MenuContents::Object {
                key: key.to_string(),
            }
        };
        self.replace(
            MenuIdentity {
                source,
                kind: MenuKind::Object,
                key: Some(key.to_string()),
            },
            contents,
            anchor,
        );
    }

    pub fn open_prefix(&mut self, prefix: &str, source: MenuSource, anchor: Point) {
        self.replace(
            MenuIdentity {
                source,
                kind: MenuKind::Prefix,
                key: Some(prefix.to_string()),
            },
            MenuContents::Prefix {
                prefix: prefix.to_string(),
            },
            anchor,
        );
    }

    pub fn open_list(&mut self, source: MenuSource, anchor: Point) {
        self.replace(
            MenuIdentity {
                source,
                kind: MenuKind::List,
                key: None,
            },
            MenuContents::List,
            anchor,
        );
    }

    fn replace(&mut self, identity: MenuIdentity, contents: MenuContents, anchor: Point) {
        log::debug!("open {:?} menu ({:?})", identity.kind, identity.source);
        self.open = Some(OpenMenu {
            identity,
            contents,
            anchor,
            measured: None,
            position: None,
        });
    }

    /// Close the menu. With `expected`, only close if it is still the open one.
    ///
    /// Returns `true` if a menu was closed.
    pub fn close(&mut self, expected: Option<&MenuIdentity>) -> bool {
        let matches = match (&self.open, expected) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(open), Some(identity)) => open.identity == *identity,
        };
        if matches {
            self.open = None;
        }
        matches
    }

    /// Feed a window or viewport event. Returns `true` if the menu closed.
    pub fn handle_event(&mut self, event: MenuEvent) -> bool {
        match event {
            MenuEvent::Scroll | MenuEvent::Wheel | MenuEvent::Escape => self.close(None),
            MenuEvent::PointerDown { inside } => !inside && self.close(None),
            MenuEvent::Resize(viewport) => {
                self.viewport = viewport;
                self.reclamp();
                false
            }
        }
    }

    /// The rendered menu reported its size.
    pub fn measured(&mut self, size: Size) {
        if let Some(open) = self.open.as_mut() {
            open.measured = Some(size);
        }
        self.reclamp();
    }

    fn reclamp(&mut self) {
        let padding = self.policy.padding;
        let viewport = self.viewport;
        if let Some(open) = self.open.as_mut()
            && open.identity.source == MenuSource::Context
            && let Some(size) = open.measured
        {
            open.position = Some(clamp_to_viewport(open.anchor, size, viewport, padding));
        }
    }

    pub fn view(&self) -> Option<MenuView> {
        let open = self.open.as_ref()?;
        let (visible, position) = match open.identity.source {
            MenuSource::Button => (true, None),
            MenuSource::Context => (open.position.is_some(), open.position),
        };
        Some(MenuView {
            visible,
            position,
            anchor: open.anchor,
            identity: open.identity.clone(),
            contents: open.contents.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> ContextMenu {
        ContextMenu::new(MenuPolicy::default(), Size::new(800.0, 600.0))
    }

    #[test]
    fn test_single_instance() {
        let mut menu = menu();
        let selection = SelectionModel::new();
        menu.open_object("a.txt", MenuSource::Button, Point::default(), &selection);
        menu.open_prefix("docs/", MenuSource::Context, Point::new(5.0, 5.0));
        menu.open_list(MenuSource::Context, Point::new(10.0, 10.0));
        let identity = menu.identity().unwrap();
        assert_eq!(identity.kind, MenuKind::List);
        assert_eq!(identity.key, None);
    }

    #[test]
    fn test_targeted_close_ignores_stale_identity() {
        let mut menu = menu();
        let selection = SelectionModel::new();
        menu.open_object("a", MenuSource::Button, Point::default(), &selection);
        let stale = menu.identity().unwrap().clone();
        menu.open_object("b", MenuSource::Button, Point::default(), &selection);
        assert!(!menu.close(Some(&stale)));
        assert!(menu.is_open());
        let current = menu.identity().unwrap().clone();
        assert!(menu.close(Some(&current)));
        assert!(!menu.is_open());
        assert!(!menu.close(None));
    }

    #[test]
    fn test_implicit_close_triggers() {
        let selection = SelectionModel::new();
        for event in [MenuEvent::Scroll, MenuEvent::Wheel, MenuEvent::Escape, MenuEvent::PointerDown { inside: false }] {
            let mut menu = menu();
            menu.open_object("a", MenuSource::Button, Point::default(), &selection);
            assert!(menu.handle_event(event), "{event:?} should close");
        }
        let mut menu = menu();
        menu.open_list(MenuSource::Context, Point::default());
        assert!(!menu.handle_event(MenuEvent::PointerDown { inside: true }));
        assert!(menu.is_open());
    }

    #[test]
    fn test_context_menu_hidden_until_measured_then_clamped() {
        let mut menu = menu();
        menu.open_list(MenuSource::Context, Point::new(780.0, 590.0));
        let view = menu.view().unwrap();
        assert!(!view.visible);

        menu.measured(Size::new(200.0, 100.0));
        let view = menu.view().unwrap();
        assert!(view.visible);
        assert_eq!(view.position, Some(Point::new(592.0, 492.0)));
    }

    #[test]
    fn test_resize_reclamps_instead_of_closing() {
        let mut menu = menu();
        menu.open_list(MenuSource::Context, Point::new(500.0, 300.0));
        menu.measured(Size::new(200.0, 100.0));
        assert_eq!(menu.view().unwrap().position, Some(Point::new(500.0, 300.0)));
        assert!(!menu.handle_event(MenuEvent::Resize(Size::new(400.0, 300.0))));
        assert_eq!(menu.view().unwrap().position, Some(Point::new(192.0, 192.0)));
    }

    #[test]
    fn test_clamp_oversized_menu_pins_to_inset() {
        let pos = clamp_to_viewport(Point::new(50.0, 50.0), Size::new(1000.0, 1000.0), Size::new(300.0, 300.0), 8.0);
        assert_eq!(pos, Point::new(8.0, 8.0));
        let neg = clamp_to_viewport(Point::new(-20.0, 3.0), Size::new(10.0, 10.0), Size::new(300.0, 300.0), 8.0);
        assert_eq!(neg, Point::new(8.0, 8.0));
    }

    #[test]
    fn test_button_menu_visible_without_position() {
        let mut menu = menu();
        menu.open_prefix("docs/", MenuSource::Button, Point::default());
        let view = menu.view().unwrap();
        assert!(view.visible);
        assert_eq!(view.position, None);
    }

    #[test]
    fn test_multi_selection_member_gets_selection_actions() {
        let mut selection = SelectionModel::new();
        selection.toggle("a");
        selection.toggle("b");
        let mut menu = menu();
        menu.open_object("a", MenuSource::Context, Point::default(), &selection);
        assert_eq!(menu.view().unwrap().contents, MenuContents::Selection { count: 2 });
        menu.open_object("c", MenuSource::Context, Point::default(), &selection);
        assert_eq!(
            menu.view().unwrap().contents,
            MenuContents::Object { key: "c".to_string() }
        );
    }
}
