//! The single context menu shared by rows, folders, selections and the
//! list background.
//!
//! Right-click menus render hidden first; once measured they are clamped
//! into the viewport and shown. Button menus hang below their trigger.

use bucketview_core::actions::filter_for_audience;
use bucketview_core::menu::{Point, Size};
use bucketview_core::models::Row;
use bucketview_core::{ContextMenu, MenuContents, MenuEntry, MenuView};
use leptos::prelude::*;
use wasm_bindgen::JsCast;

use super::commands::{ActionScope, run_action};
use crate::app::AppContext;

stylance::import_crate_style!(css, "src/components/explorer/context_menu.module.css");

/// Marks the menu root; outside pointer presses close the menu.
pub const MENU_SELECTOR: &str = "[data-context-menu]";

/// Bottom-left corner of the element that received `event`.
pub fn anchor_below(event: &web_sys::MouseEvent) -> Point {
    event
        .current_target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .map(|el| {
            let rect = el.get_bounding_client_rect();
            Point::new(rect.left(), rect.bottom())
        })
        .unwrap_or_else(|| Point::new(event.client_x() as f64, event.client_y() as f64))
}

fn object_size(ctx: AppContext, key: &str) -> Option<u64> {
    ctx.rows.with_untracked(|rows| {
        rows.iter()
            .filter_map(Row::as_object)
            .find(|o| o.key == key)
            .map(|o| o.size)
    })
}

fn scope_of(contents: &MenuContents, size: Option<u64>) -> ActionScope<'_> {
    match contents {
        MenuContents::Object { key } => ActionScope::Object { key, size },
        MenuContents::Prefix { prefix } => ActionScope::Prefix(prefix),
        MenuContents::Selection { .. } | MenuContents::List => ActionScope::List,
    }
}

fn menu_style(view: &MenuView) -> String {
    match (view.visible, view.position) {
        (false, _) => "left: 0px; top: 0px; visibility: hidden;".to_string(),
        (true, Some(p)) => format!("left: {}px; top: {}px;", p.x, p.y),
        (true, None) => format!("left: {}px; top: {}px;", view.anchor.x, view.anchor.y),
    }
}

#[component]
pub fn ContextMenuView() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let root = NodeRef::<leptos::html::Div>::new();
    let view_state = Memo::new(move |_| ctx.explorer.menu.with(ContextMenu::view));

    // Measure right-click menus while they are still hidden
    Effect::new(move |_| {
        let Some(view) = view_state.get() else {
            return;
        };
        if view.visible {
            return;
        }
        if let Some(el) = root.get_untracked() {
            let rect = el.get_bounding_client_rect();
            ctx.explorer
                .menu
                .update(|m| m.measured(Size::new(rect.width(), rect.height())));
        }
    });

    let entries = move || {
        let view = view_state.get()?;
        let size = match &view.contents {
            MenuContents::Object { key } => object_size(ctx, key),
            _ => None,
        };
        let is_advanced = ctx.explorer.is_advanced.get();
        let entries = ctx.with_actions(|catalog, actions| catalog.menu_entries(actions, &view.contents, size));
        Some((view, size, filter_for_audience(&entries, is_advanced)))
    };

    move || {
        entries().map(|(view, size, entries)| {
            let title = match &view.contents {
                MenuContents::Selection { count } => Some(format!("{count} selected")),
                _ => None,
            };
            let identity = view.identity.clone();
            view! {
                <div
                    class=css::menu
                    node_ref=root
                    role="menu"
                    data-context-menu=""
                    style=menu_style(&view)
                    on:contextmenu=|ev| ev.prevent_default()
                >
                    {title.map(|t| view! { <div class=css::title>{t}</div> })}
                    {entries
                        .into_iter()
                        .map(|entry| match entry {
                            MenuEntry::Divider => view! { <div class=css::divider role="separator"></div> }.into_any(),
                            MenuEntry::Action(action) => {
                                let identity = identity.clone();
                                let contents = view.contents.clone();
                                let command = action.command.clone();
                                let class = if action.danger {
                                    format!("{} {}", css::item, css::danger)
                                } else {
                                    css::item.to_string()
                                };
                                let enabled = action.enabled;
                                let reason = action.disabled_reason.clone();
                                let label = action.label.clone();
                                view! {
                                    <button
                                        class=class
                                        role="menuitem"
                                        disabled=!enabled
                                        title=reason
                                        on:click=move |_| {
                                            ctx.explorer.menu.update(|m| {
                                                m.close(Some(&identity));
                                            });
                                            run_action(ctx, command.clone(), scope_of(&contents, size));
                                        }
                                    >
                                        {label}
                                    </button>
                                }
                                .into_any()
                            }
                        })
                        .collect_view()}
                </div>
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketview_core::{MenuIdentity, MenuKind, MenuSource};
    use pretty_assertions::assert_eq;

    fn view(visible: bool, position: Option<Point>) -> MenuView {
        MenuView {
            visible,
            position,
            anchor: Point::new(10.0, 20.0),
            identity: MenuIdentity {
                kind: MenuKind::List,
                key: None,
                source: MenuSource::Context,
            },
            contents: MenuContents::List,
        }
    }

    #[test]
    fn test_scope_of() {
        let object = MenuContents::Object { key: "a/b.txt".to_string() };
        assert_eq!(
            scope_of(&object, Some(3)),
            ActionScope::Object {
                key: "a/b.txt",
                size: Some(3)
            }
        );
        let prefix = MenuContents::Prefix { prefix: "a/".to_string() };
        assert_eq!(scope_of(&prefix, None), ActionScope::Prefix("a/"));
        assert_eq!(scope_of(&MenuContents::Selection { count: 2 }, None), ActionScope::List);
    }

    #[test]
    fn test_menu_style() {
        assert!(menu_style(&view(false, None)).contains("hidden"));
        assert_eq!(
            menu_style(&view(true, Some(Point::new(5.0, 6.0)))),
            "left: 5px; top: 6px;"
        );
        assert_eq!(menu_style(&view(true, None)), "left: 10px; top: 20px;");
    }
}
