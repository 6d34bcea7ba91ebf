//! Windowed object list.
//!
//! Only the rows inside the viewport (plus [`OVERSCAN_ROWS`] on each side)
//! are mounted; a spacer keeps the scrollbar sized for the full row count.
//! The list reports its last visible row to the auto-scan and scrolls back
//! to the top whenever the view reset key changes.

use bucketview_core::config::DEFAULT_PAGE_STEP;
use bucketview_core::dnd::{drag_objects, drag_prefix};
use bucketview_core::menu::Point;
use bucketview_core::models::{ObjectItem, Row, SortDir, SortKey};
use bucketview_core::{ActionCommand, MenuSource, ViewResetKey};
use leptos::prelude::*;
use leptos_icons::Icon;

use super::commands::{ActionScope, run_action};
use super::context_menu::anchor_below;
use super::drag;
use super::shortcuts::mouse_modifiers;
use crate::app::AppContext;
use crate::components::icons as ic;
use crate::config::{OVERSCAN_ROWS, ROW_HEIGHT_PX};
use crate::models::AppRoute;
use crate::utils::dom;
use crate::utils::format::{format_modified, format_size};

stylance::import_crate_style!(css, "src/components/explorer/file_list.module.css");

/// Selector of the scrolling list viewport.
pub const LIST_SELECTOR: &str = "[data-file-list]";

// ============================================================================
// Geometry
// ============================================================================

/// Rows to mount for a scroll position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RowWindow {
    pub start: usize,
    pub end: usize,
    /// Last row at least partly inside the viewport.
    pub last_visible: Option<usize>,
}

pub fn visible_window(scroll_top: f64, viewport_height: f64, total: usize) -> RowWindow {
    if total == 0 {
        return RowWindow::default();
    }
    let first = (scroll_top.max(0.0) / ROW_HEIGHT_PX).floor() as usize;
    let past_last = ((scroll_top.max(0.0) + viewport_height.max(0.0)) / ROW_HEIGHT_PX).ceil() as usize;
    let last_visible = past_last.saturating_sub(1).min(total - 1);
    RowWindow {
        start: first.saturating_sub(OVERSCAN_ROWS).min(total),
        end: (past_last + OVERSCAN_ROWS).min(total),
        last_visible: Some(last_visible),
    }
}

/// New scroll offset that brings row `index` into view, if it is not.
pub fn scroll_target(index: usize, scroll_top: f64, viewport_height: f64) -> Option<f64> {
    let row_top = index as f64 * ROW_HEIGHT_PX;
    let row_bottom = row_top + ROW_HEIGHT_PX;
    if row_top < scroll_top {
        Some(row_top)
    } else if row_bottom > scroll_top + viewport_height {
        Some(row_bottom - viewport_height)
    } else {
        None
    }
}

fn list_element() -> Option<web_sys::Element> {
    dom::query(LIST_SELECTOR)
}

/// Rows per PageUp/PageDown for the current viewport height.
pub fn page_step() -> usize {
    list_element()
        .map(|el| (el.client_height() as f64 / ROW_HEIGHT_PX).floor() as usize)
        .filter(|step| *step > 0)
        .unwrap_or(DEFAULT_PAGE_STEP)
}

/// Scroll the row of `key` into view.
pub fn scroll_key_into_view(ctx: AppContext, key: &str) {
    let Some(index) = ctx
        .rows
        .with_untracked(|rows| rows.iter().position(|r| r.id() == key))
    else {
        return;
    };
    if let Some(el) = list_element()
        && let Some(top) = scroll_target(index, el.scroll_top() as f64, el.client_height() as f64)
    {
        el.set_scroll_top(top.round() as i32);
    }
}

fn sort_indicator(ctx: AppContext, key: SortKey) -> impl Fn() -> &'static str {
    move || {
        ctx.explorer.filter.with(|f| match (f.sort.key == key, f.sort.dir) {
            (false, _) => "",
            (true, SortDir::Asc) => " ▲",
            (true, SortDir::Desc) => " ▼",
        })
    }
}

// ============================================================================
// List
// ============================================================================

#[component]
pub fn FileList() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let viewport = NodeRef::<leptos::html::Div>::new();
    let scroll_top = RwSignal::new(0.0);
    let height = RwSignal::new(0.0);

    let measure = move || {
        if let Some(el) = viewport.get_untracked() {
            scroll_top.set(el.scroll_top() as f64);
            height.set(el.client_height() as f64);
        }
    };

    // Re-measure when mounted and whenever the rows change
    Effect::new(move |_| {
        ctx.rows.track();
        if viewport.get().is_some() {
            measure();
        }
    });

    // Scroll to the top when the browse context, search or filters change
    let reset_key = Memo::new(move |_| {
        let context = ctx.session.context()?;
        let search = ctx.explorer.search.get();
        Some(ctx.explorer.filter.with(|f| ViewResetKey::new(&context, &search, f)))
    });
    Effect::new(move |_| {
        let Some(key) = reset_key.get() else {
            return;
        };
        let reset = ctx
            .explorer
            .scroll_reset
            .try_update(|t| t.observe(key))
            .unwrap_or(false);
        if reset {
            if let Some(el) = viewport.get_untracked() {
                el.set_scroll_top(0);
            }
            scroll_top.set(0.0);
        }
    });

    let window = Memo::new(move |_| {
        let total = ctx.rows.with(Vec::len);
        visible_window(scroll_top.get(), height.get(), total)
    });
    Effect::new(move |_| {
        let last = window.get().last_visible;
        ctx.explorer.last_visible.set(last);
    });

    let mounted = move || {
        let RowWindow { start, end, .. } = window.get();
        ctx.rows.with(|rows| {
            rows.get(start..end)
                .unwrap_or_default()
                .iter()
                .cloned()
                .enumerate()
                .map(|(offset, row)| (start + offset, row))
                .collect::<Vec<_>>()
        })
    };

    let on_contextmenu = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        let anchor = Point::new(ev.client_x() as f64, ev.client_y() as f64);
        ctx.explorer
            .menu
            .update(|m| m.open_list(MenuSource::Context, anchor));
    };

    let all_checked = Signal::derive(move || {
        ctx.order.with(|order| {
            ctx.explorer
                .selection
                .with(|s| s.all_loaded_selected(order))
        })
    });
    let on_check_all = move |ev: leptos::ev::Event| {
        let checked = event_target_checked(&ev);
        ctx.order.with_untracked(|order| {
            ctx.explorer
                .selection
                .update(|s| s.toggle_select_all(order, checked))
        });
    };
    let sort_by = move |key: SortKey| {
        ctx.explorer.filter.update(|f| f.sort = f.sort.toggle(key));
    };

    view! {
        <div class=css::list role="grid" aria-label="Objects">
            <div class=css::listHeader role="row">
                <span class=css::headerCheck>
                    <input
                        type="checkbox"
                        aria-label="Select all loaded objects"
                        prop:checked=move || all_checked.get()
                        on:change=on_check_all
                    />
                </span>
                <span class=css::headerIcon></span>
                <button class=css::headerName on:click=move |_| sort_by(SortKey::Name)>
                    "Name"{sort_indicator(ctx, SortKey::Name)}
                </button>
                <button class=css::headerDate on:click=move |_| sort_by(SortKey::Time)>
                    "Modified"{sort_indicator(ctx, SortKey::Time)}
                </button>
                <button class=css::headerSize on:click=move |_| sort_by(SortKey::Size)>
                    "Size"{sort_indicator(ctx, SortKey::Size)}
                </button>
                <span class=css::headerMore></span>
            </div>
            <div
                class=css::viewport
                node_ref=viewport
                data-file-list=""
                tabindex="0"
                on:scroll=move |_| measure()
                on:contextmenu=on_contextmenu
                on:dragover=move |ev| drag::over(ctx, &ev, &ctx.session.prefix())
                on:dragleave=move |_| drag::leave(ctx, &ctx.session.prefix())
                on:drop=move |ev| drag::drop_on(ctx, &ev, &ctx.session.prefix())
            >
                <div
                    class=css::spacer
                    style:height=move || format!("{}px", ctx.rows.with(Vec::len) as f64 * ROW_HEIGHT_PX)
                >
                    <For
                        each=mounted
                        key=|(index, row)| (*index, row.id().to_string())
                        children=move |(index, row)| view! { <RowView index=index row=row /> }
                    />
                </div>
            </div>
        </div>
    }
}

// ============================================================================
// Rows
// ============================================================================

#[component]
fn RowView(index: usize, row: Row) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let top = format!("{}px", index as f64 * ROW_HEIGHT_PX);
    let name = row.display_name(&ctx.session.prefix()).to_string();
    match row {
        Row::Prefix { prefix } => view! { <PrefixRow top=top prefix=prefix name=name /> }.into_any(),
        Row::Object { object } => view! { <ObjectRow top=top object=object name=name /> }.into_any(),
    }
}

#[component]
fn PrefixRow(top: String, prefix: String, name: String) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let bucket = ctx.session.bucket().unwrap_or_default();

    let is_hovered = {
        let prefix = prefix.clone();
        Signal::derive(move || ctx.explorer.drag.with(|d| d.is_hovered(&prefix)))
    };
    let item_class = move || {
        if is_hovered.get() {
            format!("{} {} {}", css::listItem, css::listItemPrefix, css::dropTarget)
        } else {
            format!("{} {}", css::listItem, css::listItemPrefix)
        }
    };

    let on_click = {
        let (bucket, prefix) = (bucket.clone(), prefix.clone());
        move |_: leptos::ev::MouseEvent| AppRoute::browse(bucket.clone(), &prefix).push()
    };
    let on_contextmenu = {
        let prefix = prefix.clone();
        move |ev: leptos::ev::MouseEvent| {
            ev.prevent_default();
            ev.stop_propagation();
            let anchor = Point::new(ev.client_x() as f64, ev.client_y() as f64);
            ctx.explorer
                .menu
                .update(|m| m.open_prefix(&prefix, MenuSource::Context, anchor));
        }
    };
    let on_more = {
        let prefix = prefix.clone();
        move |ev: leptos::ev::MouseEvent| {
            ev.stop_propagation();
            let anchor = anchor_below(&ev);
            ctx.explorer
                .menu
                .update(|m| m.open_prefix(&prefix, MenuSource::Button, anchor));
        }
    };
    let on_dragstart = {
        let (bucket, prefix) = (bucket.clone(), prefix.clone());
        move |ev: leptos::ev::DragEvent| drag::start(&ev, &drag_prefix(&bucket, &prefix))
    };
    let (over_prefix, leave_prefix, drop_prefix) = (prefix.clone(), prefix.clone(), prefix.clone());

    view! {
        <div
            class=item_class
            style:top=top
            role="row"
            draggable="true"
            aria-label=format!("Folder: {name}")
            on:click=on_click
            on:contextmenu=on_contextmenu
            on:dragstart=on_dragstart
            on:dragend=move |_| drag::end(ctx)
            on:dragover=move |ev| drag::over(ctx, &ev, &over_prefix)
            on:dragleave=move |_| drag::leave(ctx, &leave_prefix)
            on:drop=move |ev| drag::drop_on(ctx, &ev, &drop_prefix)
        >
            <span class=css::check></span>
            <span class=css::icon aria-hidden="true"><Icon icon=ic::FOLDER /></span>
            <span class=format!("{} {}", css::name, css::nameDir)>{name.clone()}"/"</span>
            <span class=css::itemDate></span>
            <span class=css::size></span>
            <button class=css::more on:click=on_more title="Folder actions">
                <Icon icon=ic::MORE />
            </button>
        </div>
    }
}

#[component]
fn ObjectRow(top: String, object: ObjectItem, name: String) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let key = object.key.clone();
    let size = object.size;
    let bucket = ctx.session.bucket().unwrap_or_default();

    let is_selected = {
        let key = key.clone();
        Signal::derive(move || ctx.explorer.selection.with(|s| s.is_selected(&key)))
    };
    let is_favorite = {
        let key = key.clone();
        Signal::derive(move || ctx.explorer.favorites.with(|f| f.contains(&key)))
    };
    let item_class = move || {
        if is_selected.get() {
            format!("{} {}", css::listItem, css::selected)
        } else {
            css::listItem.to_string()
        }
    };

    let on_click = {
        let key = key.clone();
        move |ev: leptos::ev::MouseEvent| {
            let modifiers = mouse_modifiers(&ev);
            ctx.order.with_untracked(|order| {
                ctx.explorer
                    .selection
                    .update(|s| s.click(order, &key, modifiers))
            });
        }
    };
    let on_toggle = {
        let key = key.clone();
        move |ev: leptos::ev::MouseEvent| {
            ev.stop_propagation();
            ctx.explorer.selection.update(|s| s.toggle(&key));
        }
    };
    let on_dblclick = {
        let key = key.clone();
        move |_: leptos::ev::MouseEvent| {
            run_action(
                ctx,
                ActionCommand::Preview { key: key.clone() },
                ActionScope::Object {
                    key: &key,
                    size: Some(size),
                },
            )
        }
    };
    let on_contextmenu = {
        let key = key.clone();
        move |ev: leptos::ev::MouseEvent| {
            ev.prevent_default();
            ev.stop_propagation();
            let anchor = Point::new(ev.client_x() as f64, ev.client_y() as f64);
            ctx.explorer.selection.with_untracked(|selection| {
                ctx.explorer
                    .menu
                    .update(|m| m.open_object(&key, MenuSource::Context, anchor, selection))
            });
        }
    };
    let on_more = {
        let key = key.clone();
        move |ev: leptos::ev::MouseEvent| {
            ev.stop_propagation();
            let anchor = anchor_below(&ev);
            ctx.explorer.selection.with_untracked(|selection| {
                ctx.explorer
                    .menu
                    .update(|m| m.open_object(&key, MenuSource::Button, anchor, selection))
            });
        }
    };
    let on_dragstart = {
        let key = key.clone();
        move |ev: leptos::ev::DragEvent| {
            let payload = ctx.order.with_untracked(|order| {
                ctx.explorer
                    .selection
                    .try_update(|s| drag_objects(s, order, &bucket, &key))
            });
            if let Some(payload) = payload {
                drag::start(&ev, &payload);
            }
        }
    };

    let name_class = if name.starts_with('.') {
        format!("{} {}", css::name, css::nameHidden)
    } else {
        format!("{} {}", css::name, css::nameFile)
    };

    view! {
        <div
            class=item_class
            style:top=top
            role="row"
            draggable="true"
            aria-label=format!("File: {name}")
            aria-selected=move || is_selected.get().to_string()
            on:click=on_click
            on:dblclick=on_dblclick
            on:contextmenu=on_contextmenu
            on:dragstart=on_dragstart
            on:dragend=move |_| drag::end(ctx)
        >
            <span class=css::check>
                <input
                    type="checkbox"
                    aria-label="Select"
                    prop:checked=move || is_selected.get()
                    on:click=on_toggle
                />
            </span>
            <span class=css::icon aria-hidden="true"><Icon icon=ic::for_key(&key) /></span>
            <span class=name_class title=key.clone()>
                {name.clone()}
                {move || is_favorite.get().then(|| view! {
                    <span class=css::favorite><Icon icon=ic::STAR /></span>
                })}
            </span>
            <span class=css::itemDate>{format_modified(&object.last_modified)}</span>
            <span class=css::size>{format_size(size)}</span>
            <button class=css::more on:click=on_more title="Object actions">
                <Icon icon=ic::MORE />
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_window_empty() {
        assert_eq!(visible_window(0.0, 600.0, 0), RowWindow::default());
    }

    #[test]
    fn test_visible_window_top() {
        // 320px viewport shows rows 0..=9
        let window = visible_window(0.0, 320.0, 1_000);
        assert_eq!(window.start, 0);
        assert_eq!(window.last_visible, Some(9));
        assert_eq!(window.end, 10 + OVERSCAN_ROWS);
    }

    #[test]
    fn test_visible_window_scrolled() {
        let window = visible_window(ROW_HEIGHT_PX * 100.0, 320.0, 1_000);
        assert_eq!(window.start, 100 - OVERSCAN_ROWS);
        assert_eq!(window.last_visible, Some(109));
    }

    #[test]
    fn test_visible_window_short_list() {
        let window = visible_window(0.0, 600.0, 3);
        assert_eq!(window.start, 0);
        assert_eq!(window.end, 3);
        assert_eq!(window.last_visible, Some(2));
    }

    #[test]
    fn test_scroll_target() {
        let h = ROW_HEIGHT_PX;
        // Already visible
        assert_eq!(scroll_target(2, 0.0, h * 10.0), None);
        // Above the viewport
        assert_eq!(scroll_target(1, h * 5.0, h * 10.0), Some(h));
        // Below the viewport: align the row bottom with the viewport bottom
        assert_eq!(scroll_target(12, 0.0, h * 10.0), Some(h * 3.0));
    }
}
