//! Explorer header component.
//!
//! Contains the session pickers, navigation, search box, filter bar and
//! the action toolbar for the current selection.

use bucketview_core::actions::visible_actions;
use bucketview_core::models::{FilterState, TypeFilter};
use bucketview_core::{ActionCommand, MenuSource, UiAction};
use leptos::prelude::*;
use leptos_icons::Icon;

use super::commands::{ActionScope, run_action};
use super::context_menu::anchor_below;
use super::palette::open_palette;
use crate::app::AppContext;
use crate::components::icons as ic;
use crate::models::AppRoute;
use crate::utils::format::{format_date_input, format_size, parse_date_ms, parse_size, pluralize};

stylance::import_crate_style!(css, "src/components/explorer/header.module.css");

/// Explorer header with navigation, search and actions.
#[component]
pub fn Header() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let has_bucket = Signal::derive(move || ctx.session.route.with(|r| r.bucket().is_some()));

    // Last path segment, or the bucket name at its root
    let current_name = Memo::new(move |_| {
        ctx.session.route.with(|route| match route {
            AppRoute::Home => "Buckets".to_string(),
            AppRoute::Browse { bucket, prefix } => prefix
                .split('/')
                .rfind(|s| !s.is_empty())
                .unwrap_or(bucket)
                .to_string(),
        })
    });
    let current_icon = Memo::new(move |_| {
        ctx.session.route.with(|route| match route {
            AppRoute::Home => ic::HOME,
            AppRoute::Browse { prefix, .. } if prefix.is_empty() => ic::BUCKET,
            AppRoute::Browse { .. } => ic::FOLDER,
        })
    });

    view! {
        <header class=css::header>
            <div class=css::topRow>
                <NavButtons has_bucket=has_bucket />

                <div class=css::title>
                    <span class=css::titleIcon>
                        {move || view! { <Icon icon=current_icon.get() /> }}
                    </span>
                    <span class=css::titleLabel>{move || current_name.get()}</span>
                </div>

                <SessionPickers />

                <div class=css::actionButtons>
                    <Show when=move || has_bucket.get()>
                        <SearchBox />
                        <ListMenuButton />
                    </Show>
                    <button
                        class=css::actionButton
                        title="Command palette (Ctrl+K)"
                        on:click=move |_| open_palette(ctx)
                    >
                        <Icon icon=ic::COMMAND />
                    </button>
                </div>
            </div>

            <Show when=move || has_bucket.get()>
                <FilterBar />
                <SelectionBar />
            </Show>
        </header>
    }
}

// ============================================================================
// Navigation and session
// ============================================================================

/// Go up and refresh.
#[component]
fn NavButtons(has_bucket: Signal<bool>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    view! {
        <div class=css::navButtons>
            <button
                class=move || nav_button_class(!has_bucket.get())
                on:click=move |_| run_action(ctx, ActionCommand::GoUp, ActionScope::List)
                disabled=move || !has_bucket.get()
                title="Go to parent folder (Backspace)"
            >
                <Icon icon=ic::GO_UP />
            </button>
            <button
                class=move || nav_button_class(!has_bucket.get())
                on:click=move |_| ctx.reload()
                disabled=move || !has_bucket.get()
                title="Refresh"
            >
                <Icon icon=ic::REFRESH />
            </button>
        </div>
    }
}

fn nav_button_class(disabled: bool) -> String {
    if disabled {
        format!("{} {}", css::navButton, css::navButtonDisabled)
    } else {
        css::navButton.to_string()
    }
}

/// Profile and bucket selects.
#[component]
fn SessionPickers() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let session = ctx.session;

    let on_profile = move |ev: leptos::ev::Event| {
        let id = event_target_value(&ev);
        let profile = session
            .profiles
            .with_untracked(|profiles| profiles.iter().find(|p| p.id == id).cloned());
        session.select_profile(profile);
    };
    let on_bucket = move |ev: leptos::ev::Event| {
        let name = event_target_value(&ev);
        if name.is_empty() {
            AppRoute::Home.push();
        } else {
            AppRoute::browse(name, "").push();
        }
    };

    view! {
        <div class=css::pickers>
            <select class=css::select aria-label="Profile" on:change=on_profile>
                <option value="" selected=move || session.profile.with(Option::is_none)>
                    "Select profile"
                </option>
                {move || {
                    let current = session.profile.with(|p| p.as_ref().map(|p| p.id.clone()));
                    session.profiles.get()
                        .into_iter()
                        .map(|p| {
                            let selected = current.as_deref() == Some(p.id.as_str());
                            view! { <option value=p.id.clone() selected=selected>{p.name}</option> }
                        })
                        .collect_view()
                }}
            </select>
            <select class=css::select aria-label="Bucket" on:change=on_bucket>
                <option value="">"Select bucket"</option>
                {move || {
                    let current = session.route.with(|r| r.bucket().map(str::to_string));
                    session.buckets.get()
                        .into_iter()
                        .map(|b| {
                            let selected = current.as_deref() == Some(b.name.as_str());
                            view! { <option value=b.name.clone() selected=selected>{b.name.clone()}</option> }
                        })
                        .collect_view()
                }}
            </select>
        </div>
    }
}

// ============================================================================
// Search
// ============================================================================

/// Live filter over loaded rows; Enter runs an indexed search.
#[component]
fn SearchBox() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Enter" {
            ev.prevent_default();
            ctx.submit_search();
        }
    };

    view! {
        <div class=css::search>
            <span class=css::searchIcon><Icon icon=ic::SEARCH /></span>
            <input
                class=css::searchInput
                type="search"
                placeholder="Filter loaded objects (Enter searches the index)"
                aria-label="Search"
                prop:value=move || ctx.explorer.search.get()
                on:input=move |ev| ctx.set_search(event_target_value(&ev))
                on:keydown=on_keydown
            />
            {move || ctx.explorer.indexed_query.get().map(|query| view! {
                <span class=css::indexedBadge title="Showing indexed search results">
                    {format!("Index: {query}")}
                </span>
            })}
        </div>
    }
}

/// "More" button that opens the list menu below itself.
#[component]
fn ListMenuButton() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.stop_propagation();
        let anchor = anchor_below(&ev);
        ctx.explorer
            .menu
            .update(|m| m.open_list(MenuSource::Button, anchor));
    };

    view! {
        <button class=css::actionButton on:click=on_click title="More actions">
            <Icon icon=ic::MORE />
        </button>
    }
}

// ============================================================================
// Filters
// ============================================================================

fn type_filter_value(filter: TypeFilter) -> &'static str {
    match filter {
        TypeFilter::All => "all",
        TypeFilter::Folders => "folders",
        TypeFilter::Files => "files",
    }
}

fn parse_type_filter(value: &str) -> TypeFilter {
    match value {
        "folders" => TypeFilter::Folders,
        "files" => TypeFilter::Files,
        _ => TypeFilter::All,
    }
}

/// Type, extension and favorites filters; size and date bounds in
/// advanced mode.
#[component]
fn FilterBar() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let filter = ctx.explorer.filter;
    let is_advanced = ctx.explorer.is_advanced;

    let update = move |f: fn(&mut FilterState, String), ev: leptos::ev::Event| {
        let value = event_target_value(&ev);
        filter.update(|state| f(state, value));
    };

    view! {
        <div class=css::filterBar>
            <select
                class=css::select
                aria-label="Show"
                on:change=move |ev| update(|f, v| f.type_filter = parse_type_filter(&v), ev)
            >
                {[TypeFilter::All, TypeFilter::Folders, TypeFilter::Files]
                    .into_iter()
                    .map(|t| {
                        let label = match t {
                            TypeFilter::All => "All",
                            TypeFilter::Folders => "Folders",
                            TypeFilter::Files => "Files",
                        };
                        view! {
                            <option
                                value=type_filter_value(t)
                                selected=move || filter.with(|f| f.type_filter == t)
                            >
                                {label}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>

            <input
                class=css::filterInput
                type="text"
                placeholder="Extension"
                aria-label="Extension filter"
                prop:value=move || filter.with(|f| f.ext_filter.clone())
                on:change=move |ev| update(|f, v| f.ext_filter = bucketview_core::keys::normalize_extension(&v), ev)
            />

            <label class=css::toggle>
                <input
                    type="checkbox"
                    prop:checked=move || filter.with(|f| f.favorites_only)
                    on:change=move |ev| {
                        let checked = event_target_checked(&ev);
                        filter.update(|f| f.favorites_only = checked);
                    }
                />
                <Icon icon=ic::STAR />
                " Favorites only"
            </label>
            <label class=css::toggle>
                <input
                    type="checkbox"
                    prop:checked=move || filter.with(|f| f.favorites_first)
                    on:change=move |ev| {
                        let checked = event_target_checked(&ev);
                        filter.update(|f| f.favorites_first = checked);
                    }
                />
                " Favorites first"
            </label>

            <Show when=move || is_advanced.get()>
                <input
                    class=css::filterInput
                    type="text"
                    placeholder="Min size"
                    aria-label="Minimum size"
                    prop:value=move || filter.with(|f| f.min_size.map(format_size).unwrap_or_default())
                    on:change=move |ev| update(|f, v| f.min_size = parse_size(&v), ev)
                />
                <input
                    class=css::filterInput
                    type="text"
                    placeholder="Max size"
                    aria-label="Maximum size"
                    prop:value=move || filter.with(|f| f.max_size.map(format_size).unwrap_or_default())
                    on:change=move |ev| update(|f, v| f.max_size = parse_size(&v), ev)
                />
                <input
                    class=css::filterInput
                    type="date"
                    aria-label="Modified from"
                    prop:value=move || filter.with(|f| f.min_modified_ms.map(format_date_input).unwrap_or_default())
                    on:change=move |ev| update(|f, v| f.min_modified_ms = parse_date_ms(&v, false), ev)
                />
                <input
                    class=css::filterInput
                    type="date"
                    aria-label="Modified until"
                    prop:value=move || filter.with(|f| f.max_modified_ms.map(format_date_input).unwrap_or_default())
                    on:change=move |ev| update(|f, v| f.max_modified_ms = parse_date_ms(&v, true), ev)
                />
            </Show>

            <Show when=move || filter.with(FilterState::is_narrowing)>
                <button
                    class=css::clearButton
                    on:click=move |_| filter.update(|f| {
                        *f = FilterState {
                            sort: f.sort,
                            favorites_first: f.favorites_first,
                            ..FilterState::default()
                        };
                    })
                >
                    "Clear filters"
                </button>
            </Show>

            <label class=css::toggle title="Show advanced actions and filters">
                <input
                    type="checkbox"
                    prop:checked=move || is_advanced.get()
                    on:change=move |ev| is_advanced.set(event_target_checked(&ev))
                />
                " Advanced"
            </label>
        </div>
    }
}

// ============================================================================
// Selection toolbar
// ============================================================================

/// Bulk actions, shown while something is selected.
#[component]
fn SelectionBar() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let count = Memo::new(move |_| ctx.explorer.selection.with(|s| s.len()));

    let actions = move || {
        let is_advanced = ctx.explorer.is_advanced.get();
        ctx.with_actions(|catalog, actions| visible_actions(&catalog.selection_actions(actions), is_advanced))
    };

    view! {
        <Show when=move || { count.get() > 0 }>
            <div class=css::selectionBar role="toolbar" aria-label="Selection actions">
                <span class=css::selectionCount>
                    {move || format!("{} selected", pluralize(count.get(), "object"))}
                </span>
                {move || actions().into_iter().map(|a| action_button(ctx, a)).collect_view()}
            </div>
        </Show>
    }
}

fn action_button(ctx: AppContext, action: UiAction) -> impl IntoView {
    let class = if action.danger {
        format!("{} {}", css::toolbarButton, css::danger)
    } else {
        css::toolbarButton.to_string()
    };
    let label = action.label.clone();
    let title = action.disabled_reason.clone();
    let enabled = action.enabled;
    let command = action.command;
    view! {
        <button
            class=class
            disabled=!enabled
            title=title
            on:click=move |_| run_action(ctx, command.clone(), ActionScope::List)
        >
            {label}
        </button>
    }
}
