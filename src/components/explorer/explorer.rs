//! Main explorer component.
//!
//! ## Layout
//!
//! - Header: session pickers, search, filters and selection toolbar
//! - Body: bucket tree on the left, object list, details panel on the right
//! - Path bar and status bar at the bottom
//! - Context menu and command palette float above everything

use bucketview_core::ScanDecision;
use leptos::prelude::*;
use leptos_icons::Icon;
use wasm_bindgen::JsCast;

use super::commands::upload_files;
use super::context_menu::ContextMenuView;
use super::details::DetailsPanel;
use super::file_list::FileList;
use super::header::Header;
use super::listeners;
use super::palette::Palette;
use super::pathbar::PathBar;
use super::sidebar::Sidebar;
use crate::app::AppContext;
use crate::components::icons as ic;
use crate::models::AppRoute;
use crate::utils::format::pluralize;
use crate::utils::storage;

stylance::import_crate_style!(css, "src/components/explorer/explorer.module.css");

/// File explorer view component.
#[component]
pub fn Explorer() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    listeners::install(ctx);

    // Re-evaluated on every page arrival, scroll, filter change and cooldown tick
    Effect::new(move |_| ctx.auto_scan());

    // Persist preferences
    Effect::new(move |_| {
        ctx.explorer.filter.track();
        ctx.explorer.is_advanced.track();
        ctx.explorer.save_view_prefs();
    });
    Effect::new(move |_| ctx.explorer.tree.with(storage::save));

    let has_bucket = Signal::derive(move || ctx.session.route.with(|r| r.bucket().is_some()));
    let has_details = Signal::derive(move || ctx.explorer.selection.with(|s| s.last_selected().is_some()));

    view! {
        <div class=css::explorer>
            <Header />

            <div class=css::body>
                <Sidebar />
                <Show
                    when=move || has_bucket.get()
                    fallback=|| view! { <BucketPicker /> }
                >
                    <div class=move || {
                        if has_details.get() {
                            format!("{} {}", css::fileListPane, css::fileListPaneWithDetails)
                        } else {
                            css::fileListPane.to_string()
                        }
                    }>
                        <FileList />
                    </div>
                    <DetailsPanel />
                </Show>
            </div>

            <PathBar />
            <StatusBar />

            <UploadInput />
            <ContextMenuView />
            <Palette />
        </div>
    }
}

// ============================================================================
// Bucket picker
// ============================================================================

/// Shown while no bucket is selected.
#[component]
fn BucketPicker() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let session = ctx.session;

    view! {
        <div class=css::picker>
            {move || {
                if session.profile.with(Option::is_none) {
                    return view! {
                        <p class=css::emptyState>"Select a profile to list its buckets."</p>
                    }
                    .into_any();
                }
                let buckets = session.buckets.get();
                if buckets.is_empty() {
                    return view! { <p class=css::emptyState>"No buckets."</p> }.into_any();
                }
                view! {
                    <ul class=css::bucketGrid>
                        {buckets
                            .into_iter()
                            .map(|b| {
                                let target = AppRoute::browse(b.name.clone(), "");
                                view! {
                                    <li>
                                        <button class=css::bucketCard on:click=move |_| target.push()>
                                            <span class=css::bucketIcon><Icon icon=ic::BUCKET /></span>
                                            <span class=css::bucketName>{b.name}</span>
                                        </button>
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                }
                .into_any()
            }}
        </div>
    }
}

// ============================================================================
// Status bar
// ============================================================================

/// Counts, load state, notices and the manual "load more" control.
#[component]
fn StatusBar() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let explorer = ctx.explorer;

    let loading = Memo::new(move |_| explorer.scan.with(|s| s.is_in_flight()));
    let decision = Memo::new(move |_| {
        let inputs = ctx.scan_inputs();
        explorer.scan.with(|s| s.decide(&inputs))
    });
    let counts = move || {
        let rows = ctx.rows.with(Vec::len);
        let selected = explorer.selection.with(|s| s.len());
        let mut text = pluralize(rows, "item");
        if selected > 0 {
            text.push_str(&format!(", {selected} selected"));
        }
        if explorer.clipboard.with(|c| !c.is_empty()) {
            text.push_str(", clipboard ready");
        }
        text
    };

    view! {
        <footer class=css::statusBar role="status">
            <span class=css::statusCounts>{counts}</span>
            {move || loading.get().then(|| view! { <span class=css::statusLoading>"Loading..."</span> })}
            {move || (decision.get() == ScanDecision::LoadMore).then(|| view! {
                <button class=css::statusButton on:click=move |_| ctx.load_more()>
                    "Load more"
                </button>
            })}
            {move || explorer.error.get().map(|e| view! {
                <span class=css::statusError>{e.to_string()}</span>
                <button class=css::statusButton on:click=move |_| ctx.reload()>"Retry"</button>
            })}
            {move || (!ctx.session.online.get()).then(|| view! {
                <span class=css::statusError>"Offline"</span>
            })}
            {move || explorer.notice.get().map(|n| view! { <span class=css::statusNotice>{n}</span> })}
        </footer>
    }
}

// ============================================================================
// Upload input
// ============================================================================

/// Hidden file input clicked by the upload action.
#[component]
fn UploadInput() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let on_change = move |ev: leptos::ev::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        if let Some(files) = input.files() {
            upload_files(ctx, ctx.session.prefix(), files);
        }
        // Same file can be picked again
        input.set_value("");
    };

    view! {
        <input
            class=css::hidden
            type="file"
            multiple=true
            data-upload-input=""
            on:change=on_change
        />
    }
}
