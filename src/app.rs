//! Root application module.
//!
//! Contains the main App component, the [`AppContext`] shared through Leptos
//! context, and the two signal bundles it is made of:
//! - [`SessionState`] - profiles, buckets, server capabilities, route
//! - [`ExplorerState`] - fetched pages and the interaction state machines
//!
//! The state machines themselves live in `bucketview_core`; this module only
//! wires them to signals and to the storage API.

use bucketview_core::actions::CommandPalette;
use bucketview_core::config::{MenuPolicy, ScanPolicy};
use bucketview_core::models::{
    BrowseContext, Capabilities, FavoriteSet, FilterState, ListingPage, Row, has_more_pages,
    object_keys, raw_total,
};
use bucketview_core::prefs::{RecentPaths, TreeExpansion, ViewPrefs};
use bucketview_core::scan::Ticket;
use bucketview_core::{
    ActionCatalog, ActionContext, AutoScanController, Clipboard, ContextMenu, DragState,
    RequestGuard, RowInputs, ScanDecision, ScanInputs, ScrollResetTracker, SearchQuery,
    SelectionModel, derive_rows,
};
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::AppRouter;
use crate::components::explorer::dispatch;
use crate::config::NOTICE_TIMEOUT_MS;
use crate::models::{AppRoute, Bucket, Meta, Profile, SessionPrefs};
use crate::utils::dom;
use crate::utils::fetch::{ApiClient, FetchError};
use crate::utils::storage;

// ============================================================================
// SessionState
// ============================================================================

/// Who is browsing what.
///
/// This struct is `Copy` because all fields are Leptos signals.
#[derive(Clone, Copy)]
pub struct SessionState {
    pub profiles: RwSignal<Vec<Profile>>,
    /// Active profile; every scoped request carries its id.
    pub profile: RwSignal<Option<Profile>>,
    pub buckets: RwSignal<Vec<Bucket>>,
    pub meta: RwSignal<Option<Meta>>,
    /// Bucket and prefix from the URL hash.
    pub route: RwSignal<AppRoute>,
    pub online: RwSignal<bool>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            profiles: RwSignal::new(Vec::new()),
            profile: RwSignal::new(None),
            buckets: RwSignal::new(Vec::new()),
            meta: RwSignal::new(None),
            route: RwSignal::new(AppRoute::current()),
            online: RwSignal::new(dom::is_online()),
        }
    }

    /// API client for the active profile.
    pub fn client(&self) -> Option<ApiClient> {
        self.profile
            .with_untracked(|p| p.as_ref().map(|p| ApiClient::new(&p.id)))
    }

    pub fn bucket(&self) -> Option<String> {
        self.route
            .with_untracked(|r| r.bucket().map(str::to_string))
    }

    pub fn prefix(&self) -> String {
        self.route.with_untracked(|r| r.prefix().to_string())
    }

    /// The (profile, bucket, prefix) being browsed. Tracked.
    pub fn context(&self) -> Option<BrowseContext> {
        let profile_id = self.profile.with(|p| p.as_ref().map(|p| p.id.clone()))?;
        self.route.with(|route| match route {
            AppRoute::Browse { bucket, prefix } => {
                Some(BrowseContext::new(profile_id, bucket.clone(), prefix))
            }
            AppRoute::Home => None,
        })
    }

    /// Session facts the action gates are computed from. Tracked.
    pub fn capabilities(&self) -> Capabilities {
        let provider = self.meta.with(|meta| {
            let meta = meta.as_ref()?;
            self.profile
                .with(|p| p.as_ref().and_then(|p| meta.provider_for(p)))
        });
        Capabilities {
            profile_selected: self.profile.with(Option::is_some),
            bucket_selected: self.route.with(|r| r.bucket().is_some()),
            online: self.online.get(),
            provider,
        }
    }

    /// Switch profile, remembering it for the next session.
    pub fn select_profile(&self, profile: Option<Profile>) {
        storage::save(&SessionPrefs {
            profile_id: profile.as_ref().map(|p| p.id.clone()),
        });
        self.profile.set(profile);
        self.buckets.set(Vec::new());
        AppRoute::Home.push();
        self.load_buckets();
    }

    /// Fetch server metadata and profiles, restoring the remembered profile.
    pub fn load(&self) {
        let session = *self;
        spawn_local(async move {
            match ApiClient::meta().await {
                Ok(meta) => session.meta.set(Some(meta)),
                Err(e) => log::warn!("failed to load server metadata: {e}"),
            }
            match ApiClient::profiles().await {
                Ok(profiles) => {
                    let remembered = storage::load::<SessionPrefs>().profile_id;
                    let active = remembered
                        .and_then(|id| profiles.iter().find(|p| p.id == id).cloned());
                    log::debug!("loaded {} profiles", profiles.len());
                    session.profiles.set(profiles);
                    if active.is_some() {
                        session.profile.set(active);
                        session.load_buckets();
                    }
                }
                Err(e) => log::error!("failed to load profiles: {e}"),
            }
        });
    }

    pub fn load_buckets(&self) {
        let Some(client) = self.client() else {
            return;
        };
        let buckets = self.buckets;
        spawn_local(async move {
            match client.buckets().await {
                Ok(list) => buckets.set(list),
                Err(e) => log::error!("failed to list buckets: {e}"),
            }
        });
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// ExplorerState
// ============================================================================

/// Object list state for the current browse context.
#[derive(Clone, Copy)]
pub struct ExplorerState {
    /// Pages fetched so far, in fetch order.
    pub pages: RwSignal<Vec<ListingPage>>,
    pub favorites: RwSignal<FavoriteSet>,
    pub filter: RwSignal<FilterState>,
    /// Raw search box text.
    pub search: RwSignal<String>,
    /// Query currently served by the search index; `None` lists the prefix.
    pub indexed_query: RwSignal<Option<String>>,
    /// Result of the last index check for the current context.
    pub indexed: RwSignal<Option<bool>>,
    pub is_advanced: RwSignal<bool>,
    /// Last listing failure; stops auto-scan until the next reload.
    pub error: RwSignal<Option<FetchError>>,
    pub notice: RwSignal<Option<String>>,
    pub selection: RwSignal<SelectionModel>,
    pub menu: RwSignal<ContextMenu>,
    pub drag: RwSignal<DragState>,
    pub clipboard: RwSignal<Clipboard>,
    pub palette: RwSignal<CommandPalette, LocalStorage>,
    pub scan: RwSignal<AutoScanController>,
    pub scroll_reset: RwSignal<ScrollResetTracker>,
    pub index_guard: RwSignal<RequestGuard>,
    /// Index of the last row inside the list viewport.
    pub last_visible: RwSignal<Option<usize>>,
    /// Bumped when the auto-scan cooldown elapses so the scan re-evaluates.
    pub scan_tick: RwSignal<u64>,
    pub recent: RwSignal<RecentPaths>,
    /// Expanded folders of the sidebar tree.
    pub tree: RwSignal<TreeExpansion>,
}

impl ExplorerState {
    pub fn new(prefs: &ViewPrefs) -> Self {
        Self {
            pages: RwSignal::new(Vec::new()),
            favorites: RwSignal::new(FavoriteSet::default()),
            filter: RwSignal::new(prefs.to_filter()),
            search: RwSignal::new(String::new()),
            indexed_query: RwSignal::new(None),
            indexed: RwSignal::new(None),
            is_advanced: RwSignal::new(prefs.is_advanced),
            error: RwSignal::new(None),
            notice: RwSignal::new(None),
            selection: RwSignal::new(SelectionModel::new()),
            menu: RwSignal::new(ContextMenu::new(MenuPolicy::default(), dom::viewport_size())),
            drag: RwSignal::new(DragState::default()),
            clipboard: RwSignal::new(Clipboard::default()),
            palette: RwSignal::new_local(CommandPalette::default()),
            scan: RwSignal::new(AutoScanController::new(ScanPolicy::default())),
            scroll_reset: RwSignal::new(ScrollResetTracker::default()),
            index_guard: RwSignal::new(RequestGuard::new()),
            last_visible: RwSignal::new(None),
            scan_tick: RwSignal::new(0),
            recent: RwSignal::new(storage::load()),
            tree: RwSignal::new(storage::load()),
        }
    }

    /// Show a transient message in the status bar.
    pub fn notify(&self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{message}");
        self.notice.set(Some(message.clone()));
        let notice = self.notice;
        Timeout::new(NOTICE_TIMEOUT_MS, move || {
            notice.update(|current| {
                if current.as_deref() == Some(message.as_str()) {
                    *current = None;
                }
            });
        })
        .forget();
    }

    pub fn save_view_prefs(&self) {
        let prefs = ViewPrefs::from_filter(
            &self.filter.get_untracked(),
            self.is_advanced.get_untracked(),
        );
        storage::save(&prefs);
    }

    fn next_token(&self) -> Option<String> {
        self.pages
            .with_untracked(|pages| pages.last().and_then(|p| p.next_token.clone()))
    }
}

// ============================================================================
// AppContext
// ============================================================================

/// Application-wide reactive context.
///
/// Provided at the root of the component tree and read with
/// `use_context::<AppContext>()`.
#[derive(Clone, Copy)]
pub struct AppContext {
    pub session: SessionState,
    pub explorer: ExplorerState,
    /// Rows derived from the fetched pages.
    pub rows: Memo<Vec<Row>>,
    /// Object keys of `rows` in display order.
    pub order: Memo<Vec<String>>,
}

impl AppContext {
    pub fn new() -> Self {
        let session = SessionState::new();
        let explorer = ExplorerState::new(&storage::load());

        let rows = Memo::new(move |_| {
            let prefix = session.route.with(|r| r.prefix().to_string());
            let search = explorer.search.with(|s| SearchQuery::parse(s));
            explorer.pages.with(|pages| {
                explorer.favorites.with(|favorites| {
                    explorer.filter.with(|filter| {
                        derive_rows(&RowInputs {
                            prefix: &prefix,
                            pages,
                            favorites,
                            filter,
                            search: &search,
                        })
                    })
                })
            })
        });
        let order = Memo::new(move |_| rows.with(|rows| object_keys(rows)));

        Self {
            session,
            explorer,
            rows,
            order,
        }
    }

    /// Action catalog dispatching into this context.
    pub fn catalog(&self) -> ActionCatalog {
        let ctx = *self;
        ActionCatalog::new(move |command| dispatch(ctx, command))
    }

    /// Run `f` with the catalog and the current action gates. Tracked.
    pub fn with_actions<R>(&self, f: impl FnOnce(&ActionCatalog, &ActionContext<'_>) -> R) -> R {
        let caps = self.session.capabilities();
        let prefix = self.session.route.with(|r| r.prefix().to_string());
        let selection_count = self.explorer.selection.with(SelectionModel::len);
        let loaded_count = self.order.with(Vec::len);
        let clipboard_ready = self.explorer.clipboard.with(|c| !c.is_empty());
        let catalog = self.catalog();
        self.explorer.favorites.with(|favorites| {
            let actions = ActionContext {
                caps: &caps,
                prefix: &prefix,
                selection_count,
                loaded_count,
                clipboard_ready,
                favorites,
            };
            f(&catalog, &actions)
        })
    }

    // ========================================================================
    // Listing
    // ========================================================================

    /// A new browse context became active: reset per-context state and
    /// start listing it.
    pub fn enter_context(&self, context: &BrowseContext) {
        let explorer = self.explorer;
        log::debug!("entering {}/{}", context.bucket, context.prefix);
        explorer.index_guard.update(RequestGuard::invalidate);
        explorer.indexed.set(None);
        explorer.indexed_query.set(None);
        explorer.search.set(String::new());
        explorer.selection.update(|s| {
            s.sync_context(context);
        });
        explorer.recent.update(|r| r.visit(context));
        explorer.recent.with_untracked(storage::save);
        self.load_favorites();
        self.reload();
    }

    /// The route left every bucket.
    pub fn leave_context(&self) {
        let explorer = self.explorer;
        explorer.scan.update(AutoScanController::reset_context);
        explorer.index_guard.update(RequestGuard::invalidate);
        explorer.pages.set(Vec::new());
        explorer.favorites.set(FavoriteSet::default());
        explorer.selection.update(SelectionModel::clear);
        explorer.error.set(None);
        explorer.menu.update(|m| {
            m.close(None);
        });
    }

    /// Drop fetched pages and list the current context from the start.
    pub fn reload(&self) {
        let explorer = self.explorer;
        explorer.scan.update(AutoScanController::reset_context);
        explorer.pages.set(Vec::new());
        explorer.error.set(None);
        explorer.last_visible.set(None);
        explorer.menu.update(|m| {
            m.close(None);
        });
        if self.session.bucket().is_none() {
            return;
        }
        if let Some(ticket) = explorer.scan.try_update(|s| s.begin_fetch(dom::now_ms())) {
            self.fetch_page(ticket, None);
        }
    }

    /// Fetch one page; the result is dropped unless `ticket` is still current.
    fn fetch_page(&self, ticket: Ticket, token: Option<String>) {
        let (Some(client), Some(bucket)) = (self.session.client(), self.session.bucket()) else {
            return;
        };
        let prefix = self.session.prefix();
        let query = self.explorer.indexed_query.get_untracked();
        let ctx = *self;
        spawn_local(async move {
            let result = match &query {
                Some(q) => client
                    .search_objects(&bucket, &prefix, q, token.as_deref())
                    .await
                    .map(ListingPage::from),
                None => client.list_objects(&bucket, &prefix, token.as_deref()).await,
            };
            let current = ctx
                .explorer
                .scan
                .try_update(|s| s.finish(ticket))
                .unwrap_or(false);
            if !current {
                log::debug!("discarding stale page for {bucket}/{prefix}");
                return;
            }
            match result {
                Ok(page) => ctx.explorer.pages.update(|pages| pages.push(page)),
                Err(e) => ctx.listing_failed(e),
            }
            ctx.schedule_scan_tick();
        });
    }

    fn listing_failed(&self, error: FetchError) {
        let explorer = self.explorer;
        if error.is_not_indexed() && explorer.indexed_query.get_untracked().is_some() {
            explorer.indexed.set(Some(false));
            explorer.indexed_query.set(None);
            explorer.notify("This bucket is not indexed; filtering loaded objects instead");
            self.reload();
            return;
        }
        log::error!("listing failed: {error}");
        explorer.error.set(Some(error));
    }

    /// Re-run the auto-scan once the cooldown has passed.
    fn schedule_scan_tick(&self) {
        let tick = self.explorer.scan_tick;
        let cooldown = self.explorer.scan.with_untracked(|s| s.policy().cooldown_ms);
        Timeout::new(cooldown.ceil() as u32, move || {
            tick.update(|t| *t = t.wrapping_add(1));
        })
        .forget();
    }

    /// Inputs of the auto-scan decision. Tracked.
    pub fn scan_inputs(&self) -> ScanInputs {
        let explorer = self.explorer;
        explorer.scan_tick.track();
        let (raw, has_more) = explorer
            .pages
            .with(|pages| (raw_total(pages), has_more_pages(pages)));
        ScanInputs {
            raw_total: raw,
            row_count: self.rows.with(Vec::len),
            last_visible: explorer.last_visible.get(),
            filtering: explorer.search.with(|s| !s.trim().is_empty())
                || explorer.filter.with(FilterState::is_narrowing),
            has_more: has_more && explorer.error.with(Option::is_none),
            is_advanced: explorer.is_advanced.get(),
            now_ms: dom::now_ms(),
        }
    }

    /// Fetch the next page if the auto-scan policy asks for it.
    pub fn auto_scan(&self) {
        let inputs = self.scan_inputs();
        let polled = self.explorer.scan.try_update(|s| s.poll(&inputs));
        if let Some((ScanDecision::Fetch, Some(ticket))) = polled {
            self.fetch_page(ticket, self.explorer.next_token());
        }
    }

    /// Explicit "load more"; ignores the auto-scan cap.
    pub fn load_more(&self) {
        let explorer = self.explorer;
        let has_more = explorer.pages.with_untracked(|pages| has_more_pages(pages));
        let ticket = explorer
            .scan
            .try_update(|s| s.load_more(has_more, dom::now_ms()))
            .flatten();
        if let Some(ticket) = ticket {
            explorer.error.set(None);
            self.fetch_page(ticket, explorer.next_token());
        }
    }

    fn load_favorites(&self) {
        let favorites = self.explorer.favorites;
        favorites.set(FavoriteSet::default());
        let (Some(client), Some(bucket)) = (self.session.client(), self.session.bucket()) else {
            return;
        };
        let route = self.session.route;
        spawn_local(async move {
            match client.favorites(&bucket).await {
                Ok(response) => {
                    if route.with_untracked(|r| r.bucket() == Some(bucket.as_str())) {
                        favorites.set(FavoriteSet::new(response.items));
                    }
                }
                Err(e) => log::warn!("failed to load favorites for {bucket}: {e}"),
            }
        });
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Search box edited. Loaded rows are filtered locally right away; an
    /// indexed result set for a different query is dropped.
    pub fn set_search(&self, text: String) {
        let explorer = self.explorer;
        explorer.index_guard.update(RequestGuard::invalidate);
        let stale = explorer
            .indexed_query
            .with_untracked(|q| q.as_deref().is_some_and(|q| q != text.trim()));
        explorer.search.set(text);
        if stale {
            explorer.indexed_query.set(None);
            self.reload();
        }
    }

    /// Search submitted: ask the server index when the bucket has one.
    pub fn submit_search(&self) {
        let explorer = self.explorer;
        let query = explorer.search.get_untracked().trim().to_string();
        if query.is_empty() || explorer.indexed_query.get_untracked().as_deref() == Some(&query) {
            return;
        }
        let (Some(client), Some(bucket)) = (self.session.client(), self.session.bucket()) else {
            return;
        };
        let prefix = self.session.prefix();
        let guard = explorer.index_guard;
        guard.update(RequestGuard::invalidate);
        let ticket = guard.with_untracked(RequestGuard::issue);
        let ctx = *self;
        spawn_local(async move {
            let summary = client.index_summary(&bucket, &prefix).await;
            if !guard.with_untracked(|g| g.is_current(ticket)) {
                log::debug!("discarding stale index check for {bucket}");
                return;
            }
            let indexed = match summary {
                Ok(summary) => summary.is_indexed(),
                Err(e) if e.is_not_indexed() => false,
                Err(e) => {
                    log::warn!("index check failed: {e}");
                    return;
                }
            };
            ctx.explorer.indexed.set(Some(indexed));
            if indexed {
                ctx.explorer.indexed_query.set(Some(query));
                ctx.reload();
            } else {
                ctx.explorer
                    .notify("This bucket is not indexed; filtering loaded objects instead");
            }
        });
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Root application component with error boundary.
///
/// This component:
/// - Creates and provides the global AppContext
/// - Loads profiles and server metadata
/// - Wraps the app in an ErrorBoundary for graceful error handling
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    provide_context(ctx);
    ctx.session.load();

    view! {
        <ErrorBoundary
            fallback=|errors| view! {
                <div style="
                    display: flex;
                    flex-direction: column;
                    align-items: center;
                    justify-content: center;
                    height: 100vh;
                    padding: 2rem;
                    background: #f6f7f9;
                    color: #1f2328;
                    font-family: system-ui, sans-serif;
                ">
                    <div style="max-width: 600px; text-align: center;">
                        <h1 style="color: #cf222e; margin-bottom: 1rem;">
                            "Something went wrong"
                        </h1>
                        <p style="color: #57606a; margin-bottom: 2rem;">
                            "The file browser hit an unexpected error. Reloading usually helps."
                        </p>
                        <details style="
                            text-align: left;
                            background: #ffffff;
                            padding: 1rem;
                            border: 1px solid #d0d7de;
                            border-radius: 4px;
                            margin-bottom: 1rem;
                        ">
                            <summary style="cursor: pointer; color: #57606a;">
                                "Error details"
                            </summary>
                            <ul style="
                                margin: 1rem 0 0 0;
                                padding-left: 1.5rem;
                                color: #cf222e;
                                font-size: 0.9rem;
                            ">
                                {move || errors.get()
                                    .into_iter()
                                    .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                                    .collect::<Vec<_>>()
                                }
                            </ul>
                        </details>
                        <button
                            on:click=move |_| {
                                if let Some(window) = web_sys::window() {
                                    let _ = window.location().reload();
                                }
                            }
                            style="
                                background: #0969da;
                                color: white;
                                border: none;
                                padding: 0.75rem 2rem;
                                border-radius: 4px;
                                cursor: pointer;
                                font-size: 1rem;
                            "
                        >
                            "Reload Page"
                        </button>
                    </div>
                </div>
            }
        >
            <AppRouter />
        </ErrorBoundary>
    }
}
