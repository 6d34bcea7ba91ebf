//! Application router component.
//!
//! Uses native hashchange events instead of leptos_router for hash routing.
//!
//! # Architecture
//!
//! - **URL hash is the source of truth**: bucket and prefix come from `#/bucket/prefix`
//! - **Explorer never re-renders on navigation**: only its signals change
//! - **One browse context at a time**: every change of (profile, bucket, prefix)
//!   resets the per-context state before the first page is requested
//! - **hashchange events**: Browser back/forward buttons work automatically

use leptos::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::Closure;

use crate::app::AppContext;
use crate::components::explorer::Explorer;
#[cfg(target_arch = "wasm32")]
use crate::models::AppRoute;

/// Main application router.
///
/// - `#/` → no bucket selected (bucket picker)
/// - `#/media/` → root of bucket `media`
/// - `#/media/photos/2024/` → prefix `photos/2024/` of bucket `media`
#[component]
pub fn AppRouter() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    // Window listeners for the URL hash and connectivity (run once on mount)
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        let route = ctx.session.route;
        let on_hash = Closure::wrap(Box::new(move || {
            route.set(AppRoute::current());
        }) as Box<dyn Fn()>);

        let online = ctx.session.online;
        let on_online = Closure::wrap(Box::new(move || {
            online.set(crate::utils::dom::is_online());
        }) as Box<dyn Fn()>);

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("hashchange", on_hash.as_ref().unchecked_ref());
            for event in ["online", "offline"] {
                let _ = window
                    .add_event_listener_with_callback(event, on_online.as_ref().unchecked_ref());
            }
        }

        // Keep the closures alive for the lifetime of the app
        on_hash.forget();
        on_online.forget();
    }

    let context = Memo::new(move |_| ctx.session.context());

    // Enter each new browse context exactly once
    Effect::new(move |_| match context.get() {
        Some(browse) => ctx.enter_context(&browse),
        None => ctx.leave_context(),
    });

    view! { <Explorer /> }
}
