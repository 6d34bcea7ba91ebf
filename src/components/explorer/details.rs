//! Details panel for the focused object.
//!
//! Shows metadata of the most recently selected object, plus an inline
//! preview for small images and text files. Preview fetches are keyed by
//! the object, so a stale response for a previous key is never shown.

use bucketview_core::ActionCommand;
use bucketview_core::keys;
use bucketview_core::models::{ObjectItem, Row};
use leptos::prelude::*;
use leptos_icons::Icon;

use super::commands::{ActionScope, run_action};
use crate::app::AppContext;
use crate::components::icons as ic;
use crate::utils::format::{format_modified, format_size};

stylance::import_crate_style!(css, "src/components/explorer/details.module.css");

/// Largest text object rendered inline.
const TEXT_PREVIEW_MAX_BYTES: u64 = 256 * 1024;
/// Largest image shown as a thumbnail.
const IMAGE_PREVIEW_MAX_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PreviewKind {
    Image,
    Text,
    None,
}

fn preview_kind(object: &ObjectItem) -> PreviewKind {
    match keys::extension(&object.key).as_deref() {
        Some("png" | "jpg" | "jpeg" | "gif" | "webp" | "svg" | "bmp") if object.size <= IMAGE_PREVIEW_MAX_BYTES => {
            PreviewKind::Image
        }
        Some("txt" | "md" | "csv" | "json" | "log" | "yaml" | "yml" | "toml" | "xml")
            if object.size <= TEXT_PREVIEW_MAX_BYTES =>
        {
            PreviewKind::Text
        }
        _ => PreviewKind::None,
    }
}

#[derive(Clone)]
enum Preview {
    Image(String),
    Text(String),
}

async fn fetch_preview(ctx: AppContext, bucket: String, object: ObjectItem) -> Option<Preview> {
    let kind = preview_kind(&object);
    if kind == PreviewKind::None {
        return None;
    }
    let client = ctx.session.client()?;
    let url = match client.download_url(&bucket, &object.key).await {
        Ok(url) => url,
        Err(e) => {
            log::warn!("preview url for {} failed: {e}", object.key);
            return None;
        }
    };
    match kind {
        PreviewKind::Image => Some(Preview::Image(url)),
        PreviewKind::Text => {
            let response = gloo_net::http::Request::get(&url).send().await.ok()?;
            if !response.ok() {
                return None;
            }
            response.text().await.ok().map(Preview::Text)
        }
        PreviewKind::None => None,
    }
}

#[component]
pub fn DetailsPanel() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let focused = Memo::new(move |_| {
        let key = ctx
            .explorer
            .selection
            .with(|s| s.last_selected().map(str::to_string))?;
        ctx.rows.with(|rows| {
            rows.iter()
                .filter_map(Row::as_object)
                .find(|o| o.key == key)
                .cloned()
        })
    });

    let preview = LocalResource::new(move || {
        let object = focused.get();
        let bucket = ctx.session.bucket();
        async move { fetch_preview(ctx, bucket?, object?).await }
    });

    move || {
        focused.get().map(|object| {
            let name = keys::display_name(&object.key, &ctx.session.prefix()).to_string();
            let (key, size) = (object.key.clone(), object.size);
            let (preview_key, download_key) = (key.clone(), key.clone());
            view! {
                <aside class=css::panel aria-label="Object details">
                    <header class=css::header>
                        <span class=css::icon><Icon icon=ic::for_key(&object.key) /></span>
                        <span class=css::filename title=key.clone()>{name.clone()}</span>
                        <button
                            class=css::closeButton
                            title="Close details"
                            on:click=move |_| ctx.explorer.selection.update(|s| s.clear())
                        >
                            <Icon icon=ic::CLOSE />
                        </button>
                    </header>

                    <div class=css::content>
                        <Suspense fallback=move || view! { <div class=css::loading>"Loading..."</div> }>
                            {move || preview.get().flatten().map(|p| match p {
                                Preview::Image(url) => view! {
                                    <img class=css::thumbnail src=url alt=name.clone() />
                                }.into_any(),
                                Preview::Text(text) => view! {
                                    <pre class=css::previewText>{text}</pre>
                                }.into_any(),
                            })}
                        </Suspense>

                        <dl class=css::meta>
                            <dt>"Key"</dt>
                            <dd class=css::mono>{key.clone()}</dd>
                            <dt>"Size"</dt>
                            <dd>{format_size(size)}</dd>
                            <dt>"Modified"</dt>
                            <dd>{format_modified(&object.last_modified)}</dd>
                            {object.etag.clone().map(|etag| view! {
                                <dt>"ETag"</dt>
                                <dd class=css::mono>{etag}</dd>
                            })}
                            {object.storage_class.clone().map(|class| view! {
                                <dt>"Storage class"</dt>
                                <dd>{class}</dd>
                            })}
                        </dl>
                    </div>

                    <footer class=css::actions>
                        <button
                            class=css::actionButton
                            on:click=move |_| run_action(
                                ctx,
                                ActionCommand::Preview { key: preview_key.clone() },
                                ActionScope::Object { key: &preview_key, size: Some(size) },
                            )
                        >
                            "Open"
                        </button>
                        <button
                            class=css::actionButton
                            on:click=move |_| run_action(
                                ctx,
                                ActionCommand::Download { key: download_key.clone() },
                                ActionScope::Object { key: &download_key, size: Some(size) },
                            )
                        >
                            <Icon icon=ic::DOWNLOAD />
                            " Download"
                        </button>
                    </footer>
                </aside>
            }
        })
    }
}
