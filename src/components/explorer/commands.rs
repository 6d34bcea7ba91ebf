//! Action dispatcher.
//!
//! Every [`ActionCommand`] produced by the action catalog ends up in
//! [`dispatch`], whatever surface triggered it (toolbar, context menu,
//! command palette, keyboard shortcut). Transfers are validated before any
//! request is sent, and moves and deletes need a typed confirmation.

use bucketview_core::config::transfer::{DELETE_CONFIRM_PHRASE, MOVE_CONFIRM_PHRASE};
use bucketview_core::keys::{self, display_name, folder_name, normalize_prefix, parent_prefix};
use bucketview_core::models::{
    FavoriteObject, IndexTarget, KeysTarget, ObjectItem, PrefixTarget, PrefixTransfer,
    TransferItem, TransferMode, TransferRequest,
};
use bucketview_core::{ActionCommand, Clipboard, MenuEntry, SelectionModel, UiAction, ValidationError};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::app::AppContext;
use crate::models::AppRoute;
use crate::utils::dom;
use crate::utils::format::pluralize;

/// Selector of the hidden file input used by the upload action.
pub const UPLOAD_INPUT_SELECTOR: &str = "[data-upload-input]";

pub fn dispatch(ctx: AppContext, command: ActionCommand) {
    log::debug!("dispatch {command:?}");
    let explorer = ctx.explorer;
    let Some(bucket) = ctx.session.bucket() else {
        match command {
            ActionCommand::NewBucket => new_bucket(ctx),
            ActionCommand::ToggleAdvanced => explorer.is_advanced.update(|v| *v = !*v),
            other => log::warn!("{other:?} needs a bucket"),
        }
        return;
    };
    let prefix = ctx.session.prefix();

    match command {
        // Object scope
        ActionCommand::Preview { key } | ActionCommand::Download { key } => {
            open_presigned(ctx, bucket, key)
        }
        ActionCommand::CopyKey { key } => copy_text(ctx, &key),
        ActionCommand::CopyObject { key } => {
            fill_clipboard(ctx, &bucket, &prefix, vec![key], TransferMode::Copy)
        }
        ActionCommand::CutObject { key } => {
            fill_clipboard(ctx, &bucket, &prefix, vec![key], TransferMode::Move)
        }
        ActionCommand::Rename { key } => rename(ctx, &bucket, &prefix, key),
        ActionCommand::CopyObjectTo { key } => {
            transfer_keys_to(ctx, &bucket, &prefix, vec![key], TransferMode::Copy)
        }
        ActionCommand::MoveObjectTo { key } => {
            transfer_keys_to(ctx, &bucket, &prefix, vec![key], TransferMode::Move)
        }
        ActionCommand::ToggleFavorite { key } => toggle_favorite(ctx, bucket, key),
        ActionCommand::Details { key } => explorer.selection.update(|s| s.select_single(&key)),
        ActionCommand::DeleteObject { key } => delete_keys(ctx, bucket, vec![key]),

        // Prefix scope
        ActionCommand::OpenPrefix { prefix } => AppRoute::browse(bucket, &prefix).push(),
        ActionCommand::CopyPrefixPath { prefix } => copy_text(ctx, &prefix),
        ActionCommand::ZipPrefix { prefix } => submit(
            ctx,
            TransferRequest::ZipPrefix(PrefixTarget { bucket, prefix }),
            || {},
        ),
        ActionCommand::CopyPrefixTo { prefix: src } => {
            transfer_prefix_to(ctx, &bucket, &prefix, src, TransferMode::Copy)
        }
        ActionCommand::MovePrefixTo { prefix: src } => {
            transfer_prefix_to(ctx, &bucket, &prefix, src, TransferMode::Move)
        }
        ActionCommand::IndexPrefix { prefix } => submit(
            ctx,
            TransferRequest::IndexObjects(IndexTarget {
                bucket,
                prefix,
                full_reindex: false,
            }),
            || {},
        ),
        ActionCommand::DeletePrefix { prefix } => submit(
            ctx,
            TransferRequest::DeletePrefix(PrefixTarget { bucket, prefix }),
            move || ctx.reload(),
        ),

        // Selection scope
        ActionCommand::CopySelection => {
            fill_clipboard(ctx, &bucket, &prefix, selected_keys(ctx), TransferMode::Copy)
        }
        ActionCommand::CutSelection => {
            fill_clipboard(ctx, &bucket, &prefix, selected_keys(ctx), TransferMode::Move)
        }
        ActionCommand::ZipSelection => submit(
            ctx,
            TransferRequest::ZipObjects(KeysTarget {
                bucket,
                keys: selected_keys(ctx),
            }),
            || {},
        ),
        ActionCommand::CopySelectionTo => {
            transfer_keys_to(ctx, &bucket, &prefix, selected_keys(ctx), TransferMode::Copy)
        }
        ActionCommand::MoveSelectionTo => {
            transfer_keys_to(ctx, &bucket, &prefix, selected_keys(ctx), TransferMode::Move)
        }
        ActionCommand::ClearSelection => explorer.selection.update(SelectionModel::clear),
        ActionCommand::DeleteSelection => delete_keys(ctx, bucket, selected_keys(ctx)),

        // Global scope
        ActionCommand::Refresh => {
            ctx.reload();
            ctx.session.load_buckets();
        }
        ActionCommand::GoUp => AppRoute::browse(bucket, &parent_prefix(&prefix)).push(),
        ActionCommand::NewFolder => new_folder(ctx, bucket, &prefix),
        ActionCommand::Upload => {
            if !dom::click_element(UPLOAD_INPUT_SELECTOR) {
                log::warn!("upload input not mounted");
            }
        }
        ActionCommand::Paste => paste(ctx, &bucket, &prefix),
        ActionCommand::SelectAll => ctx
            .order
            .with_untracked(|order| explorer.selection.update(|s| s.select_all_loaded(order))),
        ActionCommand::ToggleFavoritesOnly => explorer
            .filter
            .update(|f| f.favorites_only = !f.favorites_only),
        ActionCommand::ToggleAdvanced => explorer.is_advanced.update(|v| *v = !*v),
        ActionCommand::IndexBucket => submit(
            ctx,
            TransferRequest::IndexObjects(IndexTarget {
                bucket,
                prefix: String::new(),
                full_reindex: true,
            }),
            || {},
        ),
        ActionCommand::NewBucket => new_bucket(ctx),
    }
}

/// Catalog lists searched for an action, besides the selection and
/// global ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionScope<'a> {
    List,
    Object { key: &'a str, size: Option<u64> },
    Prefix(&'a str),
}

/// Run the catalog action carrying `command`, so its gate applies.
pub fn run_action(ctx: AppContext, command: ActionCommand, scope: ActionScope<'_>) {
    let action = untrack(|| {
        ctx.with_actions(|catalog, actions| {
            let mut candidates: Vec<UiAction> = catalog.selection_actions(actions);
            candidates.extend(catalog.global_actions(actions));
            let entries = match scope {
                ActionScope::List => Vec::new(),
                ActionScope::Object { key, size } => catalog.object_actions(actions, key, size),
                ActionScope::Prefix(prefix) => catalog.prefix_actions(actions, prefix),
            };
            candidates.extend(entries.iter().filter_map(MenuEntry::as_action).cloned());
            candidates.into_iter().find(|a| a.command == command)
        })
    });
    match action {
        Some(action) => {
            if !action.run() {
                let reason = action
                    .disabled_reason
                    .unwrap_or_else(|| format!("{} is not available", action.label));
                ctx.explorer.notify(reason);
            }
        }
        None => log::debug!("no action for {command:?}"),
    }
}

// ============================================================================
// Jobs
// ============================================================================

/// Validate, confirm if required, then submit a transfer job.
///
/// `on_accepted` runs once the server accepted the job.
pub fn submit(ctx: AppContext, request: TransferRequest, on_accepted: impl FnOnce() + 'static) {
    if let Err(e) = request.validate() {
        ctx.explorer.notify(e.to_string());
        return;
    }
    if request.needs_confirmation() && !dom::confirm_typed(&describe(&request), confirm_phrase(&request)) {
        ctx.explorer.notify("Cancelled");
        return;
    }
    submit_confirmed(ctx, request, on_accepted);
}

fn submit_confirmed(ctx: AppContext, request: TransferRequest, on_accepted: impl FnOnce() + 'static) {
    let Some(client) = ctx.session.client() else {
        return;
    };
    let explorer = ctx.explorer;
    spawn_local(async move {
        match client.create_job(&request).await {
            Ok(job_id) => {
                log::info!("submitted {} job {job_id}", request.job_type());
                explorer.notify(format!("Queued: {}", describe(&request)));
                on_accepted();
            }
            Err(e) => explorer.notify(format!("Could not start job: {e}")),
        }
    });
}

fn confirm_phrase(request: &TransferRequest) -> &'static str {
    match request {
        TransferRequest::DeleteObjects(_) | TransferRequest::DeletePrefix(_) => DELETE_CONFIRM_PHRASE,
        _ => MOVE_CONFIRM_PHRASE,
    }
}

/// One-line description of a job for confirmations and notices.
pub fn describe(request: &TransferRequest) -> String {
    match request {
        TransferRequest::CopyObject(t) => format!("Copy {} to {}", t.src_key, t.dst_key),
        TransferRequest::MoveObject(t) => format!("Move {} to {}", t.src_key, t.dst_key),
        TransferRequest::CopyBatch(b) => format!("Copy {}", pluralize(b.items.len(), "object")),
        TransferRequest::MoveBatch(b) => format!("Move {}", pluralize(b.items.len(), "object")),
        TransferRequest::CopyPrefix(p) => format!("Copy folder {} to {}", p.src_prefix, p.dst_prefix),
        TransferRequest::MovePrefix(p) => format!("Move folder {} to {}", p.src_prefix, p.dst_prefix),
        TransferRequest::DeletePrefix(p) => {
            format!("Delete folder {} and everything in it", p.prefix)
        }
        TransferRequest::DeleteObjects(k) => format!("Delete {}", pluralize(k.keys.len(), "object")),
        TransferRequest::ZipPrefix(p) => format!("Zip folder {}", display_prefix(&p.prefix)),
        TransferRequest::ZipObjects(k) => format!("Zip {}", pluralize(k.keys.len(), "object")),
        TransferRequest::IndexObjects(i) => format!("Index {}/{}", i.bucket, i.prefix),
    }
}

fn display_prefix(prefix: &str) -> &str {
    if prefix.is_empty() { "/" } else { prefix }
}

// ============================================================================
// Transfers
// ============================================================================

/// Pair each key with its destination under `dst_prefix`, keeping the name
/// relative to `src_prefix`. Keys already in place are skipped.
pub fn destination_pairs(keys: &[String], src_prefix: &str, dst_prefix: &str) -> Vec<TransferItem> {
    let dst_prefix = normalize_prefix(dst_prefix);
    keys.iter()
        .map(|key| TransferItem {
            src_key: key.clone(),
            dst_key: format!("{dst_prefix}{}", display_name(key, src_prefix)),
        })
        .filter(|pair| pair.src_key != pair.dst_key)
        .collect()
}

fn transfer_keys_to(
    ctx: AppContext,
    bucket: &str,
    prefix: &str,
    keys: Vec<String>,
    mode: TransferMode,
) {
    let verb = if mode.is_move() { "Move" } else { "Copy" };
    let question = format!("{verb} {} to folder:", pluralize(keys.len(), "object"));
    let Some(dst_prefix) = dom::prompt(&question, prefix) else {
        return;
    };
    let pairs = destination_pairs(&keys, prefix, dst_prefix.trim());
    if pairs.is_empty() {
        ctx.explorer.notify("Already there");
        return;
    }
    match TransferRequest::for_pairs(mode, bucket, bucket, pairs) {
        Ok(request) => submit(ctx, request, move || ctx.reload()),
        Err(e) => ctx.explorer.notify(e.to_string()),
    }
}

fn transfer_prefix_to(ctx: AppContext, bucket: &str, prefix: &str, src: String, mode: TransferMode) {
    let verb = if mode.is_move() { "Move" } else { "Copy" };
    let question = format!("{verb} folder {} into:", folder_name(&src));
    let Some(parent) = dom::prompt(&question, prefix) else {
        return;
    };
    let dst_prefix = format!("{}{}/", normalize_prefix(parent.trim()), folder_name(&src));
    let payload = PrefixTransfer {
        src_bucket: bucket.to_string(),
        src_prefix: src,
        dst_bucket: bucket.to_string(),
        dst_prefix,
    };
    match TransferRequest::for_prefix(mode, payload) {
        Ok(request) => submit(ctx, request, move || ctx.reload()),
        Err(e) => ctx.explorer.notify(e.to_string()),
    }
}

fn rename(ctx: AppContext, bucket: &str, prefix: &str, key: String) {
    let current = display_name(&key, prefix).to_string();
    let Some(name) = dom::prompt("Rename to:", &current) else {
        return;
    };
    let name = name.trim();
    if name == current {
        return;
    }
    let pairs = vec![TransferItem {
        src_key: key.clone(),
        dst_key: format!("{prefix}{name}"),
    }];
    // The typed name is the confirmation.
    match TransferRequest::for_pairs(TransferMode::Move, bucket, bucket, pairs) {
        Ok(request) => submit_confirmed(ctx, request, move || ctx.reload()),
        Err(e) => ctx.explorer.notify(e.to_string()),
    }
}

fn delete_keys(ctx: AppContext, bucket: String, keys: Vec<String>) {
    let request = TransferRequest::DeleteObjects(KeysTarget { bucket, keys });
    submit(ctx, request, move || {
        ctx.explorer.selection.update(SelectionModel::clear);
        ctx.reload();
    });
}

// ============================================================================
// Clipboard
// ============================================================================

fn selected_keys(ctx: AppContext) -> Vec<String> {
    ctx.order.with_untracked(|order| {
        ctx.explorer
            .selection
            .with_untracked(|s| s.selected_in_order(order))
    })
}

fn fill_clipboard(ctx: AppContext, bucket: &str, prefix: &str, keys: Vec<String>, mode: TransferMode) {
    let count = keys.len();
    let stored = ctx
        .explorer
        .clipboard
        .try_update(|c| match mode {
            TransferMode::Copy => c.copy(bucket, prefix, keys),
            TransferMode::Move => c.cut(bucket, prefix, keys),
        })
        .unwrap_or(false);
    if stored {
        let verb = if mode.is_move() { "Cut" } else { "Copied" };
        ctx.explorer.notify(format!("{verb} {}", pluralize(count, "object")));
    }
}

fn paste(ctx: AppContext, bucket: &str, prefix: &str) {
    let clipboard = ctx.explorer.clipboard;
    match clipboard.with_untracked(|c| c.plan_paste(bucket, prefix)) {
        Ok(None) => ctx.explorer.notify("Nothing to paste here"),
        Ok(Some(plan)) => submit(ctx, plan.request, move || {
            clipboard.update(Clipboard::complete_paste);
            ctx.reload();
        }),
        Err(e) => ctx.explorer.notify(e.to_string()),
    }
}

fn copy_text(ctx: AppContext, text: &str) {
    match dom::copy_text(text) {
        Ok(()) => ctx.explorer.notify(format!("Copied {text}")),
        Err(e) => log::warn!("clipboard write failed: {e:?}"),
    }
}

// ============================================================================
// Objects and Buckets
// ============================================================================

fn open_presigned(ctx: AppContext, bucket: String, key: String) {
    let Some(client) = ctx.session.client() else {
        return;
    };
    spawn_local(async move {
        match client.download_url(&bucket, &key).await {
            Ok(url) => dom::open_url(&url),
            Err(e) => ctx.explorer.notify(format!("Could not open {key}: {e}")),
        }
    });
}

/// Key of a new folder marker named `name` under `prefix`.
pub fn folder_key(prefix: &str, name: &str) -> Result<String, ValidationError> {
    let name = name.trim().trim_matches('/');
    let key = format!("{prefix}{name}/");
    keys::validate_key(name, "folder name")?;
    keys::validate_prefix(&key, "folder")?;
    Ok(key)
}

fn new_folder(ctx: AppContext, bucket: String, prefix: &str) {
    let Some(name) = dom::prompt("New folder name:", "") else {
        return;
    };
    let key = match folder_key(prefix, &name) {
        Ok(key) => key,
        Err(e) => {
            ctx.explorer.notify(e.to_string());
            return;
        }
    };
    let Some(client) = ctx.session.client() else {
        return;
    };
    spawn_local(async move {
        match client.create_folder(&bucket, &key).await {
            Ok(()) => {
                ctx.explorer.notify(format!("Created {key}"));
                ctx.reload();
            }
            Err(e) => ctx.explorer.notify(format!("Could not create folder: {e}")),
        }
    });
}

fn new_bucket(ctx: AppContext) {
    let Some(name) = dom::prompt("New bucket name:", "") else {
        return;
    };
    let name = name.trim().to_string();
    if name.is_empty() {
        return;
    }
    let Some(client) = ctx.session.client() else {
        return;
    };
    spawn_local(async move {
        match client.create_bucket(&name).await {
            Ok(()) => {
                ctx.session.load_buckets();
                AppRoute::browse(name, "").push();
            }
            Err(e) => ctx.explorer.notify(format!("Could not create bucket: {e}")),
        }
    });
}

fn toggle_favorite(ctx: AppContext, bucket: String, key: String) {
    let Some(client) = ctx.session.client() else {
        return;
    };
    let favorites = ctx.explorer.favorites;
    let was_favorite = favorites.with_untracked(|f| f.contains(&key));
    let item = ctx.rows.with_untracked(|rows| {
        rows.iter()
            .filter_map(|r| r.as_object())
            .find(|o| o.key == key)
            .cloned()
    });
    spawn_local(async move {
        let result = if was_favorite {
            client.remove_favorite(&bucket, &key).await
        } else {
            client.add_favorite(&bucket, &key).await
        };
        match result {
            Ok(()) if was_favorite => favorites.update(|f| {
                f.remove(&key);
            }),
            Ok(()) => {
                let object = item.unwrap_or_else(|| ObjectItem::new(key.clone(), 0, ""));
                favorites.update(|f| {
                    f.insert(FavoriteObject {
                        object,
                        created_at: String::new(),
                    })
                });
            }
            Err(e) => ctx.explorer.notify(format!("Could not update favorite: {e}")),
        }
    });
}

/// Upload browser files into `prefix` of the current bucket.
pub fn upload_files(ctx: AppContext, prefix: String, files: web_sys::FileList) {
    let (Some(client), Some(bucket)) = (ctx.session.client(), ctx.session.bucket()) else {
        return;
    };
    if files.length() == 0 {
        return;
    }
    ctx.explorer.notify(format!("Uploading {}", pluralize(files.length() as usize, "file")));
    spawn_local(async move {
        match client.upload(&bucket, &prefix, &files).await {
            Ok(count) => {
                ctx.explorer.notify(format!("Uploaded {}", pluralize(count, "file")));
                ctx.reload();
            }
            Err(e) => ctx.explorer.notify(format!("Upload failed: {e}")),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_destination_pairs() {
        let pairs = destination_pairs(&keys(&["docs/a.txt", "docs/sub/b.txt"]), "docs/", "archive");
        assert_eq!(
            pairs,
            vec![
                TransferItem {
                    src_key: "docs/a.txt".to_string(),
                    dst_key: "archive/a.txt".to_string(),
                },
                TransferItem {
                    src_key: "docs/sub/b.txt".to_string(),
                    dst_key: "archive/sub/b.txt".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_destination_pairs_skip_in_place() {
        let pairs = destination_pairs(&keys(&["docs/a.txt"]), "docs/", "docs/");
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_folder_key() {
        assert_eq!(folder_key("docs/", " reports ").unwrap(), "docs/reports/");
        assert_eq!(folder_key("", "new/").unwrap(), "new/");
        assert!(folder_key("docs/", "").is_err());
        assert!(folder_key("docs/", "a*").is_err());
    }

    #[test]
    fn test_describe() {
        let request = TransferRequest::DeleteObjects(KeysTarget {
            bucket: "media".to_string(),
            keys: keys(&["a", "b"]),
        });
        assert_eq!(describe(&request), "Delete 2 objects");
        assert_eq!(confirm_phrase(&request), DELETE_CONFIRM_PHRASE);

        let request = TransferRequest::ZipPrefix(PrefixTarget {
            bucket: "media".to_string(),
            prefix: String::new(),
        });
        assert_eq!(describe(&request), "Zip folder /");
        assert_eq!(confirm_phrase(&request), MOVE_CONFIRM_PHRASE);
    }
}
