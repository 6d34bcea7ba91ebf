//! DataTransfer glue for internal drags and external file drops.
//!
//! Internal drags carry a [`DragPayload`] under the private [`DRAG_MIME`]
//! type. Browsers hide drag data until the drop, so drag-over only checks
//! that the type is present. External file drops are uploads and never go
//! through drop planning.

use bucketview_core::config::DRAG_MIME;
use bucketview_core::dnd::{DragPayload, DropOutcome, DropTarget, drop_mode, plan_drop};
use bucketview_core::models::TransferMode;
use bucketview_core::DragState;
use leptos::prelude::*;
use web_sys::DragEvent;

use super::commands::{submit, upload_files};
use super::shortcuts::mouse_modifiers;
use crate::app::AppContext;

fn has_type(event: &DragEvent, wanted: &str) -> bool {
    event.data_transfer().is_some_and(|dt| {
        dt.types()
            .iter()
            .any(|t| t.as_string().as_deref() == Some(wanted))
    })
}

/// Whether the drag carries an internal payload.
pub fn has_payload(event: &DragEvent) -> bool {
    has_type(event, DRAG_MIME)
}

fn has_files(event: &DragEvent) -> bool {
    has_type(event, "Files")
}

/// Attach `payload` to a starting drag.
pub fn start(event: &DragEvent, payload: &DragPayload) {
    let Some(dt) = event.data_transfer() else {
        return;
    };
    match payload.encode() {
        Ok(raw) => {
            if dt.set_data(DRAG_MIME, &raw).is_err() {
                log::warn!("browser refused the drag payload");
            }
            dt.set_effect_allowed("copyMove");
        }
        Err(e) => log::warn!("failed to encode drag payload: {e}"),
    }
}

/// Drag moved over the drop target for `prefix`.
pub fn over(ctx: AppContext, event: &DragEvent, prefix: &str) {
    let internal = has_payload(event);
    let accepted = ctx
        .explorer
        .drag
        .try_update(|d| d.drag_over(internal, prefix))
        .unwrap_or(false);
    if accepted || has_files(event) {
        event.prevent_default();
        event.stop_propagation();
    }
    if let Some(dt) = event.data_transfer() {
        let effect = if !internal {
            "copy"
        } else {
            match drop_mode(mouse_modifiers(event)) {
                TransferMode::Copy => "copy",
                TransferMode::Move => "move",
            }
        };
        dt.set_drop_effect(effect);
    }
}

pub fn leave(ctx: AppContext, prefix: &str) {
    ctx.explorer.drag.update(|d| d.drag_leave(prefix));
}

pub fn end(ctx: AppContext) {
    ctx.explorer.drag.update(DragState::drag_end);
}

/// Something was dropped on the target for `prefix`.
pub fn drop_on(ctx: AppContext, event: &DragEvent, prefix: &str) {
    event.prevent_default();
    event.stop_propagation();
    end(ctx);
    let Some(dt) = event.data_transfer() else {
        return;
    };

    if !has_payload(event) {
        if let Some(files) = dt.files() {
            upload_files(ctx, prefix.to_string(), files);
        }
        return;
    }
    let Some(payload) = dt.get_data(DRAG_MIME).ok().and_then(|raw| DragPayload::decode(&raw)) else {
        return;
    };
    let Some(bucket) = ctx.session.bucket() else {
        return;
    };
    let current_prefix = ctx.session.prefix();
    // Mode comes from the modifiers held when the drop happens
    let modifiers = mouse_modifiers(event);
    match plan_drop(&payload, &DropTarget::new(bucket, prefix), &current_prefix, modifiers) {
        Ok(DropOutcome::NoOp) => ctx.explorer.notify("Already there"),
        Ok(DropOutcome::Transfer(plan)) => submit(ctx, plan.request, move || ctx.reload()),
        Err(e) => {
            log::warn!("drop rejected: {e}");
            ctx.explorer.notify(e.to_string());
        }
    }
}
