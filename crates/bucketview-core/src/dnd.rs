//! Internal drag and drop: payload codec, hover tracking and drop planning.
//!
//! Only drags carrying [`DRAG_MIME`](crate::config::DRAG_MIME) are handled
//! here. External file drops are uploads and never reach this module.

use serde::{Deserialize, Serialize};

use crate::error::{DropError, ValidationError};
use crate::input::Modifiers;
use crate::keys;
use crate::models::{PrefixTransfer, TransferItem, TransferMode, TransferPlan, TransferRequest};
use crate::selection::SelectionModel;

// =============================================================================
// Payload
// =============================================================================

/// What is being dragged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DragPayload {
    Objects { bucket: String, keys: Vec<String> },
    Prefix { bucket: String, prefix: String },
}

impl DragPayload {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode the private MIME string; anything unrecognized is `None`.
    pub fn decode(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(payload) => Some(payload),
            Err(e) => {
                log::debug!("ignoring unrecognized drag payload: {e}");
                None
            }
        }
    }

    pub fn bucket(&self) -> &str {
        match self {
            Self::Objects { bucket, .. } | Self::Prefix { bucket, .. } => bucket,
        }
    }
}

/// Start dragging an object row.
///
/// An unselected row becomes the only selection first; a selected row
/// drags the whole selection in display order.
pub fn drag_objects(
    selection: &mut SelectionModel,
    order: &[String],
    bucket: &str,
    key: &str,
) -> DragPayload {
    if !selection.is_selected(key) {
        selection.select_single(key);
    }
    let mut keys = selection.selected_in_order(order);
    if keys.is_empty() {
        keys.push(key.to_string());
    }
    DragPayload::Objects {
        bucket: bucket.to_string(),
        keys,
    }
}

/// Start dragging a prefix row.
pub fn drag_prefix(bucket: &str, prefix: &str) -> DragPayload {
    DragPayload::Prefix {
        bucket: bucket.to_string(),
        prefix: keys::normalize_prefix(prefix),
    }
}

// =============================================================================
// Hover Tracking
// =============================================================================

/// Tracks the single highlighted drop target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DragState {
    hover: Option<String>,
}

impl DragState {
    pub fn hover(&self) -> Option<&str> {
        self.hover.as_deref()
    }

    pub fn is_hovered(&self, prefix: &str) -> bool {
        self.hover.as_deref() == Some(keys::normalize_prefix(prefix).as_str())
    }

    /// Drag moved over a target prefix.
    ///
    /// Returns whether the drop is accepted (only internal payloads are).
    pub fn drag_over(&mut self, has_internal_payload: bool, target: &str) -> bool {
        if !has_internal_payload {
            self.hover = None;
            return false;
        }
        self.hover = Some(keys::normalize_prefix(target));
        true
    }

    /// Drag left a target; only clears the highlight it owns.
    pub fn drag_leave(&mut self, target: &str) {
        if self.is_hovered(target) {
            self.hover = None;
        }
    }

    /// Drag ended (dropped or cancelled).
    pub fn drag_end(&mut self) {
        self.hover = None;
    }
}

// =============================================================================
// Drop Planning
// =============================================================================

/// Copy if ctrl, cmd or alt is held when the drop happens.
pub fn drop_mode(modifiers: Modifiers) -> TransferMode {
    if modifiers.is_copy() {
        TransferMode::Copy
    } else {
        TransferMode::Move
    }
}

/// Where the payload was dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropTarget {
    pub bucket: String,
    pub prefix: String,
}

impl DropTarget {
    pub fn new(bucket: impl Into<String>, prefix: &str) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: keys::normalize_prefix(prefix),
        }
    }
}

/// Result of a drop that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// Everything is already where it would end up.
    NoOp,
    Transfer(TransferPlan),
}

/// Turn a drop into a transfer.
///
/// `current_prefix` is the prefix being browsed; object destinations keep
/// the key's name relative to it.
pub fn plan_drop(
    payload: &DragPayload,
    target: &DropTarget,
    current_prefix: &str,
    modifiers: Modifiers,
) -> Result<DropOutcome, DropError> {
    if payload.bucket() != target.bucket {
        log::warn!(
            "rejected cross-bucket drop from '{}' to '{}'",
            payload.bucket(),
            target.bucket
        );
        return Err(DropError::CrossBucket {
            from: payload.bucket().to_string(),
            to: target.bucket.clone(),
        });
    }
    let mode = drop_mode(modifiers);
    let target_prefix = keys::normalize_prefix(&target.prefix);

    let request = match payload {
        DragPayload::Prefix { bucket, prefix } => {
            let src = keys::normalize_prefix(prefix);
            if src.is_empty() {
                return Err(DropError::EmptyPayload);
            }
            let dst = format!("{target_prefix}{}/", keys::folder_name(&src));
            if dst == src {
                return Ok(DropOutcome::NoOp);
            }
            if dst.starts_with(&src) {
                log::warn!("rejected drop of '{src}' into itself");
                return Err(ValidationError::NestedUnderSource { src, dst }.into());
            }
            TransferRequest::for_prefix(
                mode,
                PrefixTransfer {
                    src_bucket: bucket.clone(),
                    src_prefix: src,
                    dst_bucket: bucket.clone(),
                    dst_prefix: dst,
                },
            )?
        }
        DragPayload::Objects { bucket, keys: src_keys } => {
            if src_keys.is_empty() {
                return Err(DropError::EmptyPayload);
            }
            let pairs: Vec<TransferItem> = src_keys
                .iter()
                .map(|key| TransferItem {
                    src_key: key.clone(),
                    dst_key: format!("{target_prefix}{}", keys::display_name(key, current_prefix)),
                })
                .filter(|pair| pair.src_key != pair.dst_key)
                .collect();
            if pairs.is_empty() {
                return Ok(DropOutcome::NoOp);
            }
            TransferRequest::for_pairs(mode, bucket, bucket, pairs)?
        }
    };

    Ok(DropOutcome::Transfer(TransferPlan::new(mode, request)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix_payload(prefix: &str) -> DragPayload {
        drag_prefix("media", prefix)
    }

    fn objects(keys: &[&str]) -> DragPayload {
        DragPayload::Objects {
            bucket: "media".to_string(),
            keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn test_payload_wire_shape() {
        let encoded = objects(&["a.txt"]).encode().unwrap();
        assert_eq!(encoded, r#"{"kind":"objects","bucket":"media","keys":["a.txt"]}"#);
        let prefix = DragPayload::decode(r#"{"kind":"prefix","bucket":"b","prefix":"x/"}"#);
        assert_eq!(
            prefix,
            Some(DragPayload::Prefix {
                bucket: "b".to_string(),
                prefix: "x/".to_string()
            })
        );
        assert_eq!(DragPayload::decode("not json"), None);
        assert_eq!(DragPayload::decode(r#"{"kind":"files"}"#), None);
    }

    #[test]
    fn test_drag_unselected_row_selects_it() {
        let order: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let mut selection = SelectionModel::new();
        selection.toggle("a");
        selection.toggle("c");

        let payload = drag_objects(&mut selection, &order, "media", "b");
        assert_eq!(payload, DragPayload::Objects { bucket: "media".to_string(), keys: vec!["b".to_string()] });
        assert_eq!(selection.len(), 1);

        selection.toggle("c");
        let payload = drag_objects(&mut selection, &order, "media", "c");
        assert_eq!(
            payload,
            DragPayload::Objects {
                bucket: "media".to_string(),
                keys: vec!["b".to_string(), "c".to_string()]
            }
        );
    }

    #[test]
    fn test_hover_tracking() {
        let mut state = DragState::default();
        assert!(!state.drag_over(false, "docs"));
        assert_eq!(state.hover(), None);
        assert!(state.drag_over(true, "/docs"));
        assert_eq!(state.hover(), Some("docs/"));
        state.drag_leave("other/");
        assert!(state.is_hovered("docs/"));
        state.drag_over(true, "img/");
        assert!(!state.is_hovered("docs/"));
        state.drag_leave("img");
        assert_eq!(state.hover(), None);
    }

    #[test]
    fn test_mode_from_modifiers() {
        assert_eq!(drop_mode(Modifiers::NONE), TransferMode::Move);
        assert_eq!(drop_mode(Modifiers::ctrl()), TransferMode::Copy);
        assert_eq!(drop_mode(Modifiers { alt: true, ..Modifiers::NONE }), TransferMode::Copy);
        assert_eq!(drop_mode(Modifiers::shift()), TransferMode::Move);
    }

    #[test]
    fn test_prefix_drop_into_itself_is_rejected() {
        let payload = prefix_payload("a/");
        let onto_self = plan_drop(&payload, &DropTarget::new("media", "a/"), "", Modifiers::NONE);
        assert!(matches!(
            onto_self,
            Err(DropError::Invalid(ValidationError::NestedUnderSource { .. }))
        ));
        let onto_child = plan_drop(&payload, &DropTarget::new("media", "a/b/"), "", Modifiers::NONE);
        assert!(onto_child.is_err());
    }

    #[test]
    fn test_prefix_drop_onto_parent_is_noop() {
        let payload = prefix_payload("a/b/");
        let outcome = plan_drop(&payload, &DropTarget::new("media", "a/"), "a/", Modifiers::NONE);
        assert_eq!(outcome, Ok(DropOutcome::NoOp));
    }

    #[test]
    fn test_prefix_drop_produces_one_job() {
        let payload = prefix_payload("a/");
        let outcome = plan_drop(&payload, &DropTarget::new("media", "x/"), "", Modifiers::NONE).unwrap();
        let DropOutcome::Transfer(plan) = outcome else {
            panic!("expected a transfer");
        };
        assert!(plan.needs_confirmation);
        assert_eq!(
            plan.request,
            TransferRequest::MovePrefix(PrefixTransfer {
                src_bucket: "media".to_string(),
                src_prefix: "a/".to_string(),
                dst_bucket: "media".to_string(),
                dst_prefix: "x/a/".to_string(),
            })
        );
    }

    #[test]
    fn test_object_drop_maps_relative_names() {
        let payload = objects(&["docs/a.txt", "docs/sub/b.txt"]);
        let outcome = plan_drop(&payload, &DropTarget::new("media", "archive"), "docs/", Modifiers::ctrl()).unwrap();
        let DropOutcome::Transfer(plan) = outcome else {
            panic!("expected a transfer");
        };
        assert_eq!(plan.mode, TransferMode::Copy);
        assert!(!plan.needs_confirmation);
        let TransferRequest::CopyBatch(batch) = plan.request else {
            panic!("expected a batch");
        };
        let dsts: Vec<_> = batch.items.iter().map(|i| i.dst_key.as_str()).collect();
        assert_eq!(dsts, vec!["archive/a.txt", "archive/sub/b.txt"]);
    }

    #[test]
    fn test_object_drop_onto_current_prefix_is_noop() {
        let payload = objects(&["docs/a.txt"]);
        let outcome = plan_drop(&payload, &DropTarget::new("media", "docs/"), "docs/", Modifiers::NONE);
        assert_eq!(outcome, Ok(DropOutcome::NoOp));
    }

    #[test]
    fn test_cross_bucket_drop_rejected() {
        let payload = objects(&["a.txt"]);
        let outcome = plan_drop(&payload, &DropTarget::new("other", "x/"), "", Modifiers::NONE);
        assert!(matches!(outcome, Err(DropError::CrossBucket { .. })));
    }
}
