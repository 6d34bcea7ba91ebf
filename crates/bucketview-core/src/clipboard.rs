//! In-session copy/cut/paste of objects.

use crate::error::ValidationError;
use crate::keys;
use crate::models::{TransferItem, TransferMode, TransferPlan, TransferRequest};

/// Keys waiting to be pasted, with where they came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClipboardPayload {
    pub mode: TransferMode,
    pub src_bucket: String,
    pub src_prefix: String,
    pub keys: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Clipboard {
    payload: Option<ClipboardPayload>,
}

impl Clipboard {
    pub fn payload(&self) -> Option<&ClipboardPayload> {
        self.payload.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_none()
    }

    pub fn copy(&mut self, bucket: &str, prefix: &str, keys: Vec<String>) -> bool {
        self.store(TransferMode::Copy, bucket, prefix, keys)
    }

    pub fn cut(&mut self, bucket: &str, prefix: &str, keys: Vec<String>) -> bool {
        self.store(TransferMode::Move, bucket, prefix, keys)
    }

    fn store(&mut self, mode: TransferMode, bucket: &str, prefix: &str, keys: Vec<String>) -> bool {
        if keys.is_empty() {
            return false;
        }
        log::debug!("clipboard {mode:?}: {} key(s) from {bucket}", keys.len());
        self.payload = Some(ClipboardPayload {
            mode,
            src_bucket: bucket.to_string(),
            src_prefix: keys::normalize_prefix(prefix),
            keys,
        });
        true
    }

    pub fn clear(&mut self) {
        self.payload = None;
    }

    /// Plan a paste into `dst_prefix` of `dst_bucket`.
    ///
    /// Each key keeps its name relative to the prefix it was copied from.
    /// `Ok(None)` means every key is already in place. The clipboard is not
    /// touched; call [`complete_paste`](Self::complete_paste) once the job
    /// was accepted.
    pub fn plan_paste(
        &self,
        dst_bucket: &str,
        dst_prefix: &str,
    ) -> Result<Option<TransferPlan>, ValidationError> {
        let Some(payload) = &self.payload else {
            return Ok(None);
        };
        if dst_bucket.trim().is_empty() {
            return Err(ValidationError::EmptyBucket);
        }
        let dst_prefix = keys::normalize_prefix(dst_prefix);
        let same_bucket = payload.src_bucket == dst_bucket;
        let pairs: Vec<TransferItem> = payload
            .keys
            .iter()
            .map(|key| TransferItem {
                src_key: key.clone(),
                dst_key: format!("{dst_prefix}{}", keys::display_name(key, &payload.src_prefix)),
            })
            .filter(|pair| !(same_bucket && pair.src_key == pair.dst_key))
            .collect();
        if pairs.is_empty() {
            return Ok(None);
        }
        let request = TransferRequest::for_pairs(payload.mode, &payload.src_bucket, dst_bucket, pairs)?;
        Ok(Some(TransferPlan::new(payload.mode, request)))
    }

    /// A paste was submitted: a cut is consumed, a copy stays for reuse.
    pub fn complete_paste(&mut self) {
        if self.payload.as_ref().is_some_and(|p| p.mode.is_move()) {
            self.payload = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_copy_paste_keeps_payload() {
        let mut clipboard = Clipboard::default();
        assert!(clipboard.copy("media", "docs/", keys(&["docs/a.txt"])));
        let plan = clipboard.plan_paste("media", "backup").unwrap().unwrap();
        assert!(!plan.needs_confirmation);
        let TransferRequest::CopyObject(payload) = &plan.request else {
            panic!("expected single copy");
        };
        assert_eq!(payload.dst_key, "backup/a.txt");
        clipboard.complete_paste();
        assert!(!clipboard.is_empty());
    }

    #[test]
    fn test_cut_paste_requires_confirmation_and_clears() {
        let mut clipboard = Clipboard::default();
        clipboard.cut("media", "docs/", keys(&["docs/a.txt", "docs/b.txt"]));
        let plan = clipboard.plan_paste("media", "").unwrap().unwrap();
        assert!(plan.needs_confirmation);
        assert!(matches!(plan.request, TransferRequest::MoveBatch(_)));
        clipboard.complete_paste();
        assert!(clipboard.is_empty());
    }

    #[test]
    fn test_paste_in_place_is_noop() {
        let mut clipboard = Clipboard::default();
        clipboard.cut("media", "docs/", keys(&["docs/a.txt"]));
        assert_eq!(clipboard.plan_paste("media", "docs/"), Ok(None));
        assert!(!clipboard.is_empty());
    }

    #[test]
    fn test_paste_into_other_bucket_keeps_key() {
        let mut clipboard = Clipboard::default();
        clipboard.copy("media", "docs/", keys(&["docs/a.txt"]));
        let plan = clipboard.plan_paste("archive", "docs/").unwrap().unwrap();
        let TransferRequest::CopyObject(payload) = &plan.request else {
            panic!("expected single copy");
        };
        assert_eq!(payload.dst_bucket, "archive");
        assert_eq!(payload.dst_key, "docs/a.txt");
    }

    #[test]
    fn test_empty_copy_is_ignored() {
        let mut clipboard = Clipboard::default();
        assert!(!clipboard.copy("media", "", Vec::new()));
        assert_eq!(clipboard.plan_paste("media", "x/"), Ok(None));
        assert_eq!(
            Clipboard::default().plan_paste("", "x/"),
            Ok(None)
        );
    }

    #[test]
    fn test_wildcard_destination_rejected() {
        let mut clipboard = Clipboard::default();
        clipboard.copy("media", "", keys(&["a.txt"]));
        assert!(matches!(
            clipboard.plan_paste("media", "bad*/"),
            Err(ValidationError::Wildcard { .. })
        ));
    }
}
