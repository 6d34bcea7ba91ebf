//! Transfer job submissions.
//!
//! Serialized in the job API shape: `{"type": "transfer_copy_object", "payload": {...}}`.
//! [`TransferRequest::validate`] applies the same rules the server enforces,
//! so invalid plans are rejected before any request is issued.

use serde::{Deserialize, Serialize};

use crate::config::transfer::{MAX_BATCH_ITEMS, MAX_DELETE_KEYS};
use crate::error::ValidationError;
use crate::keys::{validate_key, validate_prefix};

/// Copy or move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransferMode {
    #[default]
    Copy,
    Move,
}

impl TransferMode {
    pub fn is_move(self) -> bool {
        matches!(self, Self::Move)
    }
}

/// Single-object copy/move payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectTransfer {
    pub src_bucket: String,
    pub src_key: String,
    pub dst_bucket: String,
    pub dst_key: String,
}

/// One source/destination pair in a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferItem {
    pub src_key: String,
    pub dst_key: String,
}

/// Batch copy/move payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchTransfer {
    pub src_bucket: String,
    pub dst_bucket: String,
    pub items: Vec<TransferItem>,
}

/// Prefix copy/move payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefixTransfer {
    pub src_bucket: String,
    pub src_prefix: String,
    pub dst_bucket: String,
    pub dst_prefix: String,
}

/// Payload addressing a prefix in one bucket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefixTarget {
    pub bucket: String,
    pub prefix: String,
}

/// Payload addressing explicit keys in one bucket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeysTarget {
    pub bucket: String,
    pub keys: Vec<String>,
}

/// Index build payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexTarget {
    pub bucket: String,
    pub prefix: String,
    pub full_reindex: bool,
}

/// A job to submit to the transfer queue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum TransferRequest {
    #[serde(rename = "transfer_copy_object")]
    CopyObject(ObjectTransfer),
    #[serde(rename = "transfer_move_object")]
    MoveObject(ObjectTransfer),
    #[serde(rename = "transfer_copy_batch")]
    CopyBatch(BatchTransfer),
    #[serde(rename = "transfer_move_batch")]
    MoveBatch(BatchTransfer),
    #[serde(rename = "transfer_copy_prefix")]
    CopyPrefix(PrefixTransfer),
    #[serde(rename = "transfer_move_prefix")]
    MovePrefix(PrefixTransfer),
    #[serde(rename = "transfer_delete_prefix")]
    DeletePrefix(PrefixTarget),
    #[serde(rename = "s3_delete_objects")]
    DeleteObjects(KeysTarget),
    #[serde(rename = "s3_zip_prefix")]
    ZipPrefix(PrefixTarget),
    #[serde(rename = "s3_zip_objects")]
    ZipObjects(KeysTarget),
    #[serde(rename = "s3_index_objects")]
    IndexObjects(IndexTarget),
}

impl TransferRequest {
    /// Build a copy/move for a list of (source, destination) pairs.
    ///
    /// One pair becomes a single-object job, more become a batch.
    pub fn for_pairs(
        mode: TransferMode,
        src_bucket: &str,
        dst_bucket: &str,
        pairs: Vec<TransferItem>,
    ) -> Result<Self, ValidationError> {
        let request = match pairs.len() {
            0 => return Err(ValidationError::Empty { field: "items" }),
            1 => {
                let item = pairs.into_iter().next().ok_or(ValidationError::Empty { field: "items" })?;
                let payload = ObjectTransfer {
                    src_bucket: src_bucket.to_string(),
                    src_key: item.src_key,
                    dst_bucket: dst_bucket.to_string(),
                    dst_key: item.dst_key,
                };
                match mode {
                    TransferMode::Copy => Self::CopyObject(payload),
                    TransferMode::Move => Self::MoveObject(payload),
                }
            }
            _ => {
                let payload = BatchTransfer {
                    src_bucket: src_bucket.to_string(),
                    dst_bucket: dst_bucket.to_string(),
                    items: pairs,
                };
                match mode {
                    TransferMode::Copy => Self::CopyBatch(payload),
                    TransferMode::Move => Self::MoveBatch(payload),
                }
            }
        };
        request.validate()?;
        Ok(request)
    }

    /// Build a prefix copy/move.
    pub fn for_prefix(mode: TransferMode, payload: PrefixTransfer) -> Result<Self, ValidationError> {
        let request = match mode {
            TransferMode::Copy => Self::CopyPrefix(payload),
            TransferMode::Move => Self::MovePrefix(payload),
        };
        request.validate()?;
        Ok(request)
    }

    /// Job type string as used by the API.
    pub fn job_type(&self) -> &'static str {
        match self {
            Self::CopyObject(_) => "transfer_copy_object",
            Self::MoveObject(_) => "transfer_move_object",
            Self::CopyBatch(_) => "transfer_copy_batch",
            Self::MoveBatch(_) => "transfer_move_batch",
            Self::CopyPrefix(_) => "transfer_copy_prefix",
            Self::MovePrefix(_) => "transfer_move_prefix",
            Self::DeletePrefix(_) => "transfer_delete_prefix",
            Self::DeleteObjects(_) => "s3_delete_objects",
            Self::ZipPrefix(_) => "s3_zip_prefix",
            Self::ZipObjects(_) => "s3_zip_objects",
            Self::IndexObjects(_) => "s3_index_objects",
        }
    }

    /// Whether the calling layer must collect a typed confirmation first.
    pub fn needs_confirmation(&self) -> bool {
        matches!(
            self,
            Self::MoveObject(_)
                | Self::MoveBatch(_)
                | Self::MovePrefix(_)
                | Self::DeletePrefix(_)
                | Self::DeleteObjects(_)
        )
    }

    /// Check the request against the job API's validation rules.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::CopyObject(p) | Self::MoveObject(p) => {
                require_bucket(&p.src_bucket)?;
                require_bucket(&p.dst_bucket)?;
                validate_key(&p.src_key, "srcKey")?;
                validate_key(&p.dst_key, "dstKey")?;
                if p.src_bucket == p.dst_bucket && p.src_key == p.dst_key {
                    return Err(ValidationError::SameSourceAndDestination {
                        key: p.src_key.clone(),
                    });
                }
                Ok(())
            }
            Self::CopyBatch(p) | Self::MoveBatch(p) => {
                require_bucket(&p.src_bucket)?;
                require_bucket(&p.dst_bucket)?;
                if p.items.is_empty() {
                    return Err(ValidationError::Empty { field: "items" });
                }
                if p.items.len() > MAX_BATCH_ITEMS {
                    return Err(ValidationError::TooManyItems {
                        count: p.items.len(),
                        max: MAX_BATCH_ITEMS,
                    });
                }
                for item in &p.items {
                    validate_key(&item.src_key, "srcKey")?;
                    validate_key(&item.dst_key, "dstKey")?;
                    if p.src_bucket == p.dst_bucket && item.src_key == item.dst_key {
                        return Err(ValidationError::SameSourceAndDestination {
                            key: item.src_key.clone(),
                        });
                    }
                }
                Ok(())
            }
            Self::CopyPrefix(p) | Self::MovePrefix(p) => {
                require_bucket(&p.src_bucket)?;
                require_bucket(&p.dst_bucket)?;
                validate_prefix(&p.src_prefix, "srcPrefix")?;
                validate_prefix(&p.dst_prefix, "dstPrefix")?;
                if p.src_bucket == p.dst_bucket {
                    if p.src_prefix == p.dst_prefix {
                        return Err(ValidationError::SameSourceAndDestination {
                            key: p.src_prefix.clone(),
                        });
                    }
                    if p.dst_prefix.starts_with(&p.src_prefix) {
                        return Err(ValidationError::NestedUnderSource {
                            src: p.src_prefix.clone(),
                            dst: p.dst_prefix.clone(),
                        });
                    }
                }
                Ok(())
            }
            Self::DeletePrefix(p) | Self::ZipPrefix(p) => {
                require_bucket(&p.bucket)?;
                validate_prefix(&p.prefix, "prefix")
            }
            Self::DeleteObjects(p) | Self::ZipObjects(p) => {
                require_bucket(&p.bucket)?;
                if p.keys.is_empty() {
                    return Err(ValidationError::Empty { field: "keys" });
                }
                if p.keys.len() > MAX_DELETE_KEYS {
                    return Err(ValidationError::TooManyItems {
                        count: p.keys.len(),
                        max: MAX_DELETE_KEYS,
                    });
                }
                p.keys.iter().try_for_each(|k| validate_key(k, "keys"))
            }
            Self::IndexObjects(p) => {
                require_bucket(&p.bucket)?;
                if p.prefix.contains('*') {
                    return Err(ValidationError::Wildcard {
                        value: p.prefix.clone(),
                    });
                }
                Ok(())
            }
        }
    }
}

fn require_bucket(bucket: &str) -> Result<(), ValidationError> {
    if bucket.trim().is_empty() {
        return Err(ValidationError::EmptyBucket);
    }
    Ok(())
}

/// A validated transfer plus whether it must be confirmed before submitting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferPlan {
    pub mode: TransferMode,
    pub request: TransferRequest,
    pub needs_confirmation: bool,
}

impl TransferPlan {
    pub fn new(mode: TransferMode, request: TransferRequest) -> Self {
        Self {
            mode,
            needs_confirmation: request.needs_confirmation(),
            request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(src: &str, dst: &str) -> TransferItem {
        TransferItem {
            src_key: src.to_string(),
            dst_key: dst.to_string(),
        }
    }

    #[test]
    fn test_job_json_shape() {
        let request =
            TransferRequest::for_pairs(TransferMode::Copy, "b", "b", vec![item("a.txt", "x/a.txt")])
                .unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "transfer_copy_object");
        assert_eq!(json["payload"]["srcKey"], "a.txt");
        assert_eq!(json["payload"]["dstKey"], "x/a.txt");
        assert_eq!(request.job_type(), "transfer_copy_object");
    }

    #[test]
    fn test_multiple_pairs_become_batch() {
        let request = TransferRequest::for_pairs(
            TransferMode::Move,
            "b",
            "b",
            vec![item("a", "x/a"), item("c", "x/c")],
        )
        .unwrap();
        assert!(matches!(request, TransferRequest::MoveBatch(ref p) if p.items.len() == 2));
        assert!(request.needs_confirmation());
    }

    #[test]
    fn test_batch_limit() {
        let pairs = (0..=MAX_BATCH_ITEMS)
            .map(|i| item(&format!("k{i}"), &format!("d/k{i}")))
            .collect();
        let err = TransferRequest::for_pairs(TransferMode::Copy, "b", "b", pairs).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooManyItems {
                count: MAX_BATCH_ITEMS + 1,
                max: MAX_BATCH_ITEMS
            }
        );
    }

    #[test]
    fn test_rejects_wildcards_and_same_key() {
        assert!(matches!(
            TransferRequest::for_pairs(TransferMode::Copy, "b", "b", vec![item("a*", "b")]),
            Err(ValidationError::Wildcard { .. })
        ));
        assert!(matches!(
            TransferRequest::for_pairs(TransferMode::Copy, "b", "b", vec![item("a", "a")]),
            Err(ValidationError::SameSourceAndDestination { .. })
        ));
        assert!(TransferRequest::for_pairs(TransferMode::Copy, "b", "other", vec![item("a", "a")]).is_ok());
    }

    #[test]
    fn test_prefix_nesting_rejected() {
        let payload = PrefixTransfer {
            src_bucket: "b".to_string(),
            src_prefix: "a/".to_string(),
            dst_bucket: "b".to_string(),
            dst_prefix: "a/b/a/".to_string(),
        };
        assert!(matches!(
            TransferRequest::for_prefix(TransferMode::Move, payload),
            Err(ValidationError::NestedUnderSource { .. })
        ));
    }

    #[test]
    fn test_round_trip_through_json() {
        let request = TransferRequest::DeleteObjects(KeysTarget {
            bucket: "b".to_string(),
            keys: vec!["a".to_string()],
        });
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.starts_with(r#"{"type":"s3_delete_objects","payload":"#));
        let back: TransferRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }
}
