//! Error types for the object-list engine.
//!
//! Errors are grouped by how the UI surfaces them:
//!
//! - [`ValidationError`] - malformed destinations, rejected before any request
//! - [`DropError`] - drag-and-drop drops that cannot be turned into a transfer
//! - [`ListingError`] - listing/search failures, split into "not indexed" and generic
//! - [`StoreError`] - key/value persistence failures
//!
//! Capability problems are not errors: actions are rendered disabled with a reason.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Synchronous validation failures for keys, prefixes and transfer plans.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("bucket is required")]
    EmptyBucket,
    #[error("{field} is required")]
    Empty { field: &'static str },
    #[error("wildcards are not allowed in '{value}'")]
    Wildcard { value: String },
    #[error("prefix '{prefix}' must end with '/'")]
    UnterminatedPrefix { prefix: String },
    #[error("source and destination must be different ('{key}')")]
    SameSourceAndDestination { key: String },
    #[error("cannot move '{src}' into itself ('{dst}')")]
    NestedUnderSource { src: String, dst: String },
    #[error("too many items ({count}, max {max})")]
    TooManyItems { count: usize, max: usize },
}

/// Reasons a drop cannot produce a transfer job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DropError {
    #[error("moving between buckets is not supported ('{from}' to '{to}')")]
    CrossBucket { from: String, to: String },
    #[error("nothing to drop")]
    EmptyPayload,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Error envelope returned by the storage API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiError,
}

/// Error detail inside [`ApiErrorBody`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error code signalling that a bucket has no search index yet.
pub const NOT_INDEXED_CODE: &str = "not_indexed";

/// Listing and search failures, as seen by the UI.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ListingError {
    /// Search needs an object index that does not exist yet.
    #[error("bucket '{bucket}' is not indexed for search")]
    NotIndexed { bucket: String },
    /// Anything else.
    #[error("request failed ({status}): {message}")]
    Failed {
        status: u16,
        code: String,
        message: String,
    },
}

impl ListingError {
    /// Classify an API error response.
    pub fn from_api(bucket: &str, status: u16, body: &ApiErrorBody) -> Self {
        if body.error.code == NOT_INDEXED_CODE {
            return Self::NotIndexed {
                bucket: bucket.to_string(),
            };
        }
        Self::Failed {
            status,
            code: body.error.code.clone(),
            message: body.error.message.clone(),
        }
    }

    /// Classify a raw response body, falling back to a generic failure
    /// when the body is not an API error envelope.
    pub fn from_response(bucket: &str, status: u16, raw: &str) -> Self {
        match serde_json::from_str::<ApiErrorBody>(raw) {
            Ok(body) => Self::from_api(bucket, status, &body),
            Err(_) => Self::Failed {
                status,
                code: String::new(),
                message: raw.trim().to_string(),
            },
        }
    }

    /// Whether the UI should offer an indexing action instead of an error.
    pub fn is_not_indexed(&self) -> bool {
        matches!(self, Self::NotIndexed { .. })
    }
}

/// Key/value persistence failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("storage not available")]
    Unavailable,
    #[error("failed to serialize '{key}': {reason}")]
    Serialize { key: String, reason: String },
    #[error("failed to write '{key}'")]
    Write { key: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_indexed_classification() {
        let raw = r#"{"error":{"code":"not_indexed","message":"object index is not available","details":{"bucket":"b"}}}"#;
        let err = ListingError::from_response("b", 409, raw);
        assert!(err.is_not_indexed());
        assert_eq!(
            err,
            ListingError::NotIndexed {
                bucket: "b".to_string()
            }
        );
    }

    #[test]
    fn test_generic_failure_classification() {
        let raw = r#"{"error":{"code":"s3_error","message":"failed to list objects"}}"#;
        let err = ListingError::from_response("b", 400, raw);
        assert!(!err.is_not_indexed());
        assert!(matches!(err, ListingError::Failed { status: 400, ref code, .. } if code == "s3_error"));
    }

    #[test]
    fn test_non_json_body_is_generic_failure() {
        let err = ListingError::from_response("b", 502, "Bad Gateway\n");
        assert_eq!(
            err,
            ListingError::Failed {
                status: 502,
                code: String::new(),
                message: "Bad Gateway".to_string(),
            }
        );
    }

    #[test]
    fn test_drop_error_wraps_validation() {
        let err: DropError = ValidationError::Empty { field: "key" }.into();
        assert_eq!(err.to_string(), "key is required");
    }
}
