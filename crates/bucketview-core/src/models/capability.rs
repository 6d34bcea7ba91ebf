//! Provider capabilities and the session facts that gate actions.

use serde::{Deserialize, Serialize};

/// Per-capability explanation when a provider lacks a feature.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCapabilityReasons {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_crud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_crud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_transfer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presigned_upload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_upload: Option<String>,
}

/// Provider-level feature availability reported by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCapability {
    pub bucket_crud: bool,
    pub object_crud: bool,
    pub job_transfer: bool,
    pub bucket_policy: bool,
    pub presigned_upload: bool,
    pub direct_upload: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasons: Option<ProviderCapabilityReasons>,
}

impl Default for ProviderCapability {
    /// Everything supported, the S3 baseline.
    fn default() -> Self {
        Self {
            bucket_crud: true,
            object_crud: true,
            job_transfer: true,
            bucket_policy: true,
            presigned_upload: true,
            direct_upload: true,
            reasons: None,
        }
    }
}

/// A provider feature that actions can depend on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feature {
    BucketCrud,
    ObjectCrud,
    JobTransfer,
    BucketPolicy,
    PresignedUpload,
    DirectUpload,
}

impl ProviderCapability {
    pub fn supports(&self, feature: Feature) -> bool {
        match feature {
            Feature::BucketCrud => self.bucket_crud,
            Feature::ObjectCrud => self.object_crud,
            Feature::JobTransfer => self.job_transfer,
            Feature::BucketPolicy => self.bucket_policy,
            Feature::PresignedUpload => self.presigned_upload,
            Feature::DirectUpload => self.direct_upload,
        }
    }

    /// Reason text for an unsupported feature, with a generic fallback.
    pub fn reason(&self, feature: Feature) -> String {
        let specific = self.reasons.as_ref().and_then(|r| match feature {
            Feature::BucketCrud => r.bucket_crud.clone(),
            Feature::ObjectCrud => r.object_crud.clone(),
            Feature::JobTransfer => r.job_transfer.clone(),
            Feature::BucketPolicy => r.bucket_policy.clone(),
            Feature::PresignedUpload => r.presigned_upload.clone(),
            Feature::DirectUpload => r.direct_upload.clone(),
        });
        specific.unwrap_or_else(|| "Not supported by this provider".to_string())
    }
}

/// Session facts that decide whether an action is currently usable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub profile_selected: bool,
    pub bucket_selected: bool,
    pub online: bool,
    /// `None` until the server has reported provider capabilities.
    pub provider: Option<ProviderCapability>,
}

impl Capabilities {
    /// Fully usable session, handy for tests and previews.
    pub fn ready() -> Self {
        Self {
            profile_selected: true,
            bucket_selected: true,
            online: true,
            provider: Some(ProviderCapability::default()),
        }
    }

    /// Unknown provider capabilities do not block actions.
    pub fn supports(&self, feature: Feature) -> bool {
        self.provider.as_ref().is_none_or(|p| p.supports(feature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider_capability() {
        let json = r#"{
            "bucketCrud": true, "objectCrud": true, "jobTransfer": false,
            "bucketPolicy": false, "presignedUpload": true, "directUpload": false,
            "reasons": {"jobTransfer": "rclone is not configured"}
        }"#;
        let cap: ProviderCapability = serde_json::from_str(json).unwrap();
        assert!(!cap.supports(Feature::JobTransfer));
        assert_eq!(cap.reason(Feature::JobTransfer), "rclone is not configured");
        assert_eq!(cap.reason(Feature::BucketPolicy), "Not supported by this provider");
    }

    #[test]
    fn test_unknown_provider_does_not_block() {
        let caps = Capabilities {
            provider: None,
            ..Capabilities::ready()
        };
        assert!(caps.supports(Feature::JobTransfer));
    }
}
