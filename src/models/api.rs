//! Response bodies of the storage API that only the browser shell needs.
//!
//! Listing, search, favorites and job payloads live in `bucketview_core::models`.

use std::collections::HashMap;

use bucketview_core::models::{FavoriteObject, ProviderCapability};
use serde::{Deserialize, Serialize};

/// A connection profile (credentials live on the server).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    /// Provider type, e.g. `s3_compatible`, `azure_blob`.
    pub provider: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// `GET /meta`, reduced to what gates actions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub capabilities: MetaCapabilities,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaCapabilities {
    #[serde(default)]
    pub providers: HashMap<String, ProviderCapability>,
}

impl Meta {
    /// Capabilities of the provider behind `profile`, if the server reported them.
    pub fn provider_for(&self, profile: &Profile) -> Option<ProviderCapability> {
        self.capabilities.providers.get(&profile.provider).cloned()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesResponse {
    #[serde(default)]
    pub items: Vec<FavoriteObject>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCreated {
    pub job_id: String,
}

/// `GET /buckets/{bucket}/objects/index-summary`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSummary {
    #[serde(default)]
    pub object_count: u64,
    #[serde(default)]
    pub indexed_at: Option<String>,
}

impl IndexSummary {
    pub fn is_indexed(&self) -> bool {
        self.indexed_at.is_some()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUrl {
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadCreated {
    pub upload_id: String,
}
