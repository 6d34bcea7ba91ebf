//! Data models for the browser shell.
//!
//! Contains:
//! - [`AppRoute`] - Hash-based bucket/prefix navigation
//! - [`Profile`], [`Bucket`], [`Meta`] - Session setup responses
//! - [`JobCreated`], [`IndexSummary`], [`PresignedUrl`], [`UploadCreated`] - Action responses
//! - [`SessionPrefs`] - Remembered profile selection

mod api;
mod route;

use bucketview_core::prefs::PrefEntry;
use serde::{Deserialize, Serialize};

pub use api::{
    Bucket, FavoritesResponse, IndexSummary, JobCreated, Meta, PresignedUrl, Profile,
    UploadCreated,
};
pub use route::AppRoute;

/// The profile picked in the last session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionPrefs {
    pub profile_id: Option<String>,
}

impl PrefEntry for SessionPrefs {
    const KEY: &'static str = "bucketview.session";
    const VERSION: u32 = 1;
}
