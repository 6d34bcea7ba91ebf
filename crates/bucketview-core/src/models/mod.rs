//! Data models for the object-list engine.
//!
//! Contains domain types for:
//! - [`ListingPage`], [`ObjectItem`], [`SearchPage`] - Storage listing pages
//! - [`FavoriteSet`], [`FavoriteObject`] - Starred objects
//! - [`Row`], [`BrowseContext`] - Derived list rows and their scope
//! - [`FilterState`], [`Sort`] - Filter/sort value object
//! - [`Capabilities`], [`ProviderCapability`] - Action gating facts
//! - [`TransferRequest`] - Job queue submissions

mod capability;
mod filter;
mod job;
mod listing;
mod row;

pub use capability::{Capabilities, Feature, ProviderCapability, ProviderCapabilityReasons};
pub use filter::{FilterState, Sort, SortDir, SortKey, TypeFilter};
pub use job::{
    BatchTransfer, IndexTarget, KeysTarget, ObjectTransfer, PrefixTarget, PrefixTransfer,
    TransferItem, TransferMode, TransferPlan, TransferRequest,
};
pub use listing::{
    FavoriteObject, FavoriteSet, ListingPage, ObjectItem, SearchPage, has_more_pages, raw_total,
};
pub use row::{BrowseContext, Row, object_keys};
