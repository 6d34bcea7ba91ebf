//! Filter and sort state for the object list.

use serde::{Deserialize, Serialize};

/// Which row kinds are shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeFilter {
    #[default]
    All,
    Folders,
    Files,
}

/// Object sort key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Name,
    Size,
    Time,
}

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Sort key plus direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    pub key: SortKey,
    pub dir: SortDir,
}

impl Sort {
    pub fn new(key: SortKey, dir: SortDir) -> Self {
        Self { key, dir }
    }

    /// Clicking a column: same key flips direction, another key starts ascending.
    pub fn toggle(self, key: SortKey) -> Self {
        if self.key == key {
            Self::new(key, self.dir.toggled())
        } else {
            Self::new(key, SortDir::Asc)
        }
    }
}

/// Complete filter/sort state. A pure value, compared by value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub type_filter: TypeFilter,
    /// Extension without the leading dot; empty means no filter.
    pub ext_filter: String,
    pub min_size: Option<u64>,
    pub max_size: Option<u64>,
    pub min_modified_ms: Option<i64>,
    pub max_modified_ms: Option<i64>,
    pub sort: Sort,
    pub favorites_only: bool,
    pub favorites_first: bool,
}

impl FilterState {
    /// Size bounds with inversion corrected.
    pub fn size_bounds(&self) -> (Option<u64>, Option<u64>) {
        match (self.min_size, self.max_size) {
            (Some(min), Some(max)) if min > max => (Some(max), Some(min)),
            bounds => bounds,
        }
    }

    /// Modified-time bounds with inversion corrected.
    pub fn time_bounds(&self) -> (Option<i64>, Option<i64>) {
        match (self.min_modified_ms, self.max_modified_ms) {
            (Some(min), Some(max)) if min > max => (Some(max), Some(min)),
            bounds => bounds,
        }
    }

    /// Whether any structured (non-search, non-sort) filter narrows the list.
    pub fn is_narrowing(&self) -> bool {
        self.type_filter != TypeFilter::All
            || !self.ext_filter.trim().is_empty()
            || self.min_size.is_some()
            || self.max_size.is_some()
            || self.min_modified_ms.is_some()
            || self.max_modified_ms.is_some()
            || self.favorites_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_swapped_when_inverted() {
        let filter = FilterState {
            min_size: Some(200),
            max_size: Some(100),
            min_modified_ms: Some(5),
            max_modified_ms: Some(1),
            ..Default::default()
        };
        assert_eq!(filter.size_bounds(), (Some(100), Some(200)));
        assert_eq!(filter.time_bounds(), (Some(1), Some(5)));
    }

    #[test]
    fn test_sort_toggle() {
        let sort = Sort::default();
        assert_eq!(sort.toggle(SortKey::Name), Sort::new(SortKey::Name, SortDir::Desc));
        assert_eq!(sort.toggle(SortKey::Size), Sort::new(SortKey::Size, SortDir::Asc));
    }

    #[test]
    fn test_is_narrowing() {
        assert!(!FilterState::default().is_narrowing());
        let filter = FilterState {
            ext_filter: "pdf".to_string(),
            ..Default::default()
        };
        assert!(filter.is_narrowing());
        let sorted_only = FilterState {
            sort: Sort::new(SortKey::Size, SortDir::Desc),
            favorites_first: true,
            ..Default::default()
        };
        assert!(!sorted_only.is_narrowing());
    }
}
