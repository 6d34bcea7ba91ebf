//! Row derivation: listing pages + favorites + filter state -> ordered rows.
//!
//! The pipeline order is fixed and does not depend on call order:
//!
//! 1. source set (favorites under the prefix, or all fetched pages)
//! 2. search tokens
//! 3. structured filters (extension, size, modified time)
//! 4. type filter
//! 5. sort
//! 6. favorites-first partition (objects only)
//! 7. emit prefixes, then objects
//!
//! [`derive_rows`] is pure: identical inputs always give identical output,
//! and no key or prefix appears twice.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::keys;
use crate::models::{
    FavoriteSet, FilterState, ListingPage, ObjectItem, Row, Sort, SortDir, SortKey, TypeFilter,
};
use crate::search::SearchQuery;

/// Everything a derivation depends on.
#[derive(Clone, Copy, Debug)]
pub struct RowInputs<'a> {
    /// Prefix being browsed (normalized, `""` for the root).
    pub prefix: &'a str,
    /// All pages fetched so far for the current context.
    pub pages: &'a [ListingPage],
    pub favorites: &'a FavoriteSet,
    pub filter: &'a FilterState,
    pub search: &'a SearchQuery,
}

/// Derive the ordered, deduplicated row sequence.
pub fn derive_rows(inputs: &RowInputs<'_>) -> Vec<Row> {
    let RowInputs {
        prefix,
        pages,
        favorites,
        filter,
        search,
    } = *inputs;

    // 1. Source set
    let (prefixes, objects) = if filter.favorites_only {
        let mut seen = HashSet::new();
        let objects: Vec<&ObjectItem> = favorites
            .under_prefix(prefix)
            .filter(|o| seen.insert(o.key.as_str()))
            .collect();
        (Vec::new(), objects)
    } else {
        collect_pages(prefix, pages)
    };

    // 2. Search
    let prefixes: Vec<&str> = prefixes
        .into_iter()
        .filter(|p| search.matches_any([keys::prefix_display_name(p, prefix), *p]))
        .collect();
    let objects: Vec<&ObjectItem> = objects
        .into_iter()
        .filter(|o| search.matches_any([keys::display_name(&o.key, prefix), o.key.as_str()]))
        .collect();

    // 3. Structured filters
    let object_filter = ObjectFilter::new(filter);
    let objects: Vec<(&ObjectItem, Option<i64>)> = objects
        .into_iter()
        .map(|o| (o, o.last_modified_ms()))
        .filter(|(o, modified)| object_filter.accepts(o, *modified))
        .collect();

    // 4. Type filter
    let (mut prefixes, mut objects) = match filter.type_filter {
        TypeFilter::All => (prefixes, objects),
        TypeFilter::Folders => (prefixes, Vec::new()),
        TypeFilter::Files => (Vec::new(), objects),
    };

    // 5. Sort
    prefixes.sort_unstable_by(|a, b| apply_dir(a.cmp(b), filter.sort.dir));
    objects.sort_by(|a, b| compare_objects(a, b, filter.sort));

    // 6. Favorites first
    if filter.favorites_first && !favorites.is_empty() {
        let (favs, rest): (Vec<_>, Vec<_>) = objects
            .into_iter()
            .partition(|(o, _)| favorites.contains(&o.key));
        objects = favs.into_iter().chain(rest).collect();
    }

    // 7. Emit
    let mut rows = Vec::with_capacity(prefixes.len() + objects.len());
    rows.extend(prefixes.into_iter().map(|p| Row::Prefix {
        prefix: p.to_string(),
    }));
    rows.extend(objects.into_iter().map(|(o, _)| Row::Object { object: o.clone() }));
    rows
}

/// Union of common prefixes and concatenation of items across pages, deduplicated.
///
/// The folder marker object for the browsed prefix itself, and any object whose
/// key collides with a listed prefix, are dropped so ids stay unique.
fn collect_pages<'a>(prefix: &str, pages: &'a [ListingPage]) -> (Vec<&'a str>, Vec<&'a ObjectItem>) {
    let mut seen_prefixes: HashSet<&str> = HashSet::new();
    let prefixes: Vec<&str> = pages
        .iter()
        .flat_map(|p| p.common_prefixes.iter())
        .map(String::as_str)
        .filter(|p| !p.is_empty() && *p != prefix)
        .filter(|p| seen_prefixes.insert(*p))
        .collect();

    let mut seen_keys: HashSet<&str> = HashSet::new();
    let objects: Vec<&ObjectItem> = pages
        .iter()
        .flat_map(|p| p.items.iter())
        .filter(|o| !(o.key == prefix && !prefix.is_empty()))
        .filter(|o| !seen_prefixes.contains(o.key.as_str()))
        .filter(|o| seen_keys.insert(o.key.as_str()))
        .collect();

    (prefixes, objects)
}

/// Object-level structured filters with bounds already corrected.
struct ObjectFilter {
    ext: String,
    min_size: Option<u64>,
    max_size: Option<u64>,
    min_ms: Option<i64>,
    max_ms: Option<i64>,
}

impl ObjectFilter {
    fn new(filter: &FilterState) -> Self {
        let (min_size, max_size) = filter.size_bounds();
        let (min_ms, max_ms) = filter.time_bounds();
        Self {
            ext: keys::normalize_extension(&filter.ext_filter),
            min_size,
            max_size,
            min_ms,
            max_ms,
        }
    }

    fn accepts(&self, object: &ObjectItem, modified_ms: Option<i64>) -> bool {
        if !self.ext.is_empty() && keys::extension(&object.key).as_deref() != Some(self.ext.as_str()) {
            return false;
        }
        if self.min_size.is_some_and(|min| object.size < min) {
            return false;
        }
        if self.max_size.is_some_and(|max| object.size > max) {
            return false;
        }
        if self.min_ms.is_none() && self.max_ms.is_none() {
            return true;
        }
        let Some(modified) = modified_ms else {
            return false;
        };
        self.min_ms.is_none_or(|min| modified >= min) && self.max_ms.is_none_or(|max| modified <= max)
    }
}

fn apply_dir(ord: Ordering, dir: SortDir) -> Ordering {
    match dir {
        SortDir::Asc => ord,
        SortDir::Desc => ord.reverse(),
    }
}

/// Requested key in the requested direction, then key ascending as a tiebreak.
fn compare_objects(
    (a, a_ms): &(&ObjectItem, Option<i64>),
    (b, b_ms): &(&ObjectItem, Option<i64>),
    sort: Sort,
) -> Ordering {
    let primary = match sort.key {
        SortKey::Name => a.key.cmp(&b.key),
        SortKey::Size => a.size.cmp(&b.size),
        SortKey::Time => a_ms.cmp(b_ms),
    };
    apply_dir(primary, sort.dir).then_with(|| a.key.cmp(&b.key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FavoriteObject;
    use pretty_assertions::assert_eq;

    fn obj(key: &str, size: u64, modified: &str) -> ObjectItem {
        ObjectItem::new(key, size, modified)
    }

    fn page(prefixes: &[&str], items: Vec<ObjectItem>) -> ListingPage {
        ListingPage {
            prefix: "docs/".to_string(),
            delimiter: "/".to_string(),
            common_prefixes: prefixes.iter().map(|s| s.to_string()).collect(),
            items,
            ..Default::default()
        }
    }

    fn favs(keys: &[&str]) -> FavoriteSet {
        FavoriteSet::new(
            keys.iter()
                .map(|k| FavoriteObject {
                    object: obj(k, 1, "2024-01-01T00:00:00Z"),
                    created_at: String::new(),
                })
                .collect(),
        )
    }

    fn ids(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(Row::id).collect()
    }

    fn derive(pages: &[ListingPage], favorites: &FavoriteSet, filter: &FilterState, query: &str) -> Vec<Row> {
        let search = SearchQuery::parse(query);
        derive_rows(&RowInputs {
            prefix: "docs/",
            pages,
            favorites,
            filter,
            search: &search,
        })
    }

    fn sample_pages() -> Vec<ListingPage> {
        vec![
            page(
                &["docs/b/", "docs/a/"],
                vec![
                    obj("docs/", 0, "2024-01-01T00:00:00Z"),
                    obj("docs/c.txt", 300, "2024-03-01T00:00:00Z"),
                    obj("docs/a.pdf", 150, "2024-01-15T00:00:00Z"),
                ],
            ),
            page(
                &["docs/a/"],
                vec![
                    obj("docs/b.PDF", 100, "2024-02-01T00:00:00Z"),
                    obj("docs/a.pdf", 150, "2024-01-15T00:00:00Z"),
                ],
            ),
        ]
    }

    #[test]
    fn test_prefixes_then_objects_deduplicated() {
        let rows = derive(&sample_pages(), &FavoriteSet::default(), &FilterState::default(), "");
        assert_eq!(
            ids(&rows),
            vec!["docs/a/", "docs/b/", "docs/a.pdf", "docs/b.PDF", "docs/c.txt"]
        );
    }

    #[test]
    fn test_sort_by_size_desc_and_prefix_direction() {
        let filter = FilterState {
            sort: Sort::new(SortKey::Size, SortDir::Desc),
            ..Default::default()
        };
        let rows = derive(&sample_pages(), &FavoriteSet::default(), &filter, "");
        assert_eq!(
            ids(&rows),
            vec!["docs/b/", "docs/a/", "docs/c.txt", "docs/a.pdf", "docs/b.PDF"]
        );
    }

    #[test]
    fn test_sort_by_time() {
        let filter = FilterState {
            sort: Sort::new(SortKey::Time, SortDir::Asc),
            type_filter: TypeFilter::Files,
            ..Default::default()
        };
        let rows = derive(&sample_pages(), &FavoriteSet::default(), &filter, "");
        assert_eq!(ids(&rows), vec!["docs/a.pdf", "docs/b.PDF", "docs/c.txt"]);
    }

    #[test]
    fn test_size_tiebreak_is_key() {
        let pages = vec![page(&[], vec![obj("docs/z", 5, ""), obj("docs/m", 5, ""), obj("docs/a", 5, "")])];
        let filter = FilterState {
            sort: Sort::new(SortKey::Size, SortDir::Desc),
            ..Default::default()
        };
        let rows = derive(&pages, &FavoriteSet::default(), &filter, "");
        assert_eq!(ids(&rows), vec!["docs/a", "docs/m", "docs/z"]);
    }

    #[test]
    fn test_extension_filter_case_insensitive_with_dot() {
        let filter = FilterState {
            ext_filter: ".pdf".to_string(),
            ..Default::default()
        };
        let rows = derive(&sample_pages(), &FavoriteSet::default(), &filter, "");
        assert_eq!(
            ids(&rows),
            vec!["docs/a/", "docs/b/", "docs/a.pdf", "docs/b.PDF"]
        );
    }

    #[test]
    fn test_extensionless_objects_never_match_extension_filter() {
        let pages = vec![page(&[], vec![obj("docs/README", 1, ""), obj("docs/pdf", 1, "")])];
        let filter = FilterState {
            ext_filter: "pdf".to_string(),
            ..Default::default()
        };
        assert!(derive(&pages, &FavoriteSet::default(), &filter, "").is_empty());
    }

    #[test]
    fn test_size_bounds_inclusive_and_inversion() {
        let filter = FilterState {
            min_size: Some(100),
            max_size: Some(150),
            type_filter: TypeFilter::Files,
            ..Default::default()
        };
        let inverted = FilterState {
            min_size: Some(150),
            max_size: Some(100),
            ..filter.clone()
        };
        let rows = derive(&sample_pages(), &FavoriteSet::default(), &filter, "");
        assert_eq!(ids(&rows), vec!["docs/a.pdf", "docs/b.PDF"]);
        assert_eq!(rows, derive(&sample_pages(), &FavoriteSet::default(), &inverted, ""));
    }

    #[test]
    fn test_time_bounds_exclude_unparseable() {
        let pages = vec![page(
            &[],
            vec![
                obj("docs/old", 1, "2023-01-01T00:00:00Z"),
                obj("docs/new", 1, "2024-06-01T00:00:00Z"),
                obj("docs/unknown", 1, "not a date"),
            ],
        )];
        let min = obj("", 0, "2024-01-01T00:00:00Z").last_modified_ms();
        let filter = FilterState {
            min_modified_ms: min,
            ..Default::default()
        };
        let rows = derive(&pages, &FavoriteSet::default(), &filter, "");
        assert_eq!(ids(&rows), vec!["docs/new"]);

        let unbounded = derive(&pages, &FavoriteSet::default(), &FilterState::default(), "");
        assert_eq!(unbounded.len(), 3);
    }

    #[test]
    fn test_type_filter() {
        let folders = FilterState {
            type_filter: TypeFilter::Folders,
            ..Default::default()
        };
        let rows = derive(&sample_pages(), &FavoriteSet::default(), &folders, "");
        assert!(rows.iter().all(Row::is_prefix));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_search_on_display_name_and_key() {
        let rows = derive(&sample_pages(), &FavoriteSet::default(), &FilterState::default(), "a");
        assert_eq!(ids(&rows), vec!["docs/a/", "docs/a.pdf"]);

        let by_key = derive(&sample_pages(), &FavoriteSet::default(), &FilterState::default(), "docs/c");
        assert_eq!(ids(&by_key), vec!["docs/c.txt"]);
    }

    #[test]
    fn test_object_outside_prefix_matches_on_raw_key() {
        let pages = vec![page(&[], vec![obj("elsewhere/report.pdf", 1, "")])];
        let rows = derive(&pages, &FavoriteSet::default(), &FilterState::default(), "elsewhere");
        assert_eq!(ids(&rows), vec!["elsewhere/report.pdf"]);
    }

    #[test]
    fn test_favorites_first_preserves_partition_order() {
        let pages = vec![page(&[], vec![obj("docs/a", 1, ""), obj("docs/b", 1, ""), obj("docs/c", 1, "")])];
        let filter = FilterState {
            favorites_first: true,
            ..Default::default()
        };
        let rows = derive(&pages, &favs(&["docs/b"]), &filter, "");
        assert_eq!(ids(&rows), vec!["docs/b", "docs/a", "docs/c"]);
    }

    #[test]
    fn test_favorites_only_uses_favorites_under_prefix() {
        let filter = FilterState {
            favorites_only: true,
            ..Default::default()
        };
        let rows = derive(
            &sample_pages(),
            &favs(&["docs/z.md", "docs/deep/y.md", "other/x.md"]),
            &filter,
            "",
        );
        assert_eq!(ids(&rows), vec!["docs/deep/y.md", "docs/z.md"]);
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let filter = FilterState {
            favorites_first: true,
            sort: Sort::new(SortKey::Size, SortDir::Desc),
            ..Default::default()
        };
        let favorites = favs(&["docs/c.txt"]);
        let first = derive(&sample_pages(), &favorites, &filter, "doc");
        let second = derive(&sample_pages(), &favorites, &filter, "doc");
        assert_eq!(first, second);
    }
}
