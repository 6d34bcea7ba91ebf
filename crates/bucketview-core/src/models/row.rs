//! Renderable list rows and the browse context they belong to.

use serde::{Deserialize, Serialize};

use super::ObjectItem;
use crate::keys;

/// One renderable list entry. Derived, never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Row {
    /// A virtual folder.
    Prefix { prefix: String },
    /// A stored file.
    Object { object: ObjectItem },
}

impl Row {
    /// Key or prefix identifying this row.
    pub fn id(&self) -> &str {
        match self {
            Self::Prefix { prefix } => prefix,
            Self::Object { object } => &object.key,
        }
    }

    pub fn is_prefix(&self) -> bool {
        matches!(self, Self::Prefix { .. })
    }

    pub fn as_object(&self) -> Option<&ObjectItem> {
        match self {
            Self::Object { object } => Some(object),
            Self::Prefix { .. } => None,
        }
    }

    /// Name shown for this row while browsing `prefix`.
    pub fn display_name<'a>(&'a self, prefix: &str) -> &'a str {
        match self {
            Self::Prefix { prefix: p } => keys::prefix_display_name(p, prefix),
            Self::Object { object } => keys::display_name(&object.key, prefix),
        }
    }
}

/// Ordered object keys of a row sequence (the selection domain).
pub fn object_keys(rows: &[Row]) -> Vec<String> {
    rows.iter()
        .filter_map(Row::as_object)
        .map(|o| o.key.clone())
        .collect()
}

/// The (profile, bucket, prefix) triple that scopes selection and scroll state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrowseContext {
    pub profile_id: String,
    pub bucket: String,
    pub prefix: String,
}

impl BrowseContext {
    pub fn new(
        profile_id: impl Into<String>,
        bucket: impl Into<String>,
        prefix: impl AsRef<str>,
    ) -> Self {
        Self {
            profile_id: profile_id.into(),
            bucket: bucket.into(),
            prefix: keys::normalize_prefix(prefix.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_json_shape() {
        let row = Row::Prefix {
            prefix: "a/".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"kind":"prefix","prefix":"a/"}"#
        );
    }

    #[test]
    fn test_row_display_name() {
        let prefix = Row::Prefix {
            prefix: "docs/img/".to_string(),
        };
        let object = Row::Object {
            object: ObjectItem::new("docs/a.md", 1, ""),
        };
        assert_eq!(prefix.display_name("docs/"), "img");
        assert_eq!(object.display_name("docs/"), "a.md");
        assert_eq!(object.id(), "docs/a.md");
    }

    #[test]
    fn test_browse_context_normalizes_prefix() {
        let ctx = BrowseContext::new("p", "b", "/photos");
        assert_eq!(ctx.prefix, "photos/");
    }
}
