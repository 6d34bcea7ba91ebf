//! Object key and prefix helpers.
//!
//! # Conventions
//!
//! - Root prefix: empty string `""`
//! - Any other prefix: no leading slash, exactly one trailing slash (`"photos/2024/"`)
//! - Object keys are opaque and never normalized

use crate::error::ValidationError;

/// Normalize a prefix: trim, strip leading slashes, enforce a trailing slash.
///
/// The root is represented by the empty string.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_start_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }
    let mut out = trimmed.trim_end_matches('/').to_string();
    if out.is_empty() {
        return String::new();
    }
    out.push('/');
    out
}

/// Display name of a key relative to the prefix being browsed.
///
/// Keys outside `prefix` are returned unchanged.
pub fn display_name<'a>(key: &'a str, prefix: &str) -> &'a str {
    match key.strip_prefix(prefix) {
        Some(rest) if !rest.is_empty() => rest,
        _ => key,
    }
}

/// Display name of a common prefix relative to the browsed prefix, without the trailing slash.
pub fn prefix_display_name<'a>(common_prefix: &'a str, prefix: &str) -> &'a str {
    display_name(common_prefix, prefix).trim_end_matches('/')
}

/// Last path segment of a prefix (`"a/b/"` -> `"b"`).
pub fn folder_name(prefix: &str) -> &str {
    let trimmed = prefix.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Parent of a prefix (`"a/b/"` -> `"a/"`, `"a/"` -> `""`).
pub fn parent_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => trimmed[..=idx].to_string(),
        None => String::new(),
    }
}

/// Lowercase extension of a key's last segment, if any.
///
/// Dotfiles (`.env`) and trailing dots have no extension.
pub fn extension(key: &str) -> Option<String> {
    let name = key.rsplit('/').next().unwrap_or(key);
    let idx = name.rfind('.')?;
    if idx == 0 || idx + 1 == name.len() {
        return None;
    }
    Some(name[idx + 1..].to_lowercase())
}

/// Normalize an extension filter: trim, strip leading dots, lowercase.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// Check that a key or prefix is usable as a transfer source or destination.
pub fn validate_key(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if value.contains('*') {
        return Err(ValidationError::Wildcard {
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Like [`validate_key`] but also requires the trailing slash of a non-root prefix.
pub fn validate_prefix(prefix: &str, field: &'static str) -> Result<(), ValidationError> {
    if prefix.contains('*') {
        return Err(ValidationError::Wildcard {
            value: prefix.to_string(),
        });
    }
    if prefix.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if !prefix.ends_with('/') {
        return Err(ValidationError::UnterminatedPrefix {
            prefix: prefix.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix(""), "");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix("  a/b  "), "a/b/");
        assert_eq!(normalize_prefix("/a/b//"), "a/b/");
        assert_eq!(normalize_prefix("a"), "a/");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("docs/readme.md", "docs/"), "readme.md");
        assert_eq!(display_name("other/readme.md", "docs/"), "other/readme.md");
        assert_eq!(display_name("docs/", "docs/"), "docs/");
        assert_eq!(prefix_display_name("docs/img/", "docs/"), "img");
    }

    #[test]
    fn test_folder_and_parent() {
        assert_eq!(folder_name("a/b/"), "b");
        assert_eq!(folder_name("a/"), "a");
        assert_eq!(parent_prefix("a/b/"), "a/");
        assert_eq!(parent_prefix("a/"), "");
        assert_eq!(parent_prefix(""), "");
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("a/photo.JPG").as_deref(), Some("jpg"));
        assert_eq!(extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(extension("a.b/README"), None);
        assert_eq!(extension(".env"), None);
        assert_eq!(extension("trailing."), None);
        assert_eq!(normalize_extension(" .PDF "), "pdf");
    }

    #[test]
    fn test_validation() {
        assert!(validate_key("a/b.txt", "key").is_ok());
        assert_eq!(
            validate_key("  ", "key"),
            Err(ValidationError::Empty { field: "key" })
        );
        assert!(matches!(
            validate_key("a/*.txt", "key"),
            Err(ValidationError::Wildcard { .. })
        ));
        assert!(validate_prefix("a/", "prefix").is_ok());
        assert!(matches!(
            validate_prefix("a", "prefix"),
            Err(ValidationError::UnterminatedPrefix { .. })
        ));
    }
}
