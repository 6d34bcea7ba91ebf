//! Hash-based routing for bucket/prefix navigation.

use bucketview_core::keys;

/// Application routes.
/// URL format: `#/<bucket>/<prefix>` (e.g. `#/media/photos/2024/`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AppRoute {
    /// No bucket selected: `#/` or empty hash.
    #[default]
    Home,
    /// Browsing a prefix of a bucket.
    Browse { bucket: String, prefix: String },
}

impl AppRoute {
    pub fn browse(bucket: impl Into<String>, prefix: &str) -> Self {
        Self::Browse {
            bucket: bucket.into(),
            prefix: keys::normalize_prefix(prefix),
        }
    }

    /// Parse an already percent-decoded URL hash.
    pub fn from_hash(hash: &str) -> Self {
        let path = hash.trim_start_matches('#').trim_start_matches('/');
        let (bucket, prefix) = path.split_once('/').unwrap_or((path, ""));
        if bucket.is_empty() {
            return Self::Home;
        }
        Self::browse(bucket, prefix)
    }

    /// Convert to an unencoded URL hash.
    pub fn to_hash(&self) -> String {
        match self {
            Self::Home => "#/".to_string(),
            Self::Browse { bucket, prefix } => format!("#/{bucket}/{prefix}"),
        }
    }

    pub fn bucket(&self) -> Option<&str> {
        match self {
            Self::Home => None,
            Self::Browse { bucket, .. } => Some(bucket),
        }
    }

    pub fn prefix(&self) -> &str {
        match self {
            Self::Home => "",
            Self::Browse { prefix, .. } => prefix,
        }
    }

    /// Get current route from browser URL.
    pub fn current() -> Self {
        let hash = web_sys::window()
            .and_then(|w| w.location().hash().ok())
            .unwrap_or_default();
        let decoded = js_sys::decode_uri_component(&hash)
            .map(String::from)
            .unwrap_or(hash);
        Self::from_hash(&decoded)
    }

    /// Navigate to this route. The `hashchange` listener picks it up.
    pub fn push(&self) {
        if let Some(window) = web_sys::window() {
            let hash: String = js_sys::encode_uri(&self.to_hash()).into();
            let _ = window.location().set_hash(&hash);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_parsing() {
        assert_eq!(AppRoute::from_hash(""), AppRoute::Home);
        assert_eq!(AppRoute::from_hash("#"), AppRoute::Home);
        assert_eq!(AppRoute::from_hash("#/"), AppRoute::Home);
        assert_eq!(AppRoute::from_hash("#/media"), AppRoute::browse("media", ""));
        assert_eq!(
            AppRoute::from_hash("#/media/photos/2024"),
            AppRoute::Browse {
                bucket: "media".to_string(),
                prefix: "photos/2024/".to_string(),
            }
        );
    }

    #[test]
    fn test_route_to_hash() {
        assert_eq!(AppRoute::Home.to_hash(), "#/");
        assert_eq!(AppRoute::browse("media", "").to_hash(), "#/media/");
        assert_eq!(
            AppRoute::browse("media", "photos/2024/").to_hash(),
            "#/media/photos/2024/"
        );
        let route = AppRoute::browse("media", "a b/");
        assert_eq!(AppRoute::from_hash(&route.to_hash()), route);
    }

    #[test]
    fn test_route_accessors() {
        let route = AppRoute::browse("media", "docs");
        assert_eq!(route.bucket(), Some("media"));
        assert_eq!(route.prefix(), "docs/");
        assert_eq!(AppRoute::Home.bucket(), None);
    }
}
