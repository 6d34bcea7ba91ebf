//! Search query tokenizing and diacritic-insensitive matching.
//!
//! Matching is two-tier: a cheap lowercase substring check first, then a
//! fallback on normalized text (NFKD, combining marks removed, punctuation
//! and whitespace stripped). That lets `"cafe"` find `"Café"` and
//! `"cafe report"` find `"cafe_report_final.pdf"`.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Runs of anything that is not a letter or a number.
static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("static pattern is valid"));

/// Split a free-text query into lowercase tokens.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

/// Normalize text for the fallback match.
pub fn normalize(value: &str) -> String {
    let decomposed: String = value
        .to_lowercase()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    NON_ALNUM.replace_all(&decomposed, "").into_owned()
}

/// Check a value against tokens (logical AND over tokens).
///
/// `normalized_tokens` must be `tokens` passed through [`normalize`], index for index.
/// An empty token list always matches.
pub fn matches(value: &str, tokens: &[String], normalized_tokens: &[String]) -> bool {
    if tokens.is_empty() {
        return true;
    }
    let lower = value.to_lowercase();
    // Normalized form is only computed when a raw check misses.
    let mut normalized_value: Option<String> = None;

    tokens.iter().enumerate().all(|(i, token)| {
        if lower.contains(token.as_str()) {
            return true;
        }
        let Some(norm_token) = normalized_tokens.get(i) else {
            return false;
        };
        if norm_token.is_empty() {
            return false;
        }
        normalized_value
            .get_or_insert_with(|| normalize(value))
            .contains(norm_token.as_str())
    })
}

/// A parsed search query with its normalized tokens precomputed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    tokens: Vec<String>,
    normalized: Vec<String>,
}

impl SearchQuery {
    /// Parse a free-text query.
    pub fn parse(query: &str) -> Self {
        let tokens = tokenize(query);
        let normalized = tokens.iter().map(|t| normalize(t)).collect();
        Self {
            raw: query.trim().to_string(),
            tokens,
            normalized,
        }
    }

    /// The trimmed query text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Check a single value.
    pub fn matches(&self, value: &str) -> bool {
        matches(value, &self.tokens, &self.normalized)
    }

    /// Check whether any of several values matches.
    pub fn matches_any<'a>(&self, values: impl IntoIterator<Item = &'a str>) -> bool {
        if self.is_empty() {
            return true;
        }
        values.into_iter().any(|v| self.matches(v))
    }
}
