//! Post URL normalization, applied before any network access.

use serde::{Deserialize, Serialize};

/// What to do with a trailing `/` on the post path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TrailingSlash {
    /// Remove one trailing slash
    #[default]
    Strip,
    /// Make sure the URL ends with a slash
    Enforce,
}

/// Trim whitespace, drop the query string (and fragment), apply the slash policy.
pub fn normalize_url(raw: &str, policy: TrailingSlash) -> String {
    let trimmed = raw.trim();
    let end = trimmed.find(['?', '#']).unwrap_or(trimmed.len());
    let base = &trimmed[..end];

    match policy {
        TrailingSlash::Strip => base.strip_suffix('/').unwrap_or(base).to_string(),
        TrailingSlash::Enforce if base.ends_with('/') || base.is_empty() => base.to_string(),
        TrailingSlash::Enforce => format!("{base}/"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_query_and_slash() {
        let url = "  https://www.instagram.com/p/C8X9Y2Z1ABC/?igsh=abc123&utm_source=x \n";
        assert_eq!(
            normalize_url(url, TrailingSlash::Strip),
            "https://www.instagram.com/p/C8X9Y2Z1ABC"
        );
    }

    #[test]
    fn test_enforce_slash() {
        assert_eq!(
            normalize_url("https://www.instagram.com/p/ABC?x=1", TrailingSlash::Enforce),
            "https://www.instagram.com/p/ABC/"
        );
        assert_eq!(
            normalize_url("https://www.instagram.com/p/ABC/", TrailingSlash::Enforce),
            "https://www.instagram.com/p/ABC/"
        );
    }

    #[test]
    fn test_fragment_dropped() {
        assert_eq!(
            normalize_url("https://www.instagram.com/p/ABC/#comments", TrailingSlash::Strip),
            "https://www.instagram.com/p/ABC"
        );
    }

    #[test]
    fn test_never_fails_on_garbage() {
        assert_eq!(normalize_url("   ", TrailingSlash::Strip), "");
        assert_eq!(normalize_url("?only=query", TrailingSlash::Enforce), "");
        assert_eq!(normalize_url("not a url/", TrailingSlash::Strip), "not a url");
    }
}
