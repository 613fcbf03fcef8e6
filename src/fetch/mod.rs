//! Page fetching
//!
//! Two interchangeable ways to turn a post URL into HTML: a plain HTTP GET
//! and a headless Chromium render. The extraction cascade only ever sees
//! the resulting [`RawPage`].

pub mod browser;
pub mod http;

pub use browser::BrowserFetcher;
pub use http::HttpFetcher;

use serde::Serialize;

use crate::error::FetchError;

/// Which tier produced a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchTier {
    Rendered,
    Static,
}

impl std::fmt::Display for FetchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchTier::Rendered => f.write_str("rendered"),
            FetchTier::Static => f.write_str("static"),
        }
    }
}

/// A fetched HTML document. Built once by a fetcher and consumed by one
/// extraction pass.
#[derive(Debug, Clone)]
pub struct RawPage {
    pub url: String,
    pub html: String,
    /// `application/ld+json` block texts read from the live document.
    /// Always empty for static fetches.
    pub live_json_ld: Vec<String>,
    pub tier: FetchTier,
}

impl RawPage {
    /// Page from a static fetch (or a canned fixture).
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            live_json_ld: Vec::new(),
            tier: FetchTier::Static,
        }
    }
}

/// URL in, HTML out, fallible.
pub trait PageFetcher {
    fn tier(&self) -> FetchTier;

    fn fetch(&self, url: &str) -> Result<RawPage, FetchError>;
}
