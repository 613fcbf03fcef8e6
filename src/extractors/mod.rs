//! Image URL extraction strategies
//!
//! Each strategy reads the same page independently and returns candidate
//! URLs. None of them fail: a strategy that finds nothing (or cannot decode
//! its source) returns an empty list.

mod jsonld_extractor;
mod opengraph_extractor;
mod pattern_extractor;
mod shared_data_extractor;

pub use jsonld_extractor::*;
pub use opengraph_extractor::*;
pub use pattern_extractor::*;
pub use shared_data_extractor::*;

use serde::Serialize;

use crate::config::ScraperConfig;
use crate::fetch::RawPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Embedded `window._sharedData` state
    SharedData,
    /// Regex patterns over the raw markup
    Patterns,
    /// `og:image` and other meta tags
    MetaTags,
    /// JSON-LD blocks, from markup and live document
    JsonLd,
}

impl Strategy {
    /// Cascade order. Only affects logging; the final list is sorted.
    pub const CASCADE: [Strategy; 4] = [
        Strategy::SharedData,
        Strategy::Patterns,
        Strategy::MetaTags,
        Strategy::JsonLd,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::SharedData => "shared data",
            Strategy::Patterns => "patterns",
            Strategy::MetaTags => "meta tags",
            Strategy::JsonLd => "JSON-LD",
        }
    }

    /// Candidate image URLs this strategy finds in `page`.
    pub fn extract(self, page: &RawPage, config: &ScraperConfig) -> Vec<String> {
        let signature = config.signature.as_str();
        match self {
            Strategy::SharedData => {
                let state = extract_shared_data(&page.html, &config.state_variable);
                extract_carousel_images(state.as_ref())
            }
            Strategy::Patterns => extract_pattern_images(&page.html, signature),
            Strategy::MetaTags => extract_meta_images(&page.html, signature),
            Strategy::JsonLd => {
                let mut images = extract_jsonld_images(&page.html, signature);
                for url in jsonld_images_from_blocks(&page.live_json_ld, signature) {
                    push_unique(&mut images, url);
                }
                images
            }
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Undo JSON string escaping as it appears in inline scripts.
pub fn unescape_url(raw: &str) -> String {
    raw.replace("\\u0026", "&").replace('\\', "")
}

pub(crate) fn push_unique(images: &mut Vec<String>, url: String) {
    if !images.contains(&url) {
        images.push(url);
    }
}
