//! Carousel post image extractor
//!
//! Fetches a post page and runs a cascade of independent extractors over it:
//! - embedded `window._sharedData` state (with sidecar children)
//! - regex patterns over the raw markup
//! - OpenGraph / meta tags
//! - JSON-LD (with @graph support)
//!
//! Candidates are pooled, filtered to the media CDN, validated, deduplicated
//! and sorted into an [`ExtractionResult`].

pub mod aggregate;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod normalize;
pub mod orchestrator;
pub mod result;

pub use aggregate::{aggregate, Aggregation};
pub use config::ScraperConfig;
pub use error::{DecodeError, FetchError};
pub use fetch::{PageFetcher, RawPage};
pub use normalize::{normalize_url, TrailingSlash};
pub use orchestrator::Scraper;
pub use result::{build_result, ExtractionResult, MediaData, MediaKind};
