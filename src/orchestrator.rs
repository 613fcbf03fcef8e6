//! Tiered fetch-and-extract
//!
//! A post is tried with the rendered browser first, then with a plain HTTP
//! fetch. Each tier either produces at least one image or fails with a typed
//! reason; only exhaustion of both tiers becomes a failure result.

use tracing::{info, warn};

use crate::aggregate::{aggregate, Aggregation};
use crate::config::ScraperConfig;
use crate::error::FetchError;
use crate::extractors::extract_title;
use crate::fetch::{BrowserFetcher, FetchTier, HttpFetcher, PageFetcher, RawPage};
use crate::normalize::normalize_url;
use crate::result::{build_result, ExtractionResult, NO_IMAGES_ERROR};

enum Stage {
    Rendered,
    Static,
    Done(ExtractionResult),
}

/// Why a tier produced no result.
#[derive(Debug)]
pub enum TierFailure {
    Fetch(FetchError),
    NoImages,
}

pub struct Scraper {
    config: ScraperConfig,
    renderer: Option<Box<dyn PageFetcher>>,
    fetcher: Box<dyn PageFetcher>,
}

impl Scraper {
    pub fn new(
        config: ScraperConfig,
        renderer: Option<Box<dyn PageFetcher>>,
        fetcher: Box<dyn PageFetcher>,
    ) -> Self {
        Self {
            config,
            renderer,
            fetcher,
        }
    }

    /// Headless Chromium (unless disabled) backed by a static HTTP fetch.
    pub fn from_config(config: ScraperConfig) -> Result<Self, FetchError> {
        let fetcher = Box::new(HttpFetcher::new(&config)?);
        let renderer: Option<Box<dyn PageFetcher>> = if config.render {
            Some(Box::new(BrowserFetcher::new(&config)))
        } else {
            None
        };
        Ok(Self::new(config, renderer, fetcher))
    }

    pub fn scrape(&self, url: &str) -> ExtractionResult {
        let url = normalize_url(url, self.config.trailing_slash);
        info!(url = %url, "scraping carousel");

        let mut stage = Stage::Rendered;
        loop {
            stage = match stage {
                Stage::Rendered => match &self.renderer {
                    Some(renderer) => match self.run_tier(renderer.as_ref(), &url) {
                        Ok(result) => Stage::Done(result),
                        Err(failure) => {
                            warn!(?failure, "rendered tier failed, falling back to static fetch");
                            Stage::Static
                        }
                    },
                    None => Stage::Static,
                },
                Stage::Static => match self.run_tier(self.fetcher.as_ref(), &url) {
                    Ok(result) => Stage::Done(result),
                    Err(TierFailure::NoImages) => {
                        Stage::Done(ExtractionResult::failure(NO_IMAGES_ERROR))
                    }
                    Err(TierFailure::Fetch(e)) => {
                        warn!(error = %e, "static tier failed");
                        Stage::Done(ExtractionResult::failure(format!(
                            "Failed to scrape carousel: {e}"
                        )))
                    }
                },
                Stage::Done(result) => return result,
            };
        }
    }

    fn run_tier(
        &self,
        fetcher: &dyn PageFetcher,
        url: &str,
    ) -> Result<ExtractionResult, TierFailure> {
        let tier = fetcher.tier();
        let page = fetcher.fetch(url).map_err(TierFailure::Fetch)?;
        info!(%tier, len = page.html.len(), "page fetched");

        let title = extract_title(&page.html).unwrap_or_else(|| self.config.default_title.clone());
        info!(%tier, title = %title, "extracted title");

        let Aggregation {
            images,
            raw_candidates,
        } = aggregate(&page, &self.config);
        info!(%tier, count = images.len(), "unique valid images found");

        if images.is_empty() {
            self.log_diagnostics(tier, &page, raw_candidates);
            return Err(TierFailure::NoImages);
        }

        Ok(build_result(images, &title))
    }

    fn log_diagnostics(&self, tier: FetchTier, page: &RawPage, raw_candidates: usize) {
        warn!(
            %tier,
            raw_candidates,
            has_signature = page.html.contains(&self.config.signature),
            mentions_site = page.html.to_lowercase().contains("instagram"),
            "no valid images found"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::MediaKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Serves canned HTML (or an error) and records every requested URL.
    struct CannedFetcher {
        tier: FetchTier,
        html: Option<&'static str>,
        requests: RefCell<Vec<String>>,
    }

    impl CannedFetcher {
        fn new(tier: FetchTier, html: Option<&'static str>) -> Self {
            Self {
                tier,
                html,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl PageFetcher for Rc<CannedFetcher> {
        fn tier(&self) -> FetchTier {
            self.tier
        }

        fn fetch(&self, url: &str) -> Result<RawPage, FetchError> {
            self.requests.borrow_mut().push(url.to_string());
            match self.html {
                Some(html) => {
                    let mut page = RawPage::new(url, html);
                    page.tier = self.tier;
                    Ok(page)
                }
                None => Err(FetchError::Status {
                    url: url.to_string(),
                    status: 503,
                }),
            }
        }
    }

    fn build_scraper(
        rendered: Option<Option<&'static str>>,
        fetched: Option<&'static str>,
    ) -> (Scraper, Option<Rc<CannedFetcher>>, Rc<CannedFetcher>) {
        let renderer = rendered.map(|html| Rc::new(CannedFetcher::new(FetchTier::Rendered, html)));
        let fetcher = Rc::new(CannedFetcher::new(FetchTier::Static, fetched));
        let scraper = Scraper::new(
            ScraperConfig::default(),
            renderer.clone().map(|r| Box::new(r) as Box<dyn PageFetcher>),
            Box::new(fetcher.clone()),
        );
        (scraper, renderer, fetcher)
    }

    const CAROUSEL: &str = r#"
        <meta property="og:title" content="Two photos">
        <script>{"display_url":"https://scontent.x/b.jpg"}</script>
        <script type="application/ld+json">{"image": "https://scontent.x/a.jpg"}</script>
    "#;

    const EMPTY_SHELL: &str = r#"<html><body><div id="root"></div></body></html>"#;

    #[test]
    fn test_rendered_tier_success_skips_static() {
        let (scraper, renderer, fetcher) = build_scraper(Some(Some(CAROUSEL)), Some(EMPTY_SHELL));

        let result = scraper.scrape("https://www.instagram.com/p/ABC/?igsh=1");

        assert!(result.success);
        let data = result.data.unwrap();
        assert_eq!(data.kind, MediaKind::Carousel);
        assert_eq!(data.title, "Two photos");
        assert_eq!(
            data.images,
            Some(vec![
                "https://scontent.x/a.jpg".to_string(),
                "https://scontent.x/b.jpg".to_string(),
            ])
        );
        assert_eq!(data.url, "https://scontent.x/a.jpg");
        assert_eq!(
            renderer.unwrap().requests.borrow().as_slice(),
            ["https://www.instagram.com/p/ABC"]
        );
        assert!(fetcher.requests.borrow().is_empty());
    }

    #[test]
    fn test_empty_render_falls_back_to_static() {
        let (scraper, renderer, fetcher) = build_scraper(Some(Some(EMPTY_SHELL)), Some(CAROUSEL));

        let result = scraper.scrape("https://www.instagram.com/p/ABC/");

        assert!(result.success);
        assert_eq!(renderer.unwrap().requests.borrow().len(), 1);
        assert_eq!(fetcher.requests.borrow().len(), 1);
    }

    #[test]
    fn test_render_error_falls_back_to_static() {
        let (scraper, _, fetcher) = build_scraper(Some(None), Some(CAROUSEL));

        let result = scraper.scrape("https://www.instagram.com/p/ABC/");

        assert!(result.success);
        assert_eq!(fetcher.requests.borrow().len(), 1);
    }

    #[test]
    fn test_both_tiers_empty() {
        let (scraper, _, _) = build_scraper(Some(Some(EMPTY_SHELL)), Some(EMPTY_SHELL));

        let result = scraper.scrape("https://www.instagram.com/p/ABC/");

        assert!(!result.success);
        assert!(result.data.is_none());
        assert_eq!(result.error.as_deref(), Some(NO_IMAGES_ERROR));
    }

    #[test]
    fn test_static_fetch_error_is_reported() {
        let (scraper, _, _) = build_scraper(None, None);

        let result = scraper.scrape("https://www.instagram.com/p/ABC/");

        assert!(!result.success);
        let error = result.error.unwrap();
        assert!(error.starts_with("Failed to scrape carousel:"), "{error}");
        assert!(error.contains("503"), "{error}");
    }

    #[test]
    fn test_default_title_without_og_title() {
        let html = r#"<script>{"display_url":"https://scontent.x/a.jpg"}</script>"#;
        let (scraper, _, _) = build_scraper(None, Some(html));

        let result = scraper.scrape("https://www.instagram.com/p/ABC/");

        let data = result.data.unwrap();
        assert_eq!(data.kind, MediaKind::Image);
        assert_eq!(data.title, "Instagram Carousel");
        assert!(data.images.is_none());
    }
}
