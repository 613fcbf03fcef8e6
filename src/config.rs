//! Runtime configuration shared by the fetchers and the extraction cascade.

use std::path::PathBuf;
use std::time::Duration;

use crate::normalize::TrailingSlash;

/// Substring every accepted image URL must contain (the media CDN host).
pub const DEFAULT_SIGNATURE: &str = "scontent";

/// Global the page assigns its embedded state to (`window._sharedData = {...};`).
pub const DEFAULT_STATE_VARIABLE: &str = "_sharedData";

pub const DEFAULT_TITLE: &str = "Instagram Carousel";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                                      AppleWebKit/537.36 (KHTML, like Gecko) \
                                      Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_REFERER: &str = "https://www.instagram.com/";

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Domain-fragment signature used to filter candidates
    pub signature: String,
    /// Name of the `window.*` global holding embedded state
    pub state_variable: String,
    /// Title used when the page carries no `og:title`
    pub default_title: String,
    /// Upper bound for a single fetch attempt (either tier)
    pub timeout: Duration,
    /// Extra wait after the rendered page has loaded
    pub settle_delay: Duration,
    pub trailing_slash: TrailingSlash,
    pub user_agent: String,
    pub referer: String,
    /// Try the headless browser tier before the static fetch
    pub render: bool,
    /// Chromium binary; auto-detected when `None`
    pub chromium_path: Option<PathBuf>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            signature: DEFAULT_SIGNATURE.to_string(),
            state_variable: DEFAULT_STATE_VARIABLE.to_string(),
            default_title: DEFAULT_TITLE.to_string(),
            timeout: Duration::from_secs(30),
            settle_delay: Duration::from_millis(3000),
            trailing_slash: TrailingSlash::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            render: true,
            chromium_path: None,
        }
    }
}

impl ScraperConfig {
    /// Headers both fetch tiers send, emulating a desktop browser navigation.
    pub fn request_headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("user-agent", self.user_agent.clone()),
            (
                "accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                    .to_string(),
            ),
            ("accept-language", "en-US,en;q=0.9".to_string()),
            ("accept-encoding", "gzip, deflate, br".to_string()),
            ("dnt", "1".to_string()),
            ("connection", "keep-alive".to_string()),
            ("upgrade-insecure-requests", "1".to_string()),
            ("sec-fetch-dest", "document".to_string()),
            ("sec-fetch-mode", "navigate".to_string()),
            ("sec-fetch-site", "none".to_string()),
            ("cache-control", "max-age=0".to_string()),
            ("referer", self.referer.clone()),
        ]
    }
}
