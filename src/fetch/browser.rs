//! Rendered fetch tier using headless Chromium via chromiumoxide.
//!
//! Each call launches a browser on a private Tokio runtime, loads the page,
//! waits for it to settle, then captures both the serialized markup and the
//! JSON-LD blocks of the live document.

use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{Headers, SetExtraHttpHeadersParams};
use futures::StreamExt;
use tracing::{debug, info};

use super::{FetchTier, PageFetcher, RawPage};
use crate::config::ScraperConfig;
use crate::error::FetchError;

const LIVE_JSON_LD_SCRIPT: &str = r#"Array.from(document.querySelectorAll('script[type="application/ld+json"]')).map(s => s.textContent || '')"#;

/// Headers the browser sets on its own (or refuses to override).
const BROWSER_MANAGED_HEADERS: &[&str] = &["user-agent", "accept-encoding", "connection"];

pub struct BrowserFetcher {
    config: ScraperConfig,
}

impl BrowserFetcher {
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn browser_config(&self) -> Result<BrowserConfig, FetchError> {
        let mut builder = BrowserConfig::builder()
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg(format!("--user-agent={}", self.config.user_agent));

        if let Some(path) = &self.config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        builder
            .build()
            .map_err(|e| FetchError::browser("configuration", e))
    }

    async fn render(&self, url: &str) -> Result<RawPage, FetchError> {
        let (mut browser, mut handler) = Browser::launch(self.browser_config()?)
            .await
            .map_err(|e| FetchError::browser("launch", e))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let captured = self.capture(&browser, url).await;

        if let Err(e) = browser.close().await {
            debug!(error = %e, "browser close failed");
        }
        let _ = handler_task.await;

        captured
    }

    async fn capture(&self, browser: &Browser, url: &str) -> Result<RawPage, FetchError> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| FetchError::browser("new page", e))?;

        let extra: serde_json::Map<String, serde_json::Value> = self
            .config
            .request_headers()
            .into_iter()
            .filter(|(name, _)| !BROWSER_MANAGED_HEADERS.contains(name))
            .map(|(name, value)| (name.to_string(), serde_json::Value::String(value)))
            .collect();
        page.execute(SetExtraHttpHeadersParams::new(Headers::new(
            serde_json::Value::Object(extra),
        )))
        .await
        .map_err(|e| FetchError::browser("set headers", e))?;

        page.goto(url)
            .await
            .map_err(|e| FetchError::browser("navigation", e))?;
        // goto already waited for the load event; this only catches client-side redirects
        let _ = page.wait_for_navigation().await;

        tokio::time::sleep(self.config.settle_delay).await;

        let live_json_ld: Vec<String> = page
            .evaluate(LIVE_JSON_LD_SCRIPT)
            .await
            .map_err(|e| FetchError::browser("evaluate", e))?
            .into_value()
            .map_err(|e| FetchError::browser("evaluate", e))?;

        let html = page
            .content()
            .await
            .map_err(|e| FetchError::browser("content", e))?;

        debug!(
            len = html.len(),
            json_ld_blocks = live_json_ld.len(),
            "captured rendered page"
        );

        Ok(RawPage {
            url: url.to_string(),
            html,
            live_json_ld,
            tier: FetchTier::Rendered,
        })
    }
}

impl PageFetcher for BrowserFetcher {
    fn tier(&self) -> FetchTier {
        FetchTier::Rendered
    }

    fn fetch(&self, url: &str) -> Result<RawPage, FetchError> {
        info!(url, "rendering page in headless browser");

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(|e| FetchError::browser("runtime", e))?;

        // The settle delay runs inside the render, so it counts against the budget too.
        let budget: Duration = self.config.timeout + self.config.settle_delay;
        runtime.block_on(async {
            match tokio::time::timeout(budget, self.render(url)).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(budget)),
            }
        })
    }
}
