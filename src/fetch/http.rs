//! Static fetch tier: one blocking GET with browser-like headers.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, info};

use super::{FetchTier, PageFetcher, RawPage};
use crate::config::ScraperConfig;
use crate::error::FetchError;

/// Blocking HTTP fetcher. The client (and its default headers) is built once
/// and reused for every request.
pub struct HttpFetcher {
    client: Client,
    timeout: std::time::Duration,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        for (name, value) in config.request_headers() {
            let header_value = HeaderValue::from_str(&value)
                .map_err(|_| FetchError::Header { name, value: value.clone() })?;
            headers.insert(HeaderName::from_static(name), header_value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }
}

impl PageFetcher for HttpFetcher {
    fn tier(&self) -> FetchTier {
        FetchTier::Static
    }

    fn fetch(&self, url: &str) -> Result<RawPage, FetchError> {
        info!(url, "fetching page");

        let request_error = |source: reqwest::Error| {
            if source.is_timeout() {
                FetchError::Timeout(self.timeout)
            } else {
                FetchError::Request {
                    url: url.to_string(),
                    source,
                }
            }
        };

        let response = self.client.get(url).send().map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().map_err(request_error)?;
        debug!(len = html.len(), "received HTML");

        Ok(RawPage::new(url, html))
    }
}
