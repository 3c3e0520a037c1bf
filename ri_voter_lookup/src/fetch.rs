//! Downloading lookup pages.

use anyhow::Context;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use url::Url;
use crate::config::Config;

/// Something that can GET a page and return its body. The run loop only ever has one call outstanding.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    async fn fetch_page(&self,url:&Url) -> anyhow::Result<String>;
}

/// Fetches over HTTPS with polite headers.
pub struct HttpFetcher {
    client : Client,
}

impl HttpFetcher {
    pub fn new(config:&Config) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent).context("user_agent in config is not a valid header value")?);
        headers.insert(ACCEPT, HeaderValue::from_static("text/html"));
        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(HttpFetcher { client: builder.build()? })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self,url:&Url) -> anyhow::Result<String> {
        let response = self.client.get(url.clone())
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}
