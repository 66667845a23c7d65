use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use url::Url;

use crate::config::StaticFetchConfig;

/// HTML retrieved for a URL together with the address it was finally served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub html: String,
    pub final_url: String,
}

/// Source of HTML for a URL. Implementations surface every failure as an error
/// and leave recovery to the caller.
#[async_trait]
pub trait HtmlFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

/// Server-rendered fetch over plain HTTP, without running page scripts
pub struct StaticFetcher {
    config: StaticFetchConfig,
}

impl StaticFetcher {
    pub fn new(config: StaticFetchConfig) -> Self {
        Self { config }
    }

    // A client per request: nothing, including pooled connections, outlives one fetch.
    fn client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.config.timeout())
            .redirect(reqwest::redirect::Policy::limited(self.config.max_redirects))
            .user_agent(self.config.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")
    }
}

#[async_trait]
impl HtmlFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let url = Url::parse(url).with_context(|| format!("Invalid URL: {}", url))?;
        log::debug!("Fetching {} over HTTP", url);

        let response = self
            .client()?
            .get(url)
            .header(ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.5")
            .send()
            .await
            .context("Failed to fetch page")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        let final_url = response.url().to_string();
        let html = response.text().await.context("Failed to read response body")?;

        Ok(FetchedPage { html, final_url })
    }
}
