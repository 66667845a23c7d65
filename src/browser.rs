use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::LoaderId;
use chromiumoxide::cdp::browser_protocol::page::{
    AddScriptToEvaluateOnNewDocumentParams, EventLifecycleEvent, FrameId, NavigateParams,
    SetLifecycleEventsEnabledParams,
};
use chromiumoxide::handler::viewport::Viewport;
use futures::StreamExt;
use std::path::Path;
use tempfile::TempDir;
use url::Url;

use crate::config::DynamicFetchConfig;
use crate::fetcher::{FetchedPage, HtmlFetcher};

/// Injected before any page script runs
pub const HIDE_WEBDRIVER_SCRIPT: &str = r#"
Object.defineProperty(navigator, 'webdriver', {
    get: () => false,
    configurable: true,
});
"#;

/// Lifecycle event Chromium emits once a frame has had no network activity
/// for 500ms.
const NETWORK_IDLE: &str = "networkIdle";

/// The document a navigation committed, used to pick its lifecycle events
/// out of those for about:blank and child frames.
#[derive(Debug, Clone)]
struct NavigationTarget {
    frame_id: FrameId,
    loader_id: Option<LoaderId>,
}

impl NavigationTarget {
    fn is_network_idle(&self, event: &EventLifecycleEvent) -> bool {
        event.name == NETWORK_IDLE
            && event.frame_id == self.frame_id
            && self
                .loader_id
                .as_ref()
                .map_or(true, |loader_id| *loader_id == event.loader_id)
    }
}

/// Fresh profile directory for one browser launch, removed on drop.
fn profile_dir() -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix("page-analyzer-profile-")
        .tempdir()
        .context("Failed to create browser profile directory")
}

/// Renders a page in headless Chromium so client-side markup is included.
///
/// Each fetch launches its own browser with its own throwaway profile and
/// tears both down again before returning, whether rendering succeeded or
/// not. No cookies, cache or storage carry over between fetches.
pub struct DynamicFetcher {
    config: DynamicFetchConfig,
}

impl DynamicFetcher {
    pub fn new(config: DynamicFetchConfig) -> Self {
        Self { config }
    }

    fn browser_config(&self, profile: &Path) -> Result<BrowserConfig> {
        let mut args = self.config.launch_args.clone();
        args.push(format!("--user-agent={}", self.config.user_agent));

        BrowserConfig::builder()
            .window_size(self.config.viewport_width, self.config.viewport_height)
            .viewport(Viewport {
                width: self.config.viewport_width,
                height: self.config.viewport_height,
                ..Viewport::default()
            })
            .user_data_dir(profile)
            .args(args)
            .build()
            .map_err(|e| anyhow!("Invalid browser configuration: {}", e))
    }

    async fn render(&self, browser: &Browser, url: &Url) -> Result<String> {
        let page = browser
            .new_page("about:blank")
            .await
            .context("Failed to open browser tab")?;

        if self.config.hide_webdriver {
            page.evaluate_on_new_document(AddScriptToEvaluateOnNewDocumentParams::new(
                HIDE_WEBDRIVER_SCRIPT,
            ))
            .await
            .context("Failed to install webdriver override")?;
        }

        let mut lifecycle = page
            .event_listener::<EventLifecycleEvent>()
            .await
            .context("Failed to subscribe to lifecycle events")?;
        page.execute(SetLifecycleEventsEnabledParams::new(true))
            .await
            .context("Failed to enable lifecycle events")?;

        let navigation = page
            .execute(NavigateParams::new(url.as_str()))
            .await
            .context("Navigation failed")?;
        if let Some(error) = &navigation.result.error_text {
            anyhow::bail!("Navigation failed: {}", error);
        }
        let target = NavigationTarget {
            frame_id: navigation.result.frame_id.clone(),
            loader_id: navigation.result.loader_id.clone(),
        };

        while let Some(event) = lifecycle.next().await {
            if target.is_network_idle(&event) {
                return page.content().await.context("Failed to read rendered HTML");
            }
        }

        Err(anyhow!("Browser closed before {} reached network idle", url))
    }
}

#[async_trait]
impl HtmlFetcher for DynamicFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let target = Url::parse(url).with_context(|| format!("Invalid URL: {}", url))?;
        let timeout = self.config.timeout();

        log::debug!("Rendering {} in headless browser", target);

        let profile = profile_dir()?;
        let (mut browser, mut handler) = Browser::launch(self.browser_config(profile.path())?)
            .await
            .context("Failed to launch browser")?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let rendered = match tokio::time::timeout(timeout, self.render(&browser, &target)).await {
            Ok(result) => result,
            Err(_) => Err(anyhow!("Timed out after {}s rendering {}", timeout.as_secs(), target)),
        };

        if let Err(e) = browser.close().await {
            log::debug!("Failed to close browser cleanly: {}", e);
        }
        if let Err(e) = browser.wait().await {
            log::debug!("Failed to wait for browser exit: {}", e);
        }
        handler_task.abort();
        // the profile must outlive the browser process
        drop(profile);

        Ok(FetchedPage {
            html: rendered?,
            final_url: url.to_string(),
        })
    }
}
