use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::browser::DynamicFetcher;
use crate::config::AnalyzerConfig;
use crate::dom::{Dom, HtmlDocument};
use crate::elements::{extract_elements, ElementBucket};
use crate::fetcher::{FetchedPage, HtmlFetcher, StaticFetcher};
use crate::metadata::{extract_metadata, Metadata};
use crate::page_type::{classify, PageType};
use crate::sections::{detect_sections, Section};

/// Per-call switches for [`PageAnalyzer::analyze`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeOptions {
    /// Render the page in a headless browser before analysing it
    #[serde(default)]
    pub dynamic: bool,
}

/// Everything learned about one page. Always fully populated; the default
/// value is the result reported when analysis fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub page_type: PageType,
    pub sections: Vec<Section>,
    pub elements: ElementBucket,
    pub metadata: Metadata,
}

/// Run all four detectors over an already parsed document
pub fn analyze_document<D: Dom>(doc: &D, url: Option<&str>) -> AnalysisResult {
    let page_type = classify(doc);
    let sections = detect_sections(doc);
    log::debug!("Classified as {} with {} section(s)", page_type, sections.len());

    AnalysisResult {
        page_type,
        sections,
        elements: extract_elements(doc),
        metadata: extract_metadata(doc, url),
    }
}

/// Parse literal HTML and analyse it. No network access.
pub fn analyze_html(html: &str, url: Option<&str>) -> AnalysisResult {
    analyze_document(&HtmlDocument::parse(html), url)
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Obtains HTML for an input (URL or literal markup) and analyses it.
///
/// Holds no per-call state, so one analyzer can serve concurrent calls.
pub struct PageAnalyzer {
    static_fetcher: Arc<dyn HtmlFetcher>,
    dynamic_fetcher: Arc<dyn HtmlFetcher>,
}

impl PageAnalyzer {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self::with_fetchers(
            Arc::new(StaticFetcher::new(config.static_fetch.clone())),
            Arc::new(DynamicFetcher::new(config.dynamic_fetch.clone())),
        )
    }

    pub fn with_fetchers(
        static_fetcher: Arc<dyn HtmlFetcher>,
        dynamic_fetcher: Arc<dyn HtmlFetcher>,
    ) -> Self {
        Self {
            static_fetcher,
            dynamic_fetcher,
        }
    }

    /// Analyse `input`. Inputs starting with `http://` or `https://` are
    /// fetched; anything else is treated as HTML. Never fails: any error is
    /// logged and replaced by [`AnalysisResult::default`].
    pub async fn analyze(&self, input: &str, options: AnalyzeOptions) -> AnalysisResult {
        match self.try_analyze(input, options).await {
            Ok(result) => result,
            Err(e) => {
                log::warn!("Analysis failed, returning empty result: {:#}", e);
                AnalysisResult::default()
            }
        }
    }

    async fn try_analyze(&self, input: &str, options: AnalyzeOptions) -> Result<AnalysisResult> {
        if !is_url(input) {
            return Ok(analyze_html(input, None));
        }

        let page = self.fetch(input, options.dynamic).await?;
        log::info!("Fetched {} ({} bytes)", page.final_url, page.html.len());

        Ok(analyze_html(&page.html, Some(&page.final_url)))
    }

    /// Dynamic rendering gets exactly one fallback to the static fetch.
    async fn fetch(&self, url: &str, dynamic: bool) -> Result<FetchedPage> {
        if dynamic {
            match self.dynamic_fetcher.fetch(url).await {
                Ok(page) => return Ok(page),
                Err(e) => {
                    log::warn!("Browser fetch failed for {}, falling back to HTTP: {:#}", url, e)
                }
            }
        }

        self.static_fetcher.fetch(url).await
    }
}
