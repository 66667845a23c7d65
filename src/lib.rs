// Page Analyzer Library
//
// Heuristic analysis of rendered HTML: page type classification, layout
// section detection, interactive element selectors and basic metadata.

pub mod analyzer;
pub mod api;
pub mod browser;
pub mod config;
pub mod dom;
pub mod elements;
pub mod fetcher;
pub mod metadata;
pub mod page_type;
pub mod sections;

// Re-export main types for convenience
pub use analyzer::{analyze_document, analyze_html, AnalysisResult, AnalyzeOptions, PageAnalyzer};
pub use browser::DynamicFetcher;
pub use config::{load_config, AnalyzerConfig, DynamicFetchConfig, ServerConfig, StaticFetchConfig};
pub use dom::{Dom, HtmlDocument};
pub use elements::{extract_elements, generate_selector, ElementBucket};
pub use fetcher::{FetchedPage, HtmlFetcher, StaticFetcher};
pub use metadata::{extract_metadata, Metadata};
pub use page_type::{classify, page_type_rules, PageType};
pub use sections::{detect_sections, Section, SectionKind, SECTION_CANDIDATES};
