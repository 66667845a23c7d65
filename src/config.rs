use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Browser-like agent sent by the plain HTTP fetcher
pub const STATIC_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Agent presented by the headless browser
pub const DYNAMIC_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Chromium switches that keep the automation banner and site isolation out of the way
pub const DEFAULT_LAUNCH_ARGS: &[&str] = &[
    "--disable-blink-features=AutomationControlled",
    "--disable-web-security",
    "--disable-features=IsolateOrigins,site-per-process",
    "--no-sandbox",
    "--disable-setuid-sandbox",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AnalyzerConfig {
    pub static_fetch: StaticFetchConfig,
    pub dynamic_fetch: DynamicFetchConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StaticFetchConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_redirects: usize,
}

impl Default for StaticFetchConfig {
    fn default() -> Self {
        Self {
            user_agent: STATIC_USER_AGENT.to_string(),
            timeout_secs: 10,
            max_redirects: 5,
        }
    }
}

impl StaticFetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DynamicFetchConfig {
    pub user_agent: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub timeout_secs: u64,
    /// Make `navigator.webdriver` report `false` inside the page
    pub hide_webdriver: bool,
    pub launch_args: Vec<String>,
}

impl Default for DynamicFetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DYNAMIC_USER_AGENT.to_string(),
            viewport_width: 1366,
            viewport_height: 768,
            timeout_secs: 45,
            hide_webdriver: true,
            launch_args: DEFAULT_LAUNCH_ARGS.iter().map(|arg| arg.to_string()).collect(),
        }
    }
}

impl DynamicFetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Load configuration from a TOML file. Omitted keys keep their defaults.
pub fn load_config(path: &Path) -> Result<AnalyzerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    toml::from_str(&content).with_context(|| format!("Failed to parse config file {}", path.display()))
}
