//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{ListingSelectors, Rule};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Scan depth, watermark and schedule settings
    #[serde(default)]
    pub scan: ScanConfig,

    /// Listing URL template and selectors
    #[serde(default)]
    pub listing: ListingConfig,

    /// Delivery message settings
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Monitored boards
    #[serde(default)]
    pub boards: Vec<BoardConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }
        if self.scan.anchor_width == 0 {
            return Err(AppError::validation("scan.anchor_width must be > 0"));
        }
        if self.scan.max_scan_count == 0 {
            return Err(AppError::validation("scan.max_scan_count must be > 0"));
        }
        if self.scan.interval_secs == 0 {
            return Err(AppError::validation("scan.interval_secs must be > 0"));
        }
        if self.notify.template.trim().is_empty() {
            return Err(AppError::validation("notify.template is empty"));
        }
        if self.listing.board_url_template.trim().is_empty() {
            return Err(AppError::validation("listing.board_url_template is empty"));
        }
        self.listing.selectors.compile()?;

        if self.boards.is_empty() {
            return Err(AppError::validation("No boards defined"));
        }
        if self.boards.iter().any(|b| b.url.is_none())
            && !self
                .listing
                .board_url_template
                .contains(crate::utils::url::BOARD_PLACEHOLDER)
        {
            return Err(AppError::validation(
                "listing.board_url_template must contain {board}",
            ));
        }

        let mut names = HashSet::new();
        for board in &self.boards {
            board.validate()?;
            if !names.insert(board.name.as_str()) {
                return Err(AppError::validation(format!(
                    "Board '{}' is defined more than once",
                    board.name
                )));
            }
        }
        Ok(())
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay before each request in milliseconds
    #[serde(default)]
    pub request_delay_ms: u64,

    /// Maximum boards scanned at the same time
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: 0,
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Scan behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Number of newest posts remembered per board as the watermark
    #[serde(default = "defaults::anchor_width")]
    pub anchor_width: usize,

    /// Upper bound on posts collected by a single scan
    #[serde(default = "defaults::max_scan_count")]
    pub max_scan_count: usize,

    /// Seconds between scan rounds
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,

    /// Directory for persisted watermarks; none keeps them in memory only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            anchor_width: defaults::anchor_width(),
            max_scan_count: defaults::max_scan_count(),
            interval_secs: defaults::interval(),
            state_dir: None,
        }
    }
}

/// Listing layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Root listing URL with a `{board}` placeholder
    #[serde(default = "defaults::board_url_template")]
    pub board_url_template: String,

    /// Scraping selectors
    #[serde(default)]
    pub selectors: ListingSelectors,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            board_url_template: defaults::board_url_template(),
            selectors: ListingSelectors::default(),
        }
    }
}

/// Delivery message settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Message template, see `Post::format` plus `{board}` and `{subscribers}`
    #[serde(default = "defaults::template")]
    pub template: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            template: defaults::template(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when no verbosity flag is given
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

/// Configuration for a single monitored board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Board name, substituted into the listing URL template
    pub name: String,

    /// Explicit listing root URL, overriding the template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Subscriber rules
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl BoardConfig {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Board name is empty"));
        }
        for (index, rule) in self.rules.iter().enumerate() {
            let context = format!("boards.{}.rules[{}]", self.name, index);
            if rule.subscribers.is_empty() {
                return Err(AppError::validation(format!("{context}: no subscribers")));
            }
            if rule.subscribers.iter().any(|s| s.trim().is_empty()) {
                return Err(AppError::validation(format!(
                    "{context}: empty subscriber entry"
                )));
            }
            if rule.title.as_ref().is_some_and(|k| k.is_empty()) {
                return Err(AppError::validation(format!(
                    "{context}: empty title keyword list (omit the field to match any title)"
                )));
            }
            if rule.content.as_ref().is_some_and(|k| k.is_empty()) {
                return Err(AppError::validation(format!(
                    "{context}: empty content keyword list (omit the field to match any content)"
                )));
            }
        }
        Ok(())
    }
}

mod defaults {
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; boardwatch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_concurrent() -> usize {
        3
    }

    pub fn anchor_width() -> usize {
        crate::models::DEFAULT_ANCHOR_WIDTH
    }
    pub fn max_scan_count() -> usize {
        10_000
    }
    pub fn interval() -> u64 {
        60
    }

    pub fn board_url_template() -> String {
        "https://www.ptt.cc/bbs/{board}/index.html".into()
    }

    pub fn template() -> String {
        "[{board}] {title}\n{date}, {author}\n{url}\n-> {subscribers}".into()
    }

    pub fn log_level() -> String {
        "info".into()
    }
}
