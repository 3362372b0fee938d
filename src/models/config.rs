//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::SiteSelectors;

/// Environment variable overriding `site.base_url`.
pub const ENV_BASE_URL: &str = "TAMILMV_URL";

/// Environment variable overriding `bot.admin_id`.
pub const ENV_ADMIN_ID: &str = "ADMIN_ID";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Target forum settings
    #[serde(default)]
    pub site: SiteConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Scrape size limits
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Catalog cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Chat access settings
    #[serde(default)]
    pub bot: BotConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply `TAMILMV_URL` and `ADMIN_ID` from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            let base_url = base_url.trim();
            if !base_url.is_empty() {
                self.site.base_url = base_url.to_string();
            }
        }

        if let Some(admin_id) = lookup(ENV_ADMIN_ID) {
            self.bot.admin_id = admin_id.trim().parse().map_err(|e| {
                AppError::config(format!("{ENV_ADMIN_ID} must be a number: {e}"))
            })?;
        }

        Ok(())
    }

    /// Parsed site base URL.
    pub fn base_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.site.base_url)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let base = self.base_url()?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(AppError::validation("site.base_url must be http(s)"));
        }
        if self.site.selectors.post.trim().is_empty() {
            return Err(AppError::validation("site.selectors.post is empty"));
        }
        if self.site.selectors.content.is_empty() {
            return Err(AppError::validation("site.selectors.content is empty"));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.cache.ttl_secs == 0 {
            return Err(AppError::validation("cache.ttl_secs must be > 0"));
        }
        if self.limits.max_posts == 0 || self.limits.max_links == 0 {
            return Err(AppError::validation(
                "limits.max_posts and limits.max_links must be > 0",
            ));
        }
        if self.limits.label_max_len <= 3 || self.limits.title_display_len == 0 {
            return Err(AppError::validation(
                "limits.label_max_len must be > 3 and limits.title_display_len > 0",
            ));
        }
        if self.bot.admin_id == 0 {
            return Err(AppError::validation("bot.admin_id is not set"));
        }
        Ok(())
    }
}

/// Target forum settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Display name of the source
    #[serde(default = "defaults::site_name")]
    pub name: String,

    /// Forum home page, also the base for relative links
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// CSS selectors for listing and detail pages
    #[serde(default)]
    pub selectors: SiteSelectors,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: defaults::site_name(),
            base_url: defaults::base_url(),
            selectors: SiteSelectors::default(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Bounds applied while scraping and formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Posts taken from the listing page
    #[serde(default = "defaults::max_posts")]
    pub max_posts: usize,

    /// Links kept per post
    #[serde(default = "defaults::max_links")]
    pub max_links: usize,

    /// Anchors examined by the generic fallback
    #[serde(default = "defaults::max_fallback_anchors")]
    pub max_fallback_anchors: usize,

    /// Generic fallback labels must be strictly longer than this
    #[serde(default = "defaults::min_fallback_label_len")]
    pub min_fallback_label_len: usize,

    /// Link labels are truncated to this many characters
    #[serde(default = "defaults::label_max_len")]
    pub label_max_len: usize,

    /// Titles are cut to this many characters on menu buttons
    #[serde(default = "defaults::title_display_len")]
    pub title_display_len: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_posts: defaults::max_posts(),
            max_links: defaults::max_links(),
            max_fallback_anchors: defaults::max_fallback_anchors(),
            min_fallback_label_len: defaults::min_fallback_label_len(),
            label_max_len: defaults::label_max_len(),
            title_display_len: defaults::title_display_len(),
        }
    }
}

/// Catalog cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds a refreshed catalog is served without refetching
    #[serde(default = "defaults::ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: defaults::ttl(),
        }
    }
}

/// Chat access settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BotConfig {
    /// The only user id allowed to issue commands
    #[serde(default)]
    pub admin_id: i64,
}

mod defaults {
    pub fn site_name() -> String {
        "1TamilMV".into()
    }
    pub fn base_url() -> String {
        "https://www.1tamilmv.boo".into()
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        15
    }

    // Limit defaults
    pub fn max_posts() -> usize {
        25
    }
    pub fn max_links() -> usize {
        5
    }
    pub fn max_fallback_anchors() -> usize {
        3
    }
    pub fn min_fallback_label_len() -> usize {
        5
    }
    pub fn label_max_len() -> usize {
        100
    }
    pub fn title_display_len() -> usize {
        50
    }

    // Cache defaults
    pub fn ttl() -> u64 {
        300
    }
}
