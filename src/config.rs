//! Sitemap configuration module.
//!
//! Handles loading and validating `sitemapper.toml`. Configuration is a flat
//! file at the project root; every domain the tool manages is declared here,
//! so the generator never reads ambient global state.
//!
//! ## Configuration Options
//!
//! ```toml
//! # Entries per sitemap page. The sitemaps.org protocol caps a file at
//! # 50,000 entries; most sites want far fewer per page.
//! page_size = 1000
//!
//! # Seconds the serving layer may cache generated XML. 0 disables public
//! # caching entirely.
//! cache_lifetime = 86400
//!
//! [defaults]
//! # Applied to entries that don't set their own values. Both optional.
//! changefreq = "weekly"     # always | hourly | daily | weekly | monthly | yearly | never
//! priority = 0.5            # 0.0 - 1.0
//!
//! # One block per domain. Each domain gets its own sitemap set.
//! [[domains]]
//! name = "main"
//! base_url = "https://example.com"
//! html_dir = "dist"          # walk a built site directory...
//!
//! [[domains]]
//! name = "docs"
//! base_url = "https://docs.example.com"
//! manifest = "docs-urls.toml" # ...or list URLs explicitly
//! ```
//!
//! Exactly one of `html_dir` / `manifest` must be set per domain. Unknown
//! keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Default entries per sitemap page.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Default cache lifetime in seconds (one day).
pub const DEFAULT_CACHE_LIFETIME: u64 = 86_400;

/// Hard protocol cap on entries per sitemap file.
pub const PROTOCOL_MAX_PAGE_SIZE: usize = 50_000;

/// Valid `changefreq` values per the sitemaps.org protocol.
const CHANGEFREQ_VALUES: [&str; 7] = [
    "always", "hourly", "daily", "weekly", "monthly", "yearly", "never",
];

/// Top-level configuration loaded from `sitemapper.toml`.
///
/// All scalar fields have defaults; only the domain list is mandatory in
/// practice (an empty list validates but generates nothing).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SitemapConfig {
    /// Entries per sitemap page. Slicing and the index's page count both
    /// derive from this one value.
    pub page_size: usize,
    /// Seconds the serving layer may cache generated XML publicly.
    /// `0` means "do not cache publicly".
    pub cache_lifetime: u64,
    /// Per-entry defaults applied when a source doesn't set its own.
    pub defaults: EntryDefaults,
    /// Domains to generate sitemaps for, each with its own URL source.
    pub domains: Vec<DomainConfig>,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            cache_lifetime: DEFAULT_CACHE_LIFETIME,
            defaults: EntryDefaults::default(),
            domains: Vec::new(),
        }
    }
}

/// Optional per-entry defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EntryDefaults {
    /// `changefreq` for entries that don't set their own.
    pub changefreq: Option<String>,
    /// `priority` for entries that don't set their own (0.0–1.0).
    pub priority: Option<f32>,
}

/// One configured domain: a name, a base URL, and a URL source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainConfig {
    /// Short identifier used in CLI output and cache directory names.
    pub name: String,
    /// Absolute origin, e.g. `https://example.com`. A trailing slash is
    /// stripped at load time.
    pub base_url: String,
    /// Built site directory to walk for HTML files.
    #[serde(default)]
    pub html_dir: Option<String>,
    /// Explicit URL manifest file (alternative to `html_dir`).
    #[serde(default)]
    pub manifest: Option<String>,
}

impl SitemapConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Strip trailing slashes from base URLs so rendering can join paths
    /// with a single `/` unconditionally.
    fn normalize(&mut self) {
        for domain in &mut self.domains {
            while domain.base_url.ends_with('/') {
                domain.base_url.pop();
            }
        }
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Validation("page_size must be at least 1".into()));
        }
        if self.page_size > PROTOCOL_MAX_PAGE_SIZE {
            return Err(ConfigError::Validation(format!(
                "page_size must not exceed the protocol cap of {}",
                PROTOCOL_MAX_PAGE_SIZE
            )));
        }
        if let Some(freq) = &self.defaults.changefreq
            && !CHANGEFREQ_VALUES.contains(&freq.as_str())
        {
            return Err(ConfigError::Validation(format!(
                "defaults.changefreq must be one of {}",
                CHANGEFREQ_VALUES.join(", ")
            )));
        }
        if let Some(priority) = self.defaults.priority
            && !(0.0..=1.0).contains(&priority)
        {
            return Err(ConfigError::Validation(
                "defaults.priority must be between 0.0 and 1.0".into(),
            ));
        }
        let mut names = std::collections::HashSet::new();
        for domain in &self.domains {
            domain.validate()?;
            if !names.insert(domain.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate domain name: {}",
                    domain.name
                )));
            }
        }
        Ok(())
    }
}

impl DomainConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::Validation("domain name must not be empty".into()));
        }
        if self.name.contains(['/', '\\']) {
            return Err(ConfigError::Validation(format!(
                "domain name must not contain path separators: {}",
                self.name
            )));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "base_url must start with http:// or https://: {}",
                self.base_url
            )));
        }
        match (&self.html_dir, &self.manifest) {
            (Some(_), Some(_)) => Err(ConfigError::Validation(format!(
                "domain {} sets both html_dir and manifest; pick one",
                self.name
            ))),
            (None, None) => Err(ConfigError::Validation(format!(
                "domain {} needs either html_dir or manifest",
                self.name
            ))),
            _ => Ok(()),
        }
    }
}

/// The stock config file printed by `sitemapper gen-config`, with every
/// option documented.
pub fn stock_config_toml() -> String {
    r#"# sitemapper configuration
# All options shown with their defaults.

# Entries per sitemap page. Slicing and the sitemap index's page count are
# both derived from this value. The sitemaps.org protocol caps a single
# file at 50000 entries.
page_size = 1000

# Seconds the serving layer may cache generated XML publicly.
# 0 disables public caching.
cache_lifetime = 86400

[defaults]
# Optional hints applied to entries that don't set their own.
# changefreq = "weekly"   # always | hourly | daily | weekly | monthly | yearly | never
# priority = 0.5          # 0.0 - 1.0

# One [[domains]] block per site/host/language variant. Each domain gets
# its own sitemap set under the cache directory.
#
# [[domains]]
# name = "main"
# base_url = "https://example.com"
# html_dir = "dist"            # walk a built site directory for HTML files
#
# [[domains]]
# name = "docs"
# base_url = "https://docs.example.com"
# manifest = "docs-urls.toml"  # or list URLs explicitly
"#
    .to_string()
}
