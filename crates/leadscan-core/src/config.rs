//! Configuration management for leadscan.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/leadscan/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Browser launch and navigation settings
    pub browser: BrowserConfig,
    /// Listing enumeration settings
    pub listing: ListingConfig,
    /// Detail-page worker pool settings
    pub extraction: ExtractionConfig,
    /// Locale policy for the phone heuristics
    pub locale: LocaleConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `LEADSCAN_HEADLESS`: Override browser headless mode (true/false)
    /// - `LEADSCAN_CONCURRENCY`: Override the number of detail-page workers
    /// - `LEADSCAN_RETRY_BUDGET`: Override the per-job retry budget
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env();
        Ok(config)
    }

    /// Apply `LEADSCAN_*` environment overrides in place.
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("LEADSCAN_HEADLESS") {
            if let Ok(headless) = val.parse() {
                self.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Ok(val) = std::env::var("LEADSCAN_CONCURRENCY") {
            if let Ok(concurrency) = val.parse() {
                self.extraction.concurrency = concurrency;
                tracing::debug!("Override extraction.concurrency from env: {}", concurrency);
            }
        }

        if let Ok(val) = std::env::var("LEADSCAN_RETRY_BUDGET") {
            if let Ok(budget) = val.parse() {
                self.extraction.retry_budget = budget;
                tracing::debug!("Override extraction.retry_budget from env: {}", budget);
            }
        }
    }

    /// Check values that would make a run impossible.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.extraction.concurrency == 0 {
            return Err(invalid("extraction.concurrency", "must be at least 1"));
        }
        if self.listing.stability_threshold == 0 {
            return Err(invalid("listing.stability_threshold", "must be at least 1"));
        }
        if self.listing.scroll_increment_px == 0 {
            return Err(invalid("listing.scroll_increment_px", "must be positive"));
        }
        for (field, pattern) in [
            ("locale.postal_code_pattern", &self.locale.postal_code_pattern),
            ("locale.phone_pattern", &self.locale.phone_pattern),
        ] {
            if let Err(e) = regex::Regex::new(pattern) {
                return Err(invalid(field, &e.to_string()));
            }
        }
        Ok(())
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> ConfigResult<()> {
        let config_dir = config_path
            .parent()
            .ok_or_else(|| invalid("config_path", "no parent directory"))?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/leadscan/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "leadscan", "leadscan").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Browser launch and navigation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// User agent for every view; empty picks a randomized desktop fingerprint
    pub user_agent: String,
    /// Skip image loading to keep renderer memory down
    pub block_images: bool,
    /// Navigation timeout for the listing view in seconds
    pub navigation_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1280,
            window_height: 720,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36".to_string(),
            block_images: true,
            navigation_timeout_secs: 60,
        }
    }
}

/// Listing enumeration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Selector of the scrollable results container
    pub feed_selector: String,
    /// Selector of the item anchors inside the feed
    pub item_selector: String,
    /// How long to wait for the feed to appear, in seconds
    pub container_timeout_secs: u64,
    /// Pixels scrolled per iteration
    pub scroll_increment_px: u32,
    /// Pause after each scroll so lazy items can render, in milliseconds
    pub scroll_settle_ms: u64,
    /// Consecutive unchanged iterations that mean "end of list"
    pub stability_threshold: u32,
    /// Host must contain this fragment (empty disables the check)
    pub required_host_fragment: String,
    /// Path must contain this fragment (empty disables the check)
    pub required_path_fragment: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            feed_selector: ".m6QErb[aria-label]".to_string(),
            item_selector: "a.hfpxzc".to_string(),
            container_timeout_secs: 20,
            scroll_increment_px: 3000,
            scroll_settle_ms: 1500,
            stability_threshold: 5,
            required_host_fragment: "google.".to_string(),
            required_path_fragment: "/maps".to_string(),
        }
    }
}

/// Detail-page worker pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Number of concurrently open detail views
    pub concurrency: usize,
    /// Extra attempts after a recoverable failure
    pub retry_budget: u32,
    /// Fixed delay between attempts in milliseconds
    pub retry_delay_ms: u64,
    /// Navigation timeout for detail views in seconds
    pub detail_timeout_secs: u64,
    /// How long to wait for phone markup to render, in milliseconds
    pub phone_wait_ms: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            concurrency: 2,
            retry_budget: 2,
            retry_delay_ms: 2000,
            detail_timeout_secs: 30,
            phone_wait_ms: 5000,
        }
    }
}

/// Locale policy for the labeled-control and free-text heuristics.
///
/// The defaults describe Brazilian Portuguese listings and the Brazilian
/// numbering plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Locale tag, informational
    pub name: String,
    /// Words stripped from phone button labels
    pub boilerplate_words: Vec<String>,
    /// Words that mark a text line as part of an address
    pub address_keywords: Vec<String>,
    /// Regex for postal codes removed before phone matching
    pub postal_code_pattern: String,
    /// Regex for a phone-shaped substring
    pub phone_pattern: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            name: "pt-BR".to_string(),
            boilerplate_words: ["Copiar", "número", "de", "telefone", "phone", "number", "copy"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            address_keywords: [
                "Rua",
                "Av.",
                "Avenida",
                "Praça",
                "Rodovia",
                "Bairro",
                "CEP",
                "Estado",
                "Cidade",
                "Logradouro",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            postal_code_pattern: r"\d{5}-\d{3}".to_string(),
            phone_pattern: r"(?:\+?55\s?)?(?:\(?0?[1-9]{2}\)?\s?)?(?:9\d{4}|\d{4})[-.\s]?\d{4}"
                .to_string(),
        }
    }
}
