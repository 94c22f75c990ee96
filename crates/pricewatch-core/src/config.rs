//! Configuration management for PriceWatch.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigResult, ConfigurationError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration.
///
/// This is loaded from `~/.config/pricewatch/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Scan behavior settings
    pub scanning: ScanningConfig,
    /// Browser automation settings
    pub browser: BrowserConfig,
    /// Source definition settings
    pub sources: SourcesConfig,
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

    /// Load configuration from an explicit path, falling back to defaults
    /// when the file does not exist.
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

    /// Apply `PRICEWATCH_*` environment overrides in place.
    ///
    /// - `PRICEWATCH_HEADLESS`: browser headless mode (true/false)
    /// - `PRICEWATCH_CONCURRENT_SOURCES`: concurrent source count
    /// - `PRICEWATCH_SCAN_TIMEOUT_SECS`: overall scan deadline
    /// - `PRICEWATCH_SOURCES_DIR`: source definitions directory
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PRICEWATCH_HEADLESS") {
            if let Ok(headless) = val.parse() {
                self.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Ok(val) = std::env::var("PRICEWATCH_CONCURRENT_SOURCES") {
            if let Ok(concurrent) = val.parse() {
                self.scanning.concurrent_sources = concurrent;
                tracing::debug!(
                    "Override scanning.concurrent_sources from env: {}",
                    concurrent
                );
            }
        }

        if let Ok(val) = std::env::var("PRICEWATCH_SCAN_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.scanning.scan_timeout_secs = secs;
                tracing::debug!("Override scanning.scan_timeout_secs from env: {}", secs);
            }
        }

        if let Ok(val) = std::env::var("PRICEWATCH_SOURCES_DIR") {
            if !val.trim().is_empty() {
                tracing::debug!("Override sources.definitions_dir from env: {}", val);
                self.sources.definitions_dir = Some(PathBuf::from(val));
            }
        }
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scanning.concurrent_sources == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "scanning.concurrent_sources".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.scanning.source_timeout_secs == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "scanning.source_timeout_secs".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.browser.wait_timeout_secs == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "browser.wait_timeout_secs".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.browser.window_width == 0 || self.browser.window_height == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "browser.window_width/window_height".to_string(),
                reason: "window dimensions must be non-zero".to_string(),
            });
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/pricewatch/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "pricewatch", "pricewatch")
            .ok_or(ConfigurationError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Scan behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanningConfig {
    /// Maximum sources scanned at once
    pub concurrent_sources: usize,
    /// Per-source time limit in seconds
    pub source_timeout_secs: u64,
    /// Whole-scan deadline in seconds (0 = none)
    pub scan_timeout_secs: u64,
}

impl ScanningConfig {
    /// Per-source time limit.
    #[must_use]
    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs)
    }

    /// Whole-scan deadline, if any.
    #[must_use]
    pub fn scan_timeout(&self) -> Option<Duration> {
        (self.scan_timeout_secs > 0).then(|| Duration::from_secs(self.scan_timeout_secs))
    }
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            concurrent_sources: 4,
            source_timeout_secs: 60,
            scan_timeout_secs: 300,
        }
    }
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// How long to wait for a results grid, in seconds
    pub wait_timeout_secs: u64,
    /// Minimum delay between navigations to the same domain
    pub min_navigation_delay_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            wait_timeout_secs: 10,
            min_navigation_delay_ms: 1000,
        }
    }
}

/// Source definition settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Directory holding source definition TOML files
    pub definitions_dir: Option<PathBuf>,
    /// Source IDs to scan, in order (empty = all)
    pub enabled: Vec<String>,
}
