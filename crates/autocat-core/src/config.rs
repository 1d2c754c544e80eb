//! Configuration management for autocat.
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
/// This is loaded from `~/.config/autocat/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Source site layout
    pub site: SiteConfig,
    /// Per-level extraction limits
    pub limits: LimitsConfig,
    /// Browser automation settings
    pub browser: BrowserConfig,
    /// Walk pacing and debug output
    pub run: RunConfig,
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
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `AUTOCAT_HEADLESS`: Override browser headless mode (true/false)
    /// - `AUTOCAT_BASE_URL`: Override the catalog site origin
    /// - `AUTOCAT_PACING_MS`: Override the delay after each engine fetch
    /// - `AUTOCAT_DEBUG_DIR`: Enable page snapshots into this directory
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `AUTOCAT_*` environment overrides in place.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("AUTOCAT_HEADLESS") {
            if let Ok(headless) = val.parse() {
                self.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Ok(val) = std::env::var("AUTOCAT_BASE_URL") {
            if !val.is_empty() {
                tracing::debug!("Override site.base_url from env: {}", val);
                self.site.base_url = val;
            }
        }

        if let Ok(val) = std::env::var("AUTOCAT_PACING_MS") {
            if let Ok(ms) = val.parse() {
                self.run.pacing_ms = ms;
                tracing::debug!("Override run.pacing_ms from env: {}", ms);
            }
        }

        if let Ok(val) = std::env::var("AUTOCAT_DEBUG_DIR") {
            if !val.is_empty() {
                tracing::debug!("Override run.debug_dir from env: {}", val);
                self.run.debug_dir = Some(PathBuf::from(val));
            }
        }
    }

    /// Check values that would make every fetch fail.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.site.base_url.starts_with("http://") || self.site.base_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidValue {
                field: "site.base_url".to_string(),
                reason: format!("must be an http(s) URL, got '{}'", self.site.base_url),
            });
        }

        if self.site.identification_marker.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "site.identification_marker".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/autocat/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "autocat", "autocat").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Layout of the catalog site being walked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme and host, without a trailing slash
    pub base_url: String,
    /// Path of the page listing every brand
    pub brands_path: String,
    /// Path prefix of brand and model detail pages
    pub catalog_prefix: String,
    /// Path marker shared by every vehicle-identification link
    pub identification_marker: String,
}

impl SiteConfig {
    /// Marker that precedes a brand or model id in a detail link.
    #[must_use]
    pub fn detail_marker(&self) -> String {
        format!("{}-", self.identification_marker)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.elit.ro".to_string(),
            brands_path: "/Catalog/autoturism-identificare-vehicul/39849642;39850140".to_string(),
            catalog_prefix: "/Catalog/".to_string(),
            identification_marker: "autoturism-identificare-vehicul".to_string(),
        }
    }
}

/// Per-level extraction limits. `None` means unlimited.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum brands to walk
    pub max_brands: Option<usize>,
    /// Maximum models per brand
    pub max_models: Option<usize>,
    /// Maximum engines per model
    pub max_engines: Option<usize>,
    /// Brand names to keep (case-insensitive); empty keeps all
    pub brand_filter: Vec<String>,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_brands: Some(10),
            max_models: Some(5),
            max_engines: Some(10),
            brand_filter: Vec::new(),
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
    /// User agent sent with every request; randomized when empty
    pub user_agent: String,
    /// `Accept-Language` locale
    pub locale: String,
    /// Navigation timeout in seconds
    pub navigation_timeout_secs: u64,
    /// Quiet period after the load event before markup is read
    pub network_idle_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1280,
            window_height: 900,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/96.0.4664.110 Safari/537.36".to_string(),
            locale: "ro-RO".to_string(),
            navigation_timeout_secs: 30,
            network_idle_ms: 500,
        }
    }
}

/// Walk pacing and debug output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Delay after each successful engine fetch, in milliseconds
    pub pacing_ms: u64,
    /// Directory for page screenshots and markup dumps
    pub debug_dir: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            pacing_ms: 1000,
            debug_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.site.base_url, "https://www.elit.ro");
        assert_eq!(config.limits.max_brands, Some(10));
        assert_eq!(config.limits.max_models, Some(5));
        assert_eq!(config.limits.max_engines, Some(10));
        assert!(config.browser.headless);
        assert_eq!(config.run.pacing_ms, 1000);
        assert!(config.run.debug_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_detail_marker() {
        let site = SiteConfig::default();
        assert_eq!(site.detail_marker(), "autoturism-identificare-vehicul-");
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[site]"));
        assert!(toml_str.contains("[limits]"));
        assert!(toml_str.contains("[browser]"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.site.base_url, config.site.base_url);
        assert_eq!(parsed.limits.max_models, config.limits.max_models);
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");

        let mut config = AppConfig::default();
        config.limits.max_brands = Some(3);
        config.limits.brand_filter = vec!["Audi".to_string()];
        config.run.debug_dir = Some(tmp.path().join("debug"));

        let contents = toml::to_string_pretty(&config).expect("serialize config");
        fs::write(&config_path, contents).expect("write config file");

        let loaded = AppConfig::load_from(&config_path).expect("load config");
        assert_eq!(loaded.limits.max_brands, Some(3));
        assert_eq!(loaded.limits.brand_filter, vec!["Audi".to_string()]);
        assert_eq!(loaded.run.debug_dir, Some(tmp.path().join("debug")));
    }

    #[test]
    fn test_load_from_missing_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let result = AppConfig::load_from(&tmp.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("AUTOCAT_HEADLESS", "false");
        std::env::set_var("AUTOCAT_PACING_MS", "0");
        std::env::set_var("AUTOCAT_DEBUG_DIR", "/tmp/autocat-debug");

        let mut config = AppConfig::default();
        config.apply_env_overrides();
        assert!(!config.browser.headless);
        assert_eq!(config.run.pacing_ms, 0);
        assert_eq!(
            config.run.debug_dir,
            Some(PathBuf::from("/tmp/autocat-debug"))
        );

        std::env::remove_var("AUTOCAT_HEADLESS");
        std::env::remove_var("AUTOCAT_PACING_MS");
        std::env::remove_var("AUTOCAT_DEBUG_DIR");
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[limits]
max_brands = 2

[run]
pacing_ms = 250
"#;

        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.limits.max_brands, Some(2));
        assert_eq!(config.run.pacing_ms, 250);
        // These should be defaults
        assert_eq!(config.limits.max_models, Some(5));
        assert_eq!(config.browser.locale, "ro-RO");
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = AppConfig::default();
        config.site.base_url = "www.elit.ro".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
