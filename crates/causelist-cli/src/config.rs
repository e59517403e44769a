//! CLI configuration file support
//!
//! Loads configuration from ~/.config/causelist/config.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// WebDriver settings
    #[serde(default)]
    pub driver: DriverConfig,
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriverConfig {
    /// WebDriver endpoint URL
    pub webdriver_url: Option<String>,
    /// Run the browser headless by default
    pub headless: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output PDF path
    pub path: Option<String>,
}

impl CliConfig {
    /// Load configuration from default path
    pub fn load() -> Self {
        Self::load_from_path(Self::default_path())
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Get the default configuration file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("causelist").join("config.toml"))
    }

    /// WebDriver endpoint, with the flag taking precedence.
    pub fn webdriver_url(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.driver.webdriver_url.clone())
            .unwrap_or_else(|| DEFAULT_WEBDRIVER_URL.to_string())
    }

    /// Output path, with the flag taking precedence.
    pub fn output_path(&self, flag: Option<&std::path::Path>) -> PathBuf {
        flag.map(PathBuf::from)
            .or_else(|| self.output.path.clone().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(causelist_report::DEFAULT_OUTPUT))
    }

    pub fn headless(&self, flag: bool) -> bool {
        flag || self.driver.headless.unwrap_or(false)
    }
}
