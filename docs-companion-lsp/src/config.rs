//! Configuration management for Docs Companion LSP

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::manifest::DEFAULT_MANIFEST_FILE;

/// Default npm registry endpoint
pub const DEFAULT_NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Default base of the human-facing package listing page
pub const DEFAULT_NPM_PACKAGE_PAGE_URL: &str = "https://www.npmjs.com/package";

/// Default README character budget
pub const DEFAULT_README_MAX_CHARS: usize = 2000;

/// LSP configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// npm registry configuration
    pub registry: NpmRegistryConfig,
    /// Documentation rendering configuration
    pub docs: DocsConfig,
    /// Manifest lookup configuration
    pub manifest: ManifestConfig,
}

/// npm registry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NpmRegistryConfig {
    /// Registry base URL
    pub url: String,
    /// Base URL of the package listing page
    pub package_page_url: String,
    /// Request timeout in seconds; none leaves the transport default
    pub timeout_secs: Option<u64>,
}

impl Default for NpmRegistryConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_NPM_REGISTRY_URL.to_string(),
            package_page_url: DEFAULT_NPM_PACKAGE_PAGE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl NpmRegistryConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Documentation rendering configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Characters of README text kept before truncation
    pub readme_max_chars: usize,
    /// Refresh the panel silently on every document change
    pub auto_update: bool,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            readme_max_chars: DEFAULT_README_MAX_CHARS,
            auto_update: true,
        }
    }
}

/// Manifest lookup configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Manifest file name, relative to the workspace root
    pub file_name: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_MANIFEST_FILE.to_string(),
        }
    }
}

impl Config {
    /// Parse configuration from initialization options
    pub fn from_init_options(options: Option<serde_json::Value>) -> Self {
        match options {
            Some(value) => serde_json::from_value(value).unwrap_or_default(),
            None => Self::default(),
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Default location of the user configuration file
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docs-companion").join("config.toml"))
    }

    /// Load the configuration file at `path`, falling back to defaults when
    /// it is missing or invalid.
    pub fn load_file(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("No config file at {}: {e}", path.display());
                return Self::default();
            }
        };

        Self::from_toml(&content).unwrap_or_else(|e| {
            tracing::warn!("Invalid config file {}: {e}", path.display());
            Self::default()
        })
    }

    /// Load the user configuration file, if any
    pub fn load_user() -> Self {
        Self::user_config_path()
            .map(|path| Self::load_file(&path))
            .unwrap_or_default()
    }
}
