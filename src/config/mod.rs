//! Registry configuration: where the manifest files live and how they are written.
//!
//! ```rust,no_run
//! use plugin_manifest::config::{RegistryConfig, WriteMode};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RegistryConfig::builder()
//!     .base_dir("app/config/local/plugin")
//!     .plugin_root("src/plugin")
//!     .write_mode(WriteMode::Atomic)
//!     .build();
//!
//! let from_env = RegistryConfig::from_env()?;
//! # Ok(())
//! # }
//! ```

pub mod env;
pub mod settings;

pub use env::ENV_PREFIX;
pub use settings::RegistrySettings;

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default directory of the manifest files, relative to the host application root.
pub const DEFAULT_BASE_DIR: &str = "app/config/local/plugin";
pub const NAMESPACES_FILE: &str = "namespaces";
pub const BUNDLES_FILE: &str = "bundles";
pub const ROUTING_FILE: &str = "routing.yml";

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid value for {key}: {message}")]
    InvalidValue {
        /// The key with invalid value
        key: String,
        /// Error message
        message: String,
    },

    /// Settings file is not valid JSON
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment error: {0}")]
    Env(#[from] std::env::VarError),
}

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// How a manifest file is replaced on every write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Truncate and write in place.
    #[default]
    Overwrite,
    /// Write a sibling temp file, then rename it over the target.
    Atomic,
}

impl FromStr for WriteMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "atomic" => Ok(Self::Atomic),
            other => Err(ConfigError::InvalidValue {
                key: "write_mode".into(),
                message: format!("expected 'overwrite' or 'atomic', got '{}'", other),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryConfig {
    pub namespaces_file: PathBuf,
    pub bundles_file: PathBuf,
    pub routing_file: PathBuf,
    /// Directory holding `<Vendor>/<BundleName>/` plugin trees. Routing paths are resolved
    /// against it when set.
    pub plugin_root: Option<PathBuf>,
    pub write_mode: WriteMode,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfigBuilder::default().build()
    }
}

impl RegistryConfig {
    pub fn builder() -> RegistryConfigBuilder {
        RegistryConfigBuilder::default()
    }

    /// Defaults overlaid with `PLUGIN_MANIFEST_*` environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Ok(RegistrySettings::from_env()?.apply(Self::builder()).build())
    }

    /// Defaults overlaid with a JSON settings file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> ConfigResult<Self> {
        Ok(RegistrySettings::load(path.as_ref())?
            .apply(Self::builder())
            .build())
    }
}

/// Builder for RegistryConfig.
///
/// Files not set explicitly are placed under `base_dir`.
#[derive(Clone, Debug, Default)]
pub struct RegistryConfigBuilder {
    base_dir: Option<PathBuf>,
    namespaces_file: Option<PathBuf>,
    bundles_file: Option<PathBuf>,
    routing_file: Option<PathBuf>,
    plugin_root: Option<PathBuf>,
    write_mode: Option<WriteMode>,
}

impl RegistryConfigBuilder {
    pub fn base_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(path.into());
        self
    }

    pub fn namespaces_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.namespaces_file = Some(path.into());
        self
    }

    pub fn bundles_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.bundles_file = Some(path.into());
        self
    }

    pub fn routing_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.routing_file = Some(path.into());
        self
    }

    pub fn plugin_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.plugin_root = Some(path.into());
        self
    }

    pub fn write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = Some(mode);
        self
    }

    pub fn build(self) -> RegistryConfig {
        let base_dir = self
            .base_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BASE_DIR));
        RegistryConfig {
            namespaces_file: self
                .namespaces_file
                .unwrap_or_else(|| base_dir.join(NAMESPACES_FILE)),
            bundles_file: self
                .bundles_file
                .unwrap_or_else(|| base_dir.join(BUNDLES_FILE)),
            routing_file: self
                .routing_file
                .unwrap_or_else(|| base_dir.join(ROUTING_FILE)),
            plugin_root: self.plugin_root,
            write_mode: self.write_mode.unwrap_or_default(),
        }
    }
}
