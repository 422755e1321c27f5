//! Registry settings as read from a JSON file or the environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ConfigResult, RegistryConfigBuilder, WriteMode};

/// Optional overrides; unset fields keep the builder defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySettings {
    #[serde(default, rename = "baseDir")]
    pub base_dir: Option<PathBuf>,

    #[serde(default, rename = "namespacesFile")]
    pub namespaces_file: Option<PathBuf>,

    #[serde(default, rename = "bundlesFile")]
    pub bundles_file: Option<PathBuf>,

    #[serde(default, rename = "routingFile")]
    pub routing_file: Option<PathBuf>,

    #[serde(default, rename = "pluginRoot")]
    pub plugin_root: Option<PathBuf>,

    #[serde(default, rename = "writeMode")]
    pub write_mode: Option<WriteMode>,
}

impl RegistrySettings {
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded registry settings");
        Ok(settings)
    }

    /// Fields set in `other` replace the ones in `self`.
    pub fn merge(mut self, other: Self) -> Self {
        self.base_dir = other.base_dir.or(self.base_dir);
        self.namespaces_file = other.namespaces_file.or(self.namespaces_file);
        self.bundles_file = other.bundles_file.or(self.bundles_file);
        self.routing_file = other.routing_file.or(self.routing_file);
        self.plugin_root = other.plugin_root.or(self.plugin_root);
        self.write_mode = other.write_mode.or(self.write_mode);
        self
    }

    pub fn apply(self, mut builder: RegistryConfigBuilder) -> RegistryConfigBuilder {
        if let Some(dir) = self.base_dir {
            builder = builder.base_dir(dir);
        }
        if let Some(path) = self.namespaces_file {
            builder = builder.namespaces_file(path);
        }
        if let Some(path) = self.bundles_file {
            builder = builder.bundles_file(path);
        }
        if let Some(path) = self.routing_file {
            builder = builder.routing_file(path);
        }
        if let Some(path) = self.plugin_root {
            builder = builder.plugin_root(path);
        }
        if let Some(mode) = self.write_mode {
            builder = builder.write_mode(mode);
        }
        builder
    }
}
