use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::manifest::{BundleName, ManifestError};

pub const DESCRIPTOR_FILE: &str = "plugin.yml";

#[derive(Debug, Deserialize)]
struct DescriptorFile {
    bundle: String,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    routing: BTreeMap<String, PathBuf>,
}

/// What the installer needs to register one plugin.
#[derive(Debug, Clone)]
pub struct PluginDescriptor {
    bundle: BundleName,
    namespace: String,
    routes: BTreeMap<String, PathBuf>,
}

impl PluginDescriptor {
    pub fn new(bundle: BundleName) -> Self {
        let namespace = bundle.vendor().to_string();
        Self {
            bundle,
            namespace,
            routes: BTreeMap::new(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_route(mut self, key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.routes.insert(key.into(), path.into());
        self
    }

    /// Reads `plugin.yml` from `plugin_dir`. Relative routing paths are resolved against it.
    pub fn load(plugin_dir: &Path) -> Result<Self, ManifestError> {
        let path = plugin_dir.join(DESCRIPTOR_FILE);
        if !path.exists() {
            return Err(ManifestError::ManifestNotFound { path });
        }

        let content = std::fs::read_to_string(&path)?;
        let file: DescriptorFile =
            serde_yaml_bw::from_str(&content).map_err(|e| ManifestError::InvalidDescriptor {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        let bundle =
            BundleName::parse(&file.bundle).map_err(|e| ManifestError::InvalidDescriptor {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        let mut descriptor = Self::new(bundle);
        if let Some(namespace) = file.namespace {
            descriptor.namespace = namespace;
        }
        for (key, route) in file.routing {
            let route = if route.is_relative() {
                plugin_dir.join(route)
            } else {
                route
            };
            descriptor.routes.insert(key, route);
        }

        Ok(descriptor)
    }

    pub fn bundle(&self) -> &BundleName {
        &self.bundle
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn routes(&self) -> &BTreeMap<String, PathBuf> {
        &self.routes
    }
}
