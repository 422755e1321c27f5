use super::PluginDescriptor;
use crate::config::RegistryConfig;
use crate::manifest::{ManifestError, ManifestRegistry};

/// Registers and unregisters plugins in the manifest files.
///
/// Steps run in order and stop at the first error; files already written stay written.
#[derive(Debug, Clone)]
pub struct PluginInstaller {
    registry: ManifestRegistry,
}

impl PluginInstaller {
    pub fn new(registry: ManifestRegistry) -> Self {
        Self { registry }
    }

    pub fn open(config: &RegistryConfig) -> Result<Self, ManifestError> {
        Ok(Self::new(ManifestRegistry::open(config)?))
    }

    pub fn registry(&self) -> &ManifestRegistry {
        &self.registry
    }

    pub fn is_installed(&self, fqcn: &str) -> Result<bool, ManifestError> {
        self.registry.is_bundle_registered(fqcn)
    }

    pub fn install(&self, plugin: &PluginDescriptor) -> Result<(), ManifestError> {
        let fqcn = plugin.bundle().as_str();

        self.registry.register_namespace(plugin.namespace())?;
        self.registry.add_instantiable_bundle(fqcn)?;
        if !plugin.routes().is_empty() {
            self.registry
                .import_routing_resources(fqcn, plugin.routes())?;
        }

        tracing::info!(
            bundle = fqcn,
            namespace = plugin.namespace(),
            routes = plugin.routes().len(),
            "Installed plugin"
        );
        Ok(())
    }

    pub fn uninstall(&self, plugin: &PluginDescriptor) -> Result<(), ManifestError> {
        let fqcn = plugin.bundle().as_str();

        self.registry.remove_routing_resources(fqcn)?;
        // The bundle must still be listed so a vendor it shares is counted.
        let namespace_removed = self.registry.remove_namespace(plugin.namespace())?;
        self.registry.remove_instantiable_bundle(fqcn)?;

        tracing::info!(bundle = fqcn, namespace_removed, "Uninstalled plugin");
        Ok(())
    }
}
