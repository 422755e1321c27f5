use std::path::{Path, PathBuf};

use super::bundle::{BundleName, normalize_fqcn};
use super::routing::{RoutingManifest, RoutingMap};
use super::store::LineStore;
use super::vendor::shared_vendors;
use super::ManifestError;
use crate::config::RegistryConfig;

const NAMESPACE_KIND: &str = "Namespace";
const BUNDLE_KIND: &str = "Plugin FQCN";

/// Registry of the namespaces, bundles and routing resources of installed plugins.
///
/// Each operation is a single read-modify-write over one file. Plugin install and uninstall
/// are expected to be serialized by the caller.
#[derive(Debug, Clone)]
pub struct ManifestRegistry {
    namespaces: LineStore,
    bundles: LineStore,
    routing: RoutingManifest,
}

impl ManifestRegistry {
    pub fn open(config: &RegistryConfig) -> Result<Self, ManifestError> {
        let namespaces = LineStore::open(&config.namespaces_file, config.write_mode)?;
        let bundles = LineStore::open(&config.bundles_file, config.write_mode)?;
        let routing = RoutingManifest::open(
            &config.routing_file,
            config.plugin_root.clone(),
            config.write_mode,
        )?;

        tracing::debug!(
            namespaces = %config.namespaces_file.display(),
            bundles = %config.bundles_file.display(),
            routing = %config.routing_file.display(),
            "Opened plugin manifest registry"
        );

        Ok(Self {
            namespaces,
            bundles,
            routing,
        })
    }

    pub fn namespaces_file(&self) -> &Path {
        self.namespaces.path()
    }

    pub fn bundles_file(&self) -> &Path {
        self.bundles.path()
    }

    pub fn routing_file(&self) -> &Path {
        self.routing.path()
    }

    pub fn set_namespaces_file(&mut self, path: impl Into<PathBuf>) -> Result<(), ManifestError> {
        self.namespaces.set_path(path)
    }

    pub fn set_bundles_file(&mut self, path: impl Into<PathBuf>) -> Result<(), ManifestError> {
        self.bundles.set_path(path)
    }

    pub fn set_routing_file(&mut self, path: impl Into<PathBuf>) -> Result<(), ManifestError> {
        self.routing.set_path(path)
    }

    pub fn registered_namespaces(&self) -> Result<Vec<String>, ManifestError> {
        self.namespaces.load()
    }

    pub fn registered_bundles(&self) -> Result<Vec<String>, ManifestError> {
        self.bundles.load()
    }

    pub fn shared_vendor_namespaces(&self) -> Result<Vec<String>, ManifestError> {
        Ok(shared_vendors(&self.bundles.load()?))
    }

    pub fn routing_resources(&self) -> Result<RoutingMap, ManifestError> {
        self.routing.load()
    }

    pub fn register_namespace(&self, namespace: &str) -> Result<bool, ManifestError> {
        self.namespaces.add(namespace, NAMESPACE_KIND)
    }

    /// Removes `namespace` unless its vendor is still used by another registered bundle.
    ///
    /// Returns `false` when the namespace was kept because it is shared.
    pub fn remove_namespace(&self, namespace: &str) -> Result<bool, ManifestError> {
        if self
            .shared_vendor_namespaces()?
            .iter()
            .any(|vendor| vendor == namespace)
        {
            tracing::warn!(namespace, "Keeping namespace shared by other plugins");
            return Ok(false);
        }

        self.namespaces.remove(namespace)?;
        Ok(true)
    }

    pub fn add_instantiable_bundle(&self, fqcn: &str) -> Result<bool, ManifestError> {
        self.bundles.add(normalize_fqcn(fqcn), BUNDLE_KIND)
    }

    pub fn is_bundle_registered(&self, fqcn: &str) -> Result<bool, ManifestError> {
        self.bundles.contains(normalize_fqcn(fqcn))
    }

    pub fn remove_instantiable_bundle(&self, fqcn: &str) -> Result<usize, ManifestError> {
        self.bundles.remove(normalize_fqcn(fqcn))
    }

    pub fn import_routing_resources<I, K, P>(
        &self,
        fqcn: &str,
        paths: I,
    ) -> Result<Vec<String>, ManifestError>
    where
        I: IntoIterator<Item = (K, P)>,
        K: AsRef<str>,
        P: AsRef<Path>,
    {
        let bundle = BundleName::parse(fqcn)?;
        self.routing.import(&bundle, paths)
    }

    pub fn remove_routing_resources(&self, fqcn: &str) -> Result<usize, ManifestError> {
        let bundle = BundleName::parse(fqcn)?;
        self.routing.remove(&bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::{TempDir, tempdir};

    fn registry() -> (TempDir, ManifestRegistry) {
        let dir = tempdir().unwrap();
        let config = RegistryConfig::builder().base_dir(dir.path()).build();
        let registry = ManifestRegistry::open(&config).unwrap();
        (dir, registry)
    }

    #[test]
    fn test_open_creates_files() {
        let (dir, registry) = registry();
        assert!(dir.path().join("namespaces").exists());
        assert!(dir.path().join("bundles").exists());
        assert!(dir.path().join("routing.yml").exists());
        assert_eq!(registry.namespaces_file(), dir.path().join("namespaces"));
        assert!(registry.registered_namespaces().unwrap().is_empty());
        assert!(registry.registered_bundles().unwrap().is_empty());
        assert!(registry.routing_resources().unwrap().is_empty());
    }

    #[test]
    fn test_open_unwritable_location() {
        let dir = tempdir().unwrap();
        let config = RegistryConfig::builder()
            .base_dir(dir.path().join("does-not-exist"))
            .build();
        let err = ManifestRegistry::open(&config).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound { .. }));
    }

    #[test]
    fn test_register_namespace() {
        let (_dir, registry) = registry();
        assert!(registry.register_namespace("Acme").unwrap());
        assert!(!registry.register_namespace("Acme").unwrap());
        assert_eq!(registry.registered_namespaces().unwrap(), vec!["Acme"]);

        let err = registry.register_namespace("").unwrap_err();
        assert!(matches!(err, ManifestError::Validation { kind: "Namespace", .. }));
    }

    #[test]
    fn test_add_bundle_empty_rejected() {
        let (_dir, registry) = registry();
        let err = registry.add_instantiable_bundle("").unwrap_err();
        assert!(matches!(err, ManifestError::Validation { kind: "Plugin FQCN", .. }));
    }

    #[test]
    fn test_remove_namespace_shared_vendor_kept() {
        let (_dir, registry) = registry();
        registry.register_namespace("V").unwrap();
        registry.register_namespace("W").unwrap();
        registry.add_instantiable_bundle("V\\A\\X").unwrap();
        registry.add_instantiable_bundle("V\\B\\Y").unwrap();
        registry.add_instantiable_bundle("W\\C\\Z").unwrap();

        assert_eq!(registry.shared_vendor_namespaces().unwrap(), vec!["V"]);

        assert!(!registry.remove_namespace("V").unwrap());
        assert!(registry.remove_namespace("W").unwrap());
        assert_eq!(registry.registered_namespaces().unwrap(), vec!["V"]);
    }

    #[test]
    fn test_leading_separator_is_normalized() {
        let (_dir, registry) = registry();
        registry.add_instantiable_bundle("\\V\\A\\X").unwrap();
        assert!(!registry.add_instantiable_bundle("V\\A\\X").unwrap());
        registry.add_instantiable_bundle("\\V\\B\\Y").unwrap();

        assert_eq!(registry.registered_bundles().unwrap(), vec!["V\\A\\X", "V\\B\\Y"]);
        assert_eq!(registry.shared_vendor_namespaces().unwrap(), vec!["V"]);
        assert!(registry.is_bundle_registered("\\V\\A\\X").unwrap());

        assert_eq!(registry.remove_instantiable_bundle("\\V\\A\\X").unwrap(), 1);
        assert_eq!(registry.registered_bundles().unwrap(), vec!["V\\B\\Y"]);

        let err = registry.add_instantiable_bundle("\\").unwrap_err();
        assert!(matches!(err, ManifestError::Validation { kind: "Plugin FQCN", .. }));
    }

    #[test]
    fn test_remove_bundle() {
        let (_dir, registry) = registry();
        registry.add_instantiable_bundle("V\\A\\X").unwrap();
        registry.add_instantiable_bundle("W\\C\\Z").unwrap();

        assert!(registry.is_bundle_registered("V\\A\\X").unwrap());
        assert_eq!(registry.remove_instantiable_bundle("V\\A\\X").unwrap(), 1);
        assert!(!registry.is_bundle_registered("V\\A\\X").unwrap());
        assert_eq!(registry.registered_bundles().unwrap(), vec!["W\\C\\Z"]);
    }

    #[test]
    fn test_routing_resources() {
        let (_dir, registry) = registry();
        let paths = BTreeMap::from([("index", "/app/plugins/V/B/Resources/routing.yml")]);
        registry
            .import_routing_resources("V\\B\\ClassName", &paths)
            .unwrap();

        let resources = registry.routing_resources().unwrap();
        assert_eq!(
            resources["ClassName_index"].resource,
            "@ClassName/Resources/routing.yml"
        );

        assert_eq!(registry.remove_routing_resources("V\\B\\ClassName").unwrap(), 1);
        assert!(registry.routing_resources().unwrap().is_empty());
    }

    #[test]
    fn test_routing_requires_full_name() {
        let (_dir, registry) = registry();
        let err = registry
            .import_routing_resources("V\\B", [("index", "/app/V/B/routing.yml")])
            .unwrap_err();
        assert!(matches!(err, ManifestError::Validation { .. }));
    }

    #[test]
    fn test_set_paths() {
        let (dir, mut registry) = registry();
        let moved = dir.path().join("namespaces.moved");
        registry.set_namespaces_file(&moved).unwrap();
        assert!(moved.exists());
        assert_eq!(registry.namespaces_file(), moved);

        let bundles = dir.path().join("bundles.moved");
        registry.set_bundles_file(&bundles).unwrap();
        assert_eq!(registry.bundles_file(), bundles);

        let routing = dir.path().join("routes.yml");
        registry.set_routing_file(&routing).unwrap();
        assert_eq!(registry.routing_file(), routing);

        let err = registry
            .set_routing_file(dir.path().join("nope").join("routing.yml"))
            .unwrap_err();
        assert!(matches!(err, ManifestError::NotFound { .. }));
        assert_eq!(registry.routing_file(), routing);
    }
}
