//! Routing resource map exposed to the host router.
//!
//! The file is a YAML mapping from `<ClassName>_<pathKey>` to `{resource: "@<ClassName>/<path>"}`.
//! Keys are prefixed by the owning bundle's class name so that all entries of a bundle can be
//! dropped together.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ManifestError;
use super::bundle::BundleName;
use super::fs::{ensure_writable, write_file};
use crate::config::WriteMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingResource {
    pub resource: String,
}

impl RoutingResource {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
        }
    }
}

pub type RoutingMap = BTreeMap<String, RoutingResource>;

pub fn parse(text: &str) -> Result<RoutingMap, ManifestError> {
    if text.trim().is_empty() {
        return Ok(RoutingMap::new());
    }
    let map: Option<RoutingMap> = serde_yaml_bw::from_str(text)?;
    Ok(map.unwrap_or_default())
}

pub fn dump(map: &RoutingMap) -> Result<String, ManifestError> {
    Ok(serde_yaml_bw::to_string(map)?)
}

#[derive(Debug, Clone)]
pub struct RoutingManifest {
    path: PathBuf,
    plugin_root: Option<PathBuf>,
    write_mode: WriteMode,
}

impl RoutingManifest {
    pub fn open(
        path: impl Into<PathBuf>,
        plugin_root: Option<PathBuf>,
        write_mode: WriteMode,
    ) -> Result<Self, ManifestError> {
        let path = path.into();
        ensure_writable(&path)?;
        Ok(Self {
            path,
            plugin_root,
            write_mode,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) -> Result<(), ManifestError> {
        let path = path.into();
        ensure_writable(&path)?;
        self.path = path;
        Ok(())
    }

    pub fn plugin_root(&self) -> Option<&Path> {
        self.plugin_root.as_deref()
    }

    pub fn load(&self) -> Result<RoutingMap, ManifestError> {
        let content = std::fs::read_to_string(&self.path)?;
        parse(&content)
    }

    /// Registers one routing entry per declared path and merges them over the stored map.
    ///
    /// Every path is resolved before anything is written, so a bad path leaves the file as it was.
    pub fn import<I, K, P>(&self, bundle: &BundleName, paths: I) -> Result<Vec<String>, ManifestError>
    where
        I: IntoIterator<Item = (K, P)>,
        K: AsRef<str>,
        P: AsRef<Path>,
    {
        let mut imported = RoutingMap::new();
        for (path_key, path) in paths {
            let relative = self.relative_resource(bundle, path.as_ref())?;
            imported.insert(
                bundle.routing_key(path_key.as_ref()),
                RoutingResource::new(bundle.resource(&relative)),
            );
        }

        let keys: Vec<String> = imported.keys().cloned().collect();
        let mut resources = self.load()?;
        resources.extend(imported);
        self.save(&resources)?;

        tracing::debug!(bundle = %bundle, count = keys.len(), "Imported routing resources");
        Ok(keys)
    }

    /// Drops every entry whose key starts with the bundle's class name.
    pub fn remove(&self, bundle: &BundleName) -> Result<usize, ManifestError> {
        let mut resources = self.load()?;
        let before = resources.len();
        resources.retain(|key, _| !key.starts_with(bundle.class_name()));
        let removed = before - resources.len();
        self.save(&resources)?;

        tracing::debug!(bundle = %bundle, removed, "Removed routing resources");
        Ok(removed)
    }

    fn save(&self, resources: &RoutingMap) -> Result<(), ManifestError> {
        write_file(&self.path, &dump(resources)?, self.write_mode)
    }

    /// Part of `path` below the plugin's own `<vendor>/<bundle>` directory, `/`-separated.
    fn relative_resource(&self, bundle: &BundleName, path: &Path) -> Result<String, ManifestError> {
        let rest = match &self.plugin_root {
            Some(root) => {
                let plugin_dir = root.join(bundle.vendor()).join(bundle.bundle());
                path.strip_prefix(&plugin_dir)
                    .ok()
                    .map(|rest| rest.components().collect::<Vec<_>>())
            }
            None => Self::scan_plugin_dir(path, bundle.vendor(), bundle.bundle()),
        };

        rest.filter(|components| !components.is_empty())
            .map(|components| {
                components
                    .iter()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .ok_or_else(|| ManifestError::Parse {
                path: path.to_path_buf(),
                vendor: bundle.vendor().to_string(),
                bundle: bundle.bundle().to_string(),
            })
    }

    /// Components after the last `<vendor>/<bundle>` pair that is preceded by something other
    /// than the filesystem root.
    fn scan_plugin_dir<'a>(path: &'a Path, vendor: &str, bundle: &str) -> Option<Vec<Component<'a>>> {
        let components: Vec<Component<'a>> = path.components().collect();
        if components.len() < 3 {
            return None;
        }

        (1..components.len() - 2)
            .rev()
            .find(|&i| {
                components[i].as_os_str() == vendor
                    && components[i + 1].as_os_str() == bundle
                    && components[..i]
                        .iter()
                        .any(|c| !matches!(c, Component::RootDir))
            })
            .map(|i| components[i + 2..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn bundle() -> BundleName {
        BundleName::parse("V\\B\\ClassName").unwrap()
    }

    fn manifest(dir: &Path, plugin_root: Option<PathBuf>) -> RoutingManifest {
        RoutingManifest::open(dir.join("routing.yml"), plugin_root, WriteMode::Overwrite).unwrap()
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("  \n").unwrap().is_empty());
        assert!(parse("~").unwrap().is_empty());
    }

    #[test]
    fn test_parse_document() {
        let map = parse("ClassName_index:\n  resource: \"@ClassName/Resources/routing.yml\"\n").unwrap();
        assert_eq!(
            map.get("ClassName_index"),
            Some(&RoutingResource::new("@ClassName/Resources/routing.yml"))
        );
    }

    #[test]
    fn test_parse_invalid() {
        let err = parse("- just\n- a list\n").unwrap_err();
        assert!(matches!(err, ManifestError::Yaml(_)));
    }

    #[test]
    fn test_dump_parse_roundtrip() {
        let mut map = RoutingMap::new();
        map.insert("A_index".into(), RoutingResource::new("@A/Resources/routing.yml"));
        map.insert("B_admin".into(), RoutingResource::new("@B/config/admin.yml"));
        assert_eq!(parse(&dump(&map).unwrap()).unwrap(), map);
    }

    #[test]
    fn test_import_without_root() {
        let dir = tempdir().unwrap();
        let routing = manifest(dir.path(), None);

        let paths = BTreeMap::from([("index", "/app/plugins/V/B/Resources/routing.yml")]);
        let keys = routing.import(&bundle(), &paths).unwrap();
        assert_eq!(keys, vec!["ClassName_index"]);

        let map = routing.load().unwrap();
        assert_eq!(
            map.get("ClassName_index"),
            Some(&RoutingResource::new("@ClassName/Resources/routing.yml"))
        );
    }

    #[test]
    fn test_import_uses_last_plugin_segment() {
        let dir = tempdir().unwrap();
        let routing = manifest(dir.path(), None);

        let paths = BTreeMap::from([("index", "/srv/V/B/plugins/V/B/config/routing.yml")]);
        routing.import(&bundle(), &paths).unwrap();
        assert_eq!(
            routing.load().unwrap()["ClassName_index"].resource,
            "@ClassName/config/routing.yml"
        );
    }

    #[test]
    fn test_import_with_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("plugins");
        let routing = manifest(dir.path(), Some(root.clone()));

        let paths = BTreeMap::from([
            ("index".to_string(), root.join("V/B/Resources/config/routing.yml")),
            ("admin".to_string(), root.join("V/B/Resources/config/admin.yml")),
        ]);
        let keys = routing.import(&bundle(), &paths).unwrap();
        assert_eq!(keys, vec!["ClassName_admin", "ClassName_index"]);

        let map = routing.load().unwrap();
        assert_eq!(map["ClassName_index"].resource, "@ClassName/Resources/config/routing.yml");
        assert_eq!(map["ClassName_admin"].resource, "@ClassName/Resources/config/admin.yml");
    }

    #[test]
    fn test_import_outside_root_rejected() {
        let dir = tempdir().unwrap();
        let routing = manifest(dir.path(), Some(dir.path().join("plugins")));

        let paths = BTreeMap::from([("index", "/elsewhere/V/B/routing.yml")]);
        let err = routing.import(&bundle(), &paths).unwrap_err();
        assert!(matches!(err, ManifestError::Parse { .. }));
    }

    #[test]
    fn test_import_failure_leaves_file_unchanged() {
        let dir = tempdir().unwrap();
        let routing = manifest(dir.path(), None);
        std::fs::write(routing.path(), "Other_index:\n  resource: \"@Other/routing.yml\"\n").unwrap();
        let before = std::fs::read_to_string(routing.path()).unwrap();

        let paths = BTreeMap::from([
            ("index", "/app/plugins/V/B/routing.yml"),
            ("broken", "/app/plugins/W/C/routing.yml"),
        ]);
        let err = routing.import(&bundle(), &paths).unwrap_err();
        assert!(matches!(err, ManifestError::Parse { ref vendor, .. } if vendor == "V"));
        assert_eq!(std::fs::read_to_string(routing.path()).unwrap(), before);
    }

    #[test]
    fn test_import_skips_trailing_plugin_segment() {
        let dir = tempdir().unwrap();
        let routing = manifest(dir.path(), None);

        routing
            .import(&bundle(), [("index", "/app/V/B/config/V/B")])
            .unwrap();
        assert_eq!(
            routing.load().unwrap()["ClassName_index"].resource,
            "@ClassName/config/V/B"
        );
    }

    #[test]
    fn test_import_requires_path_below_bundle() {
        let dir = tempdir().unwrap();
        let routing = manifest(dir.path(), None);

        for path in ["/V/B/routing.yml", "/app/V/B", "routing.yml"] {
            let err = routing.import(&bundle(), [("index", path)]).unwrap_err();
            assert!(matches!(err, ManifestError::Parse { .. }), "{path}");
        }
    }

    #[test]
    fn test_import_merges_new_over_existing() {
        let dir = tempdir().unwrap();
        let routing = manifest(dir.path(), None);
        std::fs::write(
            routing.path(),
            "ClassName_index:\n  resource: \"@ClassName/old.yml\"\nOther_index:\n  resource: \"@Other/routing.yml\"\n",
        )
        .unwrap();

        routing
            .import(&bundle(), [("index", "/app/plugins/V/B/new.yml")])
            .unwrap();

        let map = routing.load().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["ClassName_index"].resource, "@ClassName/new.yml");
        assert_eq!(map["Other_index"].resource, "@Other/routing.yml");
    }

    #[test]
    fn test_remove_by_class_prefix() {
        let dir = tempdir().unwrap();
        let routing = manifest(dir.path(), None);
        routing
            .import(
                &bundle(),
                [
                    ("index", "/app/plugins/V/B/index.yml"),
                    ("admin", "/app/plugins/V/B/admin.yml"),
                ],
            )
            .unwrap();
        let other = BundleName::parse("W\\C\\Other").unwrap();
        routing
            .import(&other, [("index", "/app/plugins/W/C/routing.yml")])
            .unwrap();

        assert_eq!(routing.remove(&bundle()).unwrap(), 2);

        let map = routing.load().unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("Other_index"));
        assert!(map.keys().all(|k| !k.starts_with("ClassName")));
    }

    #[test]
    fn test_remove_on_empty_file() {
        let dir = tempdir().unwrap();
        let routing = manifest(dir.path(), None);
        assert_eq!(routing.remove(&bundle()).unwrap(), 0);
        assert!(routing.load().unwrap().is_empty());
    }
}
