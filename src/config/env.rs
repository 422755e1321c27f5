//! Environment variable overrides.
//!
//! Variables are read once when the configuration is built.

use std::env::VarError;
use std::path::PathBuf;

use super::{ConfigError, ConfigResult, RegistrySettings, WriteMode};

pub const ENV_PREFIX: &str = "PLUGIN_MANIFEST_";

impl RegistrySettings {
    /// Settings from `PLUGIN_MANIFEST_*` variables of the current process.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key))
    }

    /// Settings from an arbitrary variable source, keyed by the full variable name.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let var = |name: &str| -> ConfigResult<Option<String>> {
            match lookup(&format!("{}{}", ENV_PREFIX, name)) {
                Ok(value) if value.is_empty() => Ok(None),
                Ok(value) => Ok(Some(value)),
                Err(VarError::NotPresent) => Ok(None),
                Err(e) => Err(ConfigError::Env(e)),
            }
        };
        let path = |name: &str| var(name).map(|v| v.map(PathBuf::from));

        Ok(Self {
            base_dir: path("BASE_DIR")?,
            namespaces_file: path("NAMESPACES_FILE")?,
            bundles_file: path("BUNDLES_FILE")?,
            routing_file: path("ROUTING_FILE")?,
            plugin_root: path("PLUGIN_ROOT")?,
            write_mode: var("WRITE_MODE")?
                .map(|v| v.parse::<WriteMode>())
                .transpose()?,
        })
    }
}
