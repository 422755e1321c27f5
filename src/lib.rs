//! # plugin-manifest
//!
//! File-backed registry of the plugins active in a host application.
//!
//! The host keeps three files: a namespace list, a bundle class-name list and a YAML
//! routing-resource map. Plugin install and uninstall add and remove entries in them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use plugin_manifest::{ManifestRegistry, RegistryConfig};
//!
//! fn main() -> Result<(), plugin_manifest::Error> {
//!     let config = RegistryConfig::builder()
//!         .base_dir("app/config/local/plugin")
//!         .build();
//!     let registry = ManifestRegistry::open(&config)?;
//!
//!     registry.register_namespace("Acme")?;
//!     registry.add_instantiable_bundle("Acme\\BlogBundle\\AcmeBlogBundle")?;
//!     registry.import_routing_resources(
//!         "Acme\\BlogBundle\\AcmeBlogBundle",
//!         [("index", "src/plugin/Acme/BlogBundle/Resources/config/routing.yml")],
//!     )?;
//!     Ok(())
//! }
//! ```
//!
//! ## Installer
//!
//! ```rust,no_run
//! use plugin_manifest::{PluginDescriptor, PluginInstaller, RegistryConfig};
//!
//! fn main() -> Result<(), plugin_manifest::Error> {
//!     let installer = PluginInstaller::open(&RegistryConfig::from_env()?)?;
//!     let plugin = PluginDescriptor::load("src/plugin/Acme/BlogBundle".as_ref())?;
//!     installer.install(&plugin)?;
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod installer;
pub mod manifest;

pub use config::{ConfigError, RegistryConfig, RegistryConfigBuilder, RegistrySettings, WriteMode};
pub use installer::{PluginDescriptor, PluginInstaller};
pub use manifest::{
    BundleName, LineStore, ManifestError, ManifestRegistry, RoutingManifest, RoutingMap,
    RoutingResource, shared_vendors,
};

/// Error type for plugin-manifest operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Reading or writing a manifest file failed.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Opens the registry configured by `PLUGIN_MANIFEST_*` environment variables.
pub fn open_from_env() -> Result<ManifestRegistry> {
    let config = RegistryConfig::from_env()?;
    Ok(ManifestRegistry::open(&config)?)
}
