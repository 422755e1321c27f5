//! Install and uninstall orchestration over the manifest registry.
//!
//! A plugin lives in `<plugin_root>/<Vendor>/<BundleName>/` and describes itself with a
//! `plugin.yml` file:
//!
//! ```text
//! bundle: Acme\BlogBundle\AcmeBlogBundle
//! namespace: Acme          # optional, defaults to the vendor
//! routing:                 # optional, relative to the plugin directory
//!   index: Resources/config/routing.yml
//! ```

mod descriptor;
mod lifecycle;

pub use descriptor::{DESCRIPTOR_FILE, PluginDescriptor};
pub use lifecycle::PluginInstaller;
